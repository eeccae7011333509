//! Two-dimensional scalar grid used for noise.
//!
//! A `Field` stores `width * height` f64 values in a single row-major buffer
//! (`index = y * width + x`). Edge wrapping is the caller's business; the
//! noise smoother computes its own wrapped lattice indices and reads
//! [`Field::data`] directly.

use crate::error::FlowError;

/// A 2D scalar grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    width: usize,
    height: usize,
    data: Vec<f64>,
}

fn checked_len(width: usize, height: usize) -> Result<usize, FlowError> {
    if width == 0 || height == 0 {
        return Err(FlowError::InvalidDimensions);
    }
    width
        .checked_mul(height)
        .ok_or(FlowError::InvalidDimensions)
}

impl Field {
    /// Creates a zero-filled field of the given dimensions.
    ///
    /// Returns `FlowError::InvalidDimensions` if either dimension is zero
    /// or if `width * height` overflows `usize`.
    pub fn new(width: usize, height: usize) -> Result<Self, FlowError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![0.0; len],
        })
    }

    /// Creates a field filled with `value`, clamped to [0, 1].
    pub fn filled(width: usize, height: usize, value: f64) -> Result<Self, FlowError> {
        let len = checked_len(width, height)?;
        Ok(Self {
            width,
            height,
            data: vec![value.clamp(0.0, 1.0); len],
        })
    }

    /// Creates a field from a pre-built row-major buffer, validating that
    /// `data.len() == width * height`.
    ///
    /// Values are **not** clamped.
    pub fn from_data(width: usize, height: usize, data: Vec<f64>) -> Result<Self, FlowError> {
        let expected = checked_len(width, height)?;
        if data.len() != expected {
            return Err(FlowError::DimensionMismatch {
                lhs_w: width,
                lhs_h: height,
                rhs_w: data.len(),
                rhs_h: 1,
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Read-only access to the underlying row-major data.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Mutable access to the underlying row-major data. Bypasses clamping.
    pub fn data_mut(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Bounds-checked read: `None` when `(x, y)` lies outside the grid.
    pub fn at(&self, x: usize, y: usize) -> Option<f64> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Smallest and largest value in the field.
    pub fn min_max(&self) -> (f64, f64) {
        self.data
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }

    /// Iterates over all cells yielding `(x, y, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        self.data.iter().enumerate().map(|(i, &v)| {
            let x = i % self.width;
            let y = i / self.width;
            (x, y, v)
        })
    }
}
