//! Grid of flow directions derived from noise, and the force lookup particles sample.
//!
//! The canvas is split into `columns × rows` cells. Each cell starts with its
//! diagonal (bottom-left to top-right corner); noise rotates that diagonal about
//! its start, and the rotated direction rescaled to a fixed magnitude becomes
//! the cell's force. Both grids are flat row-major buffers
//! (`index = row * columns + column`).

use flowfield_core::error::FlowError;
use flowfield_core::field::Field;
use flowfield_core::geometry::{scaled_to, Line};
use flowfield_core::DVec2;
use std::f64::consts::TAU;

fn cell_count(columns: usize, rows: usize) -> Result<usize, FlowError> {
    if columns == 0 || rows == 0 {
        return Err(FlowError::InvalidDimensions);
    }
    columns
        .checked_mul(rows)
        .ok_or(FlowError::InvalidDimensions)
}

/// Per-cell direction lines over a canvas.
#[derive(Debug, Clone)]
pub struct VectorField {
    size: DVec2,
    columns: usize,
    rows: usize,
    cell: DVec2,
    lines: Vec<Line>,
}

impl VectorField {
    /// Partitions a canvas of `size` into `columns × rows` cells, each holding
    /// its diagonal from the low corner to the high corner.
    pub fn build(size: DVec2, columns: usize, rows: usize) -> Result<Self, FlowError> {
        let len = cell_count(columns, rows)?;
        if !(size.is_finite() && size.x > 0.0 && size.y > 0.0) {
            return Err(FlowError::InvalidDimensions);
        }
        let cell = DVec2::new(size.x / columns as f64, size.y / rows as f64);
        let mut lines = Vec::with_capacity(len);
        for row in 0..rows {
            for column in 0..columns {
                let low = DVec2::new(column as f64, row as f64) * cell;
                let high = DVec2::new((column + 1) as f64, (row + 1) as f64) * cell;
                lines.push(Line::new(low, high));
            }
        }
        Ok(Self {
            size,
            columns,
            rows,
            cell,
            lines,
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn size(&self) -> DVec2 {
        self.size
    }

    /// All cell lines in row-major order.
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The line of one cell, or `None` outside the grid.
    pub fn line(&self, column: usize, row: usize) -> Option<&Line> {
        if column < self.columns && row < self.rows {
            self.lines.get(row * self.columns + column)
        } else {
            None
        }
    }

    /// Rotates every cell line about its start by `noise * 2π`.
    ///
    /// `noise` must have exactly `columns × rows` cells.
    pub fn apply_noise(&mut self, noise: &Field) -> Result<(), FlowError> {
        if noise.width() != self.columns || noise.height() != self.rows {
            return Err(FlowError::DimensionMismatch {
                lhs_w: self.columns,
                lhs_h: self.rows,
                rhs_w: noise.width(),
                rhs_h: noise.height(),
            });
        }
        self.lines
            .iter_mut()
            .zip(noise.data())
            .for_each(|(line, &n)| *line = line.rotate(n * TAU));
        Ok(())
    }

    /// Derives one force per cell: the line direction rescaled to `magnitude`.
    ///
    /// A zero-length cell line cannot be given a direction and fails with
    /// `FlowError::DegenerateVector` naming the cell.
    pub fn build_forces(&self, magnitude: f64) -> Result<ForceField, FlowError> {
        let forces = self
            .lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                scaled_to(line.vector(), magnitude).map_err(|_| FlowError::DegenerateVector {
                    column: Some(i % self.columns),
                    row: Some(i / self.columns),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(ForceField {
            columns: self.columns,
            rows: self.rows,
            cell: self.cell,
            forces,
        })
    }
}

/// Read-only per-cell forces sampled by particles.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceField {
    columns: usize,
    rows: usize,
    cell: DVec2,
    forces: Vec<DVec2>,
}

impl ForceField {
    /// A field with the same force in every cell.
    pub fn uniform(size: DVec2, columns: usize, rows: usize, force: DVec2) -> Result<Self, FlowError> {
        let len = cell_count(columns, rows)?;
        Ok(Self {
            columns,
            rows,
            cell: DVec2::new(size.x / columns as f64, size.y / rows as f64),
            forces: vec![force; len],
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Force of one cell, or `None` outside the grid.
    pub fn force(&self, column: usize, row: usize) -> Option<DVec2> {
        if column < self.columns && row < self.rows {
            self.forces.get(row * self.columns + column).copied()
        } else {
            None
        }
    }

    /// Maps a continuous axis coordinate to a cell index.
    ///
    /// The index is `floor(coord / cell) - 1` clamped to `[0, cells - 1]`: the
    /// one-cell shift keeps a point sitting exactly on the far edge in range,
    /// and the low side clamps to the first cell.
    fn axis_index(coord: f64, cell: f64, cells: usize) -> usize {
        let raw = (coord / cell).floor() - 1.0;
        if raw.is_nan() || raw <= 0.0 {
            0
        } else {
            (raw as usize).min(cells - 1)
        }
    }

    /// Force for the cell containing `point`.
    pub fn vector_at(&self, point: DVec2) -> DVec2 {
        let column = Self::axis_index(point.x, self.cell.x, self.columns);
        let row = Self::axis_index(point.y, self.cell.y, self.rows);
        self.forces[row * self.columns + column]
    }
}
