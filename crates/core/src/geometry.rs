//! Plane geometry shared by the generator and the exporters.
//!
//! Points and vectors are [`glam::DVec2`]. Canvas space is y-up: the origin is
//! the bottom-left corner, so "below" a rectangle means a smaller `y`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::error::FlowError;

/// Rescales `v` to exactly `magnitude`, keeping its direction.
///
/// A zero target always yields the zero vector. Otherwise a zero (or
/// non-finite) vector has no direction and yields `FlowError::DegenerateVector`.
pub fn scaled_to(v: DVec2, magnitude: f64) -> Result<DVec2, FlowError> {
    if magnitude == 0.0 {
        return Ok(DVec2::ZERO);
    }
    v.try_normalize()
        .map(|unit| unit * magnitude)
        .ok_or_else(FlowError::degenerate)
}

/// An ordered pair of points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub start: DVec2,
    pub end: DVec2,
}

impl Line {
    pub fn new(start: DVec2, end: DVec2) -> Self {
        Self { start, end }
    }

    /// The vector from `start` to `end`.
    pub fn vector(&self) -> DVec2 {
        self.end - self.start
    }

    pub fn length(&self) -> f64 {
        self.vector().length()
    }

    /// Rotates `end` about `start` by `angle` radians (counter-clockwise).
    pub fn rotate(&self, angle: f64) -> Line {
        let rotated = DVec2::from_angle(angle).rotate(self.vector());
        Line {
            start: self.start,
            end: self.start + rotated,
        }
    }
}

/// Axis-aligned rectangle given by its bottom-left origin and size.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub origin: DVec2,
    pub size: DVec2,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            origin: DVec2::new(x, y),
            size: DVec2::new(width, height),
        }
    }

    /// A rectangle anchored at the origin.
    pub fn from_size(width: f64, height: f64) -> Self {
        Self::new(0.0, 0.0, width, height)
    }

    pub fn min_x(&self) -> f64 {
        self.origin.x
    }

    pub fn max_x(&self) -> f64 {
        self.origin.x + self.size.x
    }

    pub fn min_y(&self) -> f64 {
        self.origin.y
    }

    pub fn max_y(&self) -> f64 {
        self.origin.y + self.size.y
    }

    pub fn width(&self) -> f64 {
        self.size.x
    }

    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Whether `p` lies inside the rectangle, edges included.
    pub fn contains(&self, p: DVec2) -> bool {
        p.x >= self.min_x() && p.x <= self.max_x() && p.y >= self.min_y() && p.y <= self.max_y()
    }

    /// The four frame segments: bottom, right, top, left.
    pub fn borders(&self) -> [Line; 4] {
        let bl = DVec2::new(self.min_x(), self.min_y());
        let br = DVec2::new(self.max_x(), self.min_y());
        let tr = DVec2::new(self.max_x(), self.max_y());
        let tl = DVec2::new(self.min_x(), self.max_y());
        [
            Line::new(bl, br),
            Line::new(br, tr),
            Line::new(tr, tl),
            Line::new(tl, bl),
        ]
    }
}
