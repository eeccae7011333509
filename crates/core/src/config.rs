//! Reproducible run configuration.
//!
//! A [`RunConfig`] captures everything needed to recreate an image: seed,
//! canvas size, composition mode, window layout, color overrides and
//! [`Parameters`]. Two identical configs produce bit-identical line lists.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::error::FlowError;
use crate::geometry::Rect;
use crate::params::Parameters;

/// Default canvas width in canvas units (one unit per pixel).
pub const DEFAULT_WIDTH: f64 = 1000.0;
/// Default canvas height in canvas units.
pub const DEFAULT_HEIGHT: f64 = 1200.0;

const MODE_NAMES: &[&str] = &["plain", "windowed"];

/// How the traced lines are composed onto the canvas.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Every trace on a white background.
    #[default]
    Plain,
    /// Traces clipped into vertical strips on a black background.
    Windowed,
}

impl Mode {
    pub fn from_name(name: &str) -> Result<Self, FlowError> {
        match name {
            "plain" => Ok(Mode::Plain),
            "windowed" => Ok(Mode::Windowed),
            _ => Err(FlowError::UnknownMode(name.to_string())),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Mode::Plain => "plain",
            Mode::Windowed => "windowed",
        }
    }

    pub fn list_names() -> &'static [&'static str] {
        MODE_NAMES
    }

    /// Background fill used when a run does not override it.
    pub fn background(self) -> Srgb {
        match self {
            Mode::Plain => Srgb::WHITE,
            Mode::Windowed => Srgb::BLACK,
        }
    }

    /// Stroke color for traced lines used when a run does not override it.
    pub fn stroke(self) -> Srgb {
        match self {
            Mode::Plain => Srgb::BLACK,
            Mode::Windowed => Srgb::ASH,
        }
    }
}

/// Equal-width vertical strips laid across the canvas.
///
/// Strips are inset by `margin` on every side and separated by `gap`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowLayout {
    pub count: usize,
    pub margin: f64,
    pub gap: f64,
}

impl Default for WindowLayout {
    fn default() -> Self {
        Self {
            count: 5,
            margin: 100.0,
            gap: 75.0,
        }
    }
}

impl WindowLayout {
    /// Computes the strip rectangles inside `bounds`, left to right.
    ///
    /// Returns `FlowError::InvalidConfig` if the layout leaves no positive
    /// width or height for the strips.
    pub fn rects(&self, bounds: Rect) -> Result<Vec<Rect>, FlowError> {
        if self.count == 0 {
            return Err(FlowError::InvalidConfig(
                "window count must be > 0".to_string(),
            ));
        }
        if self.margin < 0.0 || self.gap < 0.0 {
            return Err(FlowError::InvalidConfig(
                "window margin and gap must be >= 0".to_string(),
            ));
        }
        let n = self.count as f64;
        let strip_width = (bounds.width() - 2.0 * self.margin - (n - 1.0) * self.gap) / n;
        let strip_height = bounds.height() - 2.0 * self.margin;
        if !(strip_width > 0.0 && strip_height > 0.0) {
            return Err(FlowError::InvalidConfig(format!(
                "window layout leaves no room: strips would be {strip_width} x {strip_height}"
            )));
        }
        Ok((0..self.count)
            .map(|i| {
                Rect::new(
                    bounds.min_x() + self.margin + i as f64 * (strip_width + self.gap),
                    bounds.min_y() + self.margin,
                    strip_width,
                    strip_height,
                )
            })
            .collect())
    }
}

/// Complete, reproducible description of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    pub seed: u64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub windows: WindowLayout,
    /// Also stroke the rotated vector-field diagonals.
    #[serde(default)]
    pub show_field: bool,
    /// Replaces the mode's background fill.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub background: Option<Srgb>,
    /// Replaces the mode's stroke color for traced lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<Srgb>,
    #[serde(default)]
    pub parameters: Parameters,
}

impl RunConfig {
    /// Default canvas, plain mode, default parameters.
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            mode: Mode::default(),
            windows: WindowLayout::default(),
            show_field: false,
            background: None,
            stroke: None,
            parameters: Parameters::default(),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Background and stroke colors after applying overrides to the mode's.
    pub fn colors(&self) -> (Srgb, Srgb) {
        (
            self.background.unwrap_or_else(|| self.mode.background()),
            self.stroke.unwrap_or_else(|| self.mode.stroke()),
        )
    }

    /// Rejects configurations the pipeline cannot run.
    ///
    /// Noise persistence is not checked: zero gives NaN noise and negative
    /// values push cells outside [0, 1].
    pub fn validate(&self) -> Result<(), FlowError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.width) || !positive(self.height) {
            return Err(FlowError::InvalidDimensions);
        }
        let p = &self.parameters;
        let invalid = |msg: &str| Err(FlowError::InvalidConfig(msg.to_string()));
        if p.particle_count == 0 {
            return invalid("particle_count must be > 0");
        }
        if p.columns == 0 || p.rows == 0 {
            return invalid("columns and rows must be > 0");
        }
        if p.columns.checked_mul(p.rows).is_none() {
            return Err(FlowError::InvalidDimensions);
        }
        if !positive(p.max_velocity) {
            return invalid("max_velocity must be > 0");
        }
        if !positive(p.vector_field_magnitude) {
            return invalid("vector_field_magnitude must be > 0");
        }
        if p.octaves == 0 {
            return invalid("octaves must be > 0");
        }
        if p.max_steps == 0 {
            return invalid("max_steps must be > 0");
        }
        if self.mode == Mode::Windowed {
            self.windows.rects(self.bounds())?;
        }
        Ok(())
    }
}
