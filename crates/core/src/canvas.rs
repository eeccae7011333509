//! Drawing-command model handed to the raster collaborator.
//!
//! A [`Canvas`] holds dimensions and an ordered list of [`DrawCommand`]s,
//! replayed bottom-to-top (index 0 is painted first). The generator only ever
//! builds commands; turning them into pixels lives in the export crate.

use serde::{Deserialize, Serialize};

use crate::color::Srgb;
use crate::error::FlowError;
use crate::geometry::{Line, Rect};

/// A single drawing operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Fill a rectangle with a solid color.
    Fill { rect: Rect, color: Srgb },
    /// Stroke every segment with the given color and line width.
    Stroke {
        lines: Vec<Line>,
        color: Srgb,
        width: f64,
    },
}

/// A canvas with dimensions and an ordered command list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Canvas {
    width: f64,
    height: f64,
    commands: Vec<DrawCommand>,
}

impl Canvas {
    /// Creates an empty canvas.
    ///
    /// Returns `FlowError::InvalidDimensions` unless both dimensions are
    /// finite and positive.
    pub fn new(width: f64, height: f64) -> Result<Self, FlowError> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(width) || !valid(height) {
            return Err(FlowError::InvalidDimensions);
        }
        Ok(Self {
            width,
            height,
            commands: Vec::new(),
        })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// The full canvas rectangle.
    pub fn bounds(&self) -> Rect {
        Rect::from_size(self.width, self.height)
    }

    /// Commands in paint order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Paints the whole canvas with `color`.
    pub fn fill_background(&mut self, color: Srgb) {
        let rect = self.bounds();
        self.fill(rect, color);
    }

    pub fn fill(&mut self, rect: Rect, color: Srgb) {
        self.commands.push(DrawCommand::Fill { rect, color });
    }

    /// Strokes `lines`. An empty list adds no command.
    pub fn stroke(&mut self, lines: Vec<Line>, color: Srgb, width: f64) {
        if lines.is_empty() {
            return;
        }
        self.commands.push(DrawCommand::Stroke {
            lines,
            color,
            width,
        });
    }

    /// Total number of stroked segments across all commands.
    pub fn segment_count(&self) -> usize {
        self.commands
            .iter()
            .map(|c| match c {
                DrawCommand::Stroke { lines, .. } => lines.len(),
                DrawCommand::Fill { .. } => 0,
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    fn segment() -> Line {
        Line::new(DVec2::ZERO, DVec2::new(5.0, 5.0))
    }

    #[test]
    fn new_rejects_non_positive_or_non_finite_dimensions() {
        assert!(matches!(Canvas::new(0.0, 10.0), Err(FlowError::InvalidDimensions)));
        assert!(Canvas::new(10.0, -1.0).is_err());
        assert!(Canvas::new(f64::NAN, 10.0).is_err());
        assert!(Canvas::new(f64::INFINITY, 10.0).is_err());
    }

    #[test]
    fn commands_keep_paint_order() {
        let mut canvas = Canvas::new(10.0, 10.0).unwrap();
        canvas.fill_background(Srgb::WHITE);
        canvas.stroke(vec![segment()], Srgb::BLACK, 1.0);
        assert!(matches!(canvas.commands()[0], DrawCommand::Fill { .. }));
        assert!(matches!(canvas.commands()[1], DrawCommand::Stroke { .. }));
    }

    #[test]
    fn fill_background_covers_bounds() {
        let mut canvas = Canvas::new(30.0, 20.0).unwrap();
        canvas.fill_background(Srgb::BLACK);
        assert_eq!(
            canvas.commands()[0],
            DrawCommand::Fill {
                rect: Rect::from_size(30.0, 20.0),
                color: Srgb::BLACK
            }
        );
    }

    #[test]
    fn empty_stroke_is_skipped() {
        let mut canvas = Canvas::new(10.0, 10.0).unwrap();
        canvas.stroke(Vec::new(), Srgb::BLACK, 1.0);
        assert!(canvas.commands().is_empty());
    }

    #[test]
    fn segment_count_sums_strokes() {
        let mut canvas = Canvas::new(10.0, 10.0).unwrap();
        canvas.fill_background(Srgb::WHITE);
        canvas.stroke(vec![segment(), segment()], Srgb::BLACK, 1.0);
        canvas.stroke(vec![segment()], Srgb::ASH, 0.5);
        assert_eq!(canvas.segment_count(), 3);
    }

    #[test]
    fn command_serializes_with_op_tag() {
        let cmd = DrawCommand::Fill {
            rect: Rect::from_size(1.0, 1.0),
            color: Srgb::BLACK,
        };
        let v = serde_json::to_value(&cmd).unwrap();
        assert_eq!(v["op"], "fill");
        assert_eq!(v["color"], "#000000");
    }
}
