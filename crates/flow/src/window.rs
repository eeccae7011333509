//! Framed sub-regions of the canvas that crop the traced lines.

use flowfield_core::geometry::{Line, Rect};
use tracing::debug;

use crate::clip::CohenSutherland;

/// A rectangle plus the lines to crop against it.
#[derive(Debug, Clone)]
pub struct Window<'a> {
    rect: Rect,
    lines: &'a [Line],
}

impl<'a> Window<'a> {
    pub fn new(rect: Rect, lines: &'a [Line]) -> Self {
        Self { rect, lines }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Accepted clipped lines followed by the four border segments
    /// (bottom, right, top, left).
    pub fn clipped(&self) -> Vec<Line> {
        let clipper = CohenSutherland::new(self.rect);
        let mut out = clipper.clip_all(self.lines);
        let accepted = out.len();
        out.extend(self.rect.borders());
        debug!(
            x = self.rect.min_x(),
            y = self.rect.min_y(),
            input = self.lines.len(),
            accepted,
            "window clipped"
        );
        out
    }
}

/// Clips `lines` independently against each rectangle and concatenates the
/// results in rectangle order.
pub fn clip_into_windows(lines: &[Line], rects: &[Rect]) -> Vec<Line> {
    rects
        .iter()
        .flat_map(|&rect| Window::new(rect, lines).clipped())
        .collect()
}
