//! Cohen–Sutherland clipping of segments against an axis-aligned rectangle.
//!
//! Region codes are computed as an exclusive chain (left, else right, else
//! below, else above), so a point beyond two edges carries a single bit. A
//! point left of and above the rectangle is coded [`Outcode::LEFT`] only. The
//! clip loop still converges because each pass moves an endpoint onto the
//! boundary it was coded against and recomputes its code.

use std::ops::BitAnd;

use flowfield_core::geometry::{Line, Rect};
use flowfield_core::DVec2;

/// Endpoint replacements allowed before a segment is rejected.
///
/// Four suffice in exact arithmetic; the slack absorbs rounding that leaves an
/// intersection a hair outside the neighbouring edge.
const MAX_PASSES: usize = 16;

/// Position of a point relative to a clip rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Outcode(u8);

impl Outcode {
    pub const INSIDE: Outcode = Outcode(0);
    pub const LEFT: Outcode = Outcode(1);
    pub const RIGHT: Outcode = Outcode(2);
    pub const BOTTOM: Outcode = Outcode(4);
    pub const TOP: Outcode = Outcode(8);

    /// Codes `p` against `rect`; edges count as inside.
    pub fn of(p: DVec2, rect: &Rect) -> Outcode {
        if p.x < rect.min_x() {
            Outcode::LEFT
        } else if p.x > rect.max_x() {
            Outcode::RIGHT
        } else if p.y < rect.min_y() {
            Outcode::BOTTOM
        } else if p.y > rect.max_y() {
            Outcode::TOP
        } else {
            Outcode::INSIDE
        }
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_inside(self) -> bool {
        self.0 == 0
    }

    /// Whether every bit of `other` is set in `self`.
    pub fn contains(self, other: Outcode) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }
}

impl BitAnd for Outcode {
    type Output = Outcode;

    fn bitand(self, rhs: Outcode) -> Outcode {
        Outcode(self.0 & rhs.0)
    }
}

/// Clips segments against a fixed rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CohenSutherland {
    rect: Rect,
}

impl CohenSutherland {
    pub fn new(rect: Rect) -> Self {
        Self { rect }
    }

    pub fn rect(&self) -> Rect {
        self.rect
    }

    /// Both endpoints beyond the same edge.
    fn trivially_outside(&self, line: &Line) -> bool {
        let r = &self.rect;
        let (a, b) = (line.start, line.end);
        (a.x < r.min_x() && b.x < r.min_x())
            || (a.x > r.max_x() && b.x > r.max_x())
            || (a.y < r.min_y() && b.y < r.min_y())
            || (a.y > r.max_y() && b.y > r.max_y())
    }

    /// Intersection of the segment `start → end` with the edge named by
    /// `code`, checked in the order top, bottom, right, left.
    fn edge_intersection(&self, start: DVec2, end: DVec2, code: Outcode) -> Option<DVec2> {
        let r = &self.rect;
        let d = end - start;
        if code.contains(Outcode::TOP) {
            let y = r.max_y();
            Some(DVec2::new(start.x + d.x * (y - start.y) / d.y, y))
        } else if code.contains(Outcode::BOTTOM) {
            let y = r.min_y();
            Some(DVec2::new(start.x + d.x * (y - start.y) / d.y, y))
        } else if code.contains(Outcode::RIGHT) {
            let x = r.max_x();
            Some(DVec2::new(x, start.y + d.y * (x - start.x) / d.x))
        } else if code.contains(Outcode::LEFT) {
            let x = r.min_x();
            Some(DVec2::new(x, start.y + d.y * (x - start.x) / d.x))
        } else {
            None
        }
    }

    /// The part of `line` inside the rectangle, or `None` if it misses.
    ///
    /// Direction is preserved: the result runs from the clipped start toward
    /// the clipped end.
    pub fn clip(&self, line: &Line) -> Option<Line> {
        if self.trivially_outside(line) {
            return None;
        }
        let mut start = line.start;
        let mut end = line.end;
        let mut start_code = Outcode::of(start, &self.rect);
        let mut end_code = Outcode::of(end, &self.rect);

        for _ in 0..MAX_PASSES {
            if start_code.is_inside() && end_code.is_inside() {
                return Some(Line::new(start, end));
            }
            if !(start_code & end_code).is_inside() {
                return None;
            }
            let clip_start = !start_code.is_inside();
            let code = if clip_start { start_code } else { end_code };
            let p = self.edge_intersection(start, end, code)?;
            if !p.is_finite() {
                return None;
            }
            if clip_start {
                start = p;
                start_code = Outcode::of(p, &self.rect);
            } else {
                end = p;
                end_code = Outcode::of(p, &self.rect);
            }
        }
        None
    }

    /// Clips every line, dropping the rejected ones.
    pub fn clip_all<'a, I>(&self, lines: I) -> Vec<Line>
    where
        I: IntoIterator<Item = &'a Line>,
    {
        lines.into_iter().filter_map(|l| self.clip(l)).collect()
    }
}
