//! Pure-computation rasterizer: replays a [`Canvas`] into an RGBA8 buffer.
//!
//! Always available (no feature gate) so callers without the `png` feature
//! can still get pixels. Canvas space is y-up; the buffer is stored top row
//! first, so canvas `y = 0` lands on the last image row.

use std::ops::Range;

use flowfield_core::canvas::{Canvas, DrawCommand};
use flowfield_core::color::Srgb;
use flowfield_core::error::FlowError;
use flowfield_core::geometry::{Line, Rect};
use flowfield_core::DVec2;

/// An RGBA8 pixel buffer, rows top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

/// Pixel indices whose centers `i + 0.5` fall in `[lo, hi)`, clamped to `0..n`.
fn span(lo: f64, hi: f64, n: usize) -> Range<usize> {
    let clamp = |v: f64| (v - 0.5).ceil().clamp(0.0, n as f64) as usize;
    clamp(lo)..clamp(hi)
}

fn distance_to_segment(p: DVec2, line: &Line) -> f64 {
    let d = line.vector();
    let len2 = d.length_squared();
    if len2 == 0.0 {
        return p.distance(line.start);
    }
    let t = ((p - line.start).dot(d) / len2).clamp(0.0, 1.0);
    p.distance(line.start + d * t)
}

impl Raster {
    /// A fully transparent buffer.
    pub fn new(width: usize, height: usize) -> Result<Self, FlowError> {
        if width == 0 || height == 0 {
            return Err(FlowError::InvalidDimensions);
        }
        let len = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(FlowError::InvalidDimensions)?;
        Ok(Self {
            width,
            height,
            data: vec![0; len],
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw RGBA bytes, `width * height * 4` long.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// RGBA of the pixel at image column `x`, image row `y` (row 0 on top).
    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some([self.data[i], self.data[i + 1], self.data[i + 2], self.data[i + 3]])
    }

    /// Image row holding canvas row `j` (canvas rows count up from the bottom).
    fn image_row(&self, j: usize) -> usize {
        self.height - 1 - j
    }

    /// Source-over blend of `color` at `coverage` in [0, 1].
    fn blend(&mut self, x: usize, row: usize, color: [u8; 3], coverage: f64) {
        let i = (row * self.width + x) * 4;
        let inv = 1.0 - coverage;
        for (c, &src) in color.iter().enumerate() {
            let dst = f64::from(self.data[i + c]);
            self.data[i + c] = (f64::from(src) * coverage + dst * inv).round() as u8;
        }
        let dst_alpha = f64::from(self.data[i + 3]);
        self.data[i + 3] = (255.0 * coverage + dst_alpha * inv).round() as u8;
    }

    /// Paints every pixel whose center lies in `rect`.
    pub fn fill_rect(&mut self, rect: Rect, color: Srgb) {
        let rgb = color.to_rgb8();
        let columns = span(rect.min_x(), rect.max_x(), self.width);
        for j in span(rect.min_y(), rect.max_y(), self.height) {
            let row = self.image_row(j);
            for x in columns.clone() {
                self.blend(x, row, rgb, 1.0);
            }
        }
    }

    /// Strokes one segment `width` units thick, anti-aliased by the distance
    /// from each pixel center to the segment.
    pub fn stroke_line(&mut self, line: &Line, color: Srgb, width: f64) {
        let half = width / 2.0;
        let pad = half + 1.0;
        let lo = line.start.min(line.end) - DVec2::splat(pad);
        let hi = line.start.max(line.end) + DVec2::splat(pad);
        let rgb = color.to_rgb8();
        let columns = span(lo.x, hi.x, self.width);
        for j in span(lo.y, hi.y, self.height) {
            let row = self.image_row(j);
            for x in columns.clone() {
                let center = DVec2::new(x as f64 + 0.5, j as f64 + 0.5);
                let coverage = (half + 0.5 - distance_to_segment(center, line)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, row, rgb, coverage);
                }
            }
        }
    }
}

/// Replays `canvas` into a `ceil(width) × ceil(height)` raster.
pub fn rasterize(canvas: &Canvas) -> Result<Raster, FlowError> {
    let width = canvas.width().ceil() as usize;
    let height = canvas.height().ceil() as usize;
    let mut raster = Raster::new(width, height)?;
    for command in canvas.commands() {
        match command {
            DrawCommand::Fill { rect, color } => raster.fill_rect(*rect, *color),
            DrawCommand::Stroke {
                lines,
                color,
                width,
            } => lines
                .iter()
                .for_each(|line| raster.stroke_line(line, *color, *width)),
        }
    }
    Ok(raster)
}
