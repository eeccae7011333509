//! PNG encoding of a rasterized [`Canvas`].
//!
//! Feature-gated behind `png` (default on) so the rasterizer can be used
//! without pulling in the `image` crate.

use flowfield_core::canvas::Canvas;
use flowfield_core::error::FlowError;
use std::path::Path;

use crate::pixel::{rasterize, Raster};

/// Writes a raster as an RGBA PNG.
///
/// Returns `FlowError::InvalidDimensions` if the raster dimensions overflow
/// `u32`, or `FlowError::Io` on write failure.
pub fn write_png(raster: &Raster, path: &Path) -> Result<(), FlowError> {
    let w = u32::try_from(raster.width()).map_err(|_| FlowError::InvalidDimensions)?;
    let h = u32::try_from(raster.height()).map_err(|_| FlowError::InvalidDimensions)?;
    let img = image::RgbaImage::from_raw(w, h, raster.data().to_vec())
        .ok_or_else(|| FlowError::Io("RGBA buffer size mismatch".into()))?;
    img.save(path).map_err(|e| FlowError::Io(e.to_string()))
}

/// Rasterizes `canvas` and writes it as a PNG.
pub fn write_canvas_png(canvas: &Canvas, path: &Path) -> Result<(), FlowError> {
    write_png(&rasterize(canvas)?, path)
}
