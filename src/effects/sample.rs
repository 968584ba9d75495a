//! Single-pixel color sampling.

use pixnote_raster::{RasterError, RasterSurface, Rect, Rgba};

use crate::error::Result;

/// Read the color of the pixel at `(x, y)`.
pub fn sample_pixel(surface: &dyn RasterSurface, x: u32, y: u32) -> Result<Rgba> {
    let buffer = surface.get_pixels(Rect::new(x, y, 1, 1))?;
    let pixel = buffer
        .pixels()
        .first()
        .copied()
        .ok_or(RasterError::BufferSize {
            expected: 4,
            actual: buffer.as_bytes().len(),
        })?;
    Ok(Rgba(pixel))
}
