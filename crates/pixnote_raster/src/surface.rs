use crate::error::Result;
use crate::pixels::{PixelBuffer, Rect};
use crate::style::DrawStyle;

/// Capability interface for a raster drawing target.
///
/// Pixel transfer is bounds-checked and fails on regions outside the surface.
/// Drawing primitives follow canvas semantics and clip silently.
pub trait RasterSurface {
    /// Surface dimensions as `(width, height)`.
    fn size(&self) -> (u32, u32);

    /// Copy the pixels of `rect` out of the surface.
    fn get_pixels(&self, rect: Rect) -> Result<PixelBuffer>;

    /// Write `buffer` into `rect`. The buffer must match the rect dimensions.
    fn put_pixels(&mut self, rect: Rect, buffer: &PixelBuffer) -> Result<()>;

    /// Stroke a line segment with `style.stroke` at `style.stroke_width`.
    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, style: &DrawStyle);

    /// Draw a circle. Filled when `style.fill` is set, outlined when
    /// `style.stroke_width` is positive.
    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, style: &DrawStyle);

    /// Composite a solid rectangle of `style.fill_color()` at `style.alpha`.
    fn draw_filled_rect(&mut self, rect: Rect, style: &DrawStyle);

    /// Draw a text label anchored at its baseline start.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &DrawStyle);
}
