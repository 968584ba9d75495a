//! In-memory [`RasterSurface`] backed by an [`image::RgbaImage`].

use image::RgbaImage;
use tiny_skia::{FillRule, LineCap, Mask, Path, PathBuilder, Stroke, Transform};

use crate::color::Rgba;
use crate::error::{RasterError, Result};
use crate::pixels::{blend_over, PixelBuffer, Rect};
use crate::style::DrawStyle;
use crate::surface::RasterSurface;

/// A text draw call recorded by [`ImageSurface`].
///
/// Glyph rasterization belongs to the presentation layer, so the surface keeps
/// the label and its placement for whoever composites the final frame.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub style: DrawStyle,
}

/// CPU raster surface over an RGBA8 image.
#[derive(Debug, Clone)]
pub struct ImageSurface {
    image: RgbaImage,
    labels: Vec<TextLabel>,
}

impl ImageSurface {
    pub fn new(image: RgbaImage) -> Self {
        Self {
            image,
            labels: Vec::new(),
        }
    }

    /// Create a surface filled with a single color.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        Self::new(RgbaImage::from_pixel(width, height, image::Rgba(color.0)))
    }

    /// Decode an encoded image (PNG etc.) into a surface.
    pub fn from_encoded(bytes: &[u8]) -> Result<Self> {
        let image = image::load_from_memory(bytes)?.to_rgba8();
        log::debug!(
            "Decoded {}x{} image into raster surface",
            image.width(),
            image.height()
        );
        Ok(Self::new(image))
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Text labels drawn so far, in draw order.
    pub fn labels(&self) -> &[TextLabel] {
        &self.labels
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    fn check_bounds(&self, rect: Rect) -> Result<()> {
        let (width, height) = self.image.dimensions();
        if rect.fits_within(width, height) {
            Ok(())
        } else {
            Err(RasterError::OutOfBounds {
                rect,
                width,
                height,
            })
        }
    }

    /// Rasterize `path` into an anti-aliased coverage mask and blend `color`
    /// through it, scaling `alpha` by each pixel's coverage.
    fn blend_path(&mut self, path: &Path, color: Rgba, alpha: f32) {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 || alpha <= 0.0 {
            return;
        }
        let bounds = path.bounds();
        let x0 = bounds.left().floor().max(0.0) as u32;
        let y0 = bounds.top().floor().max(0.0) as u32;
        let x1 = (bounds.right().ceil().max(0.0) as u32).min(width);
        let y1 = (bounds.bottom().ceil().max(0.0) as u32).min(height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        // Mask covers only the clipped bounding box
        let Some(mut mask) = Mask::new(x1 - x0, y1 - y0) else {
            log::warn!("Failed to allocate {}x{} coverage mask", x1 - x0, y1 - y0);
            return;
        };
        let offset = Transform::from_translate(-(x0 as f32), -(y0 as f32));
        mask.fill_path(path, FillRule::Winding, true, offset);

        let mask_width = (x1 - x0) as usize;
        for (i, &coverage) in mask.data().iter().enumerate() {
            if coverage == 0 {
                continue;
            }
            let x = x0 + (i % mask_width) as u32;
            let y = y0 + (i / mask_width) as u32;
            let px = self.image.get_pixel_mut(x, y);
            px.0 = blend_over(px.0, color, alpha * f32::from(coverage) / 255.0);
        }
    }

    fn stroke_path(&mut self, path: &Path, width: f32, cap: LineCap, style: &DrawStyle) {
        let stroke = Stroke {
            width,
            line_cap: cap,
            ..Stroke::default()
        };
        match path.stroke(&stroke, 1.0) {
            Some(outline) => self.blend_path(&outline, style.stroke, style.alpha),
            None => log::trace!("Degenerate stroke skipped"),
        }
    }
}

impl RasterSurface for ImageSurface {
    fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn get_pixels(&self, rect: Rect) -> Result<PixelBuffer> {
        self.check_bounds(rect)?;
        let mut data = Vec::with_capacity(rect.area() * 4);
        let row_bytes = self.image.width() as usize * 4;
        let raw = self.image.as_raw();
        for row in rect.y..rect.y + rect.height {
            let start = row as usize * row_bytes + rect.x as usize * 4;
            data.extend_from_slice(&raw[start..start + rect.width as usize * 4]);
        }
        PixelBuffer::from_rgba8(rect.width, rect.height, data)
    }

    fn put_pixels(&mut self, rect: Rect, buffer: &PixelBuffer) -> Result<()> {
        self.check_bounds(rect)?;
        if buffer.width() != rect.width || buffer.height() != rect.height {
            return Err(RasterError::BufferSize {
                expected: rect.area() * 4,
                actual: buffer.as_bytes().len(),
            });
        }
        for (i, pixel) in buffer.pixels().iter().enumerate() {
            let x = rect.x + (i as u32 % rect.width);
            let y = rect.y + (i as u32 / rect.width);
            self.image.put_pixel(x, y, image::Rgba(*pixel));
        }
        Ok(())
    }

    fn draw_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, style: &DrawStyle) {
        let mut builder = PathBuilder::new();
        builder.move_to(x0, y0);
        builder.line_to(x1, y1);
        if let Some(path) = builder.finish() {
            self.stroke_path(&path, style.stroke_width.max(1.0), LineCap::Round, style);
        }
    }

    fn draw_circle(&mut self, cx: f32, cy: f32, radius: f32, style: &DrawStyle) {
        let Some(path) = PathBuilder::from_circle(cx, cy, radius) else {
            return;
        };
        if let Some(fill) = style.fill {
            self.blend_path(&path, fill, style.alpha);
        }
        if style.stroke_width > 0.0 {
            self.stroke_path(&path, style.stroke_width, LineCap::Butt, style);
        }
    }

    fn draw_filled_rect(&mut self, rect: Rect, style: &DrawStyle) {
        let (width, height) = self.image.dimensions();
        let clipped = rect.clip_to(width, height);
        let color = style.fill_color();
        for y in clipped.y..clipped.y + clipped.height {
            for x in clipped.x..clipped.x + clipped.width {
                let px = self.image.get_pixel_mut(x, y);
                px.0 = blend_over(px.0, color, style.alpha);
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, style: &DrawStyle) {
        self.labels.push(TextLabel {
            text: text.to_string(),
            x,
            y,
            style: style.clone(),
        });
    }
}
