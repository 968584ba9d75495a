//! RGBA8 pixel buffers, rectangles, and straight alpha compositing.

use crate::color::Rgba;
use crate::error::{RasterError, Result};

/// An axis-aligned pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        u64::from(self.x) + u64::from(self.width)
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        u64::from(self.y) + u64::from(self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x
            && y >= self.y
            && u64::from(x) < self.right()
            && u64::from(y) < self.bottom()
    }

    /// Check that the rectangle lies entirely inside a `width` x `height` surface.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= u64::from(width) && self.bottom() <= u64::from(height)
    }

    /// Intersect with a `width` x `height` surface anchored at the origin.
    pub fn clip_to(&self, width: u32, height: u32) -> Rect {
        let x = self.x.min(width);
        let y = self.y.min(height);
        let right = self.right().min(u64::from(width)) as u32;
        let bottom = self.bottom().min(u64::from(height)) as u32;
        Rect::new(x, y, right - x, bottom - y)
    }

    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }
}

/// A row-major RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let data = color.0.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap raw RGBA8 bytes, validating the length against the dimensions.
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(RasterError::BufferSize {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// View the buffer as one `[r, g, b, a]` entry per pixel.
    pub fn pixels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.data)
    }

    pub fn pixels_mut(&mut self) -> &mut [[u8; 4]] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.index(x, y).map(|i| self.pixels()[i])
    }

    /// Overwrite a pixel. Returns `false` if the coordinates are out of range.
    pub fn set_pixel(&mut self, x: u32, y: u32, value: [u8; 4]) -> bool {
        match self.index(x, y) {
            Some(i) => {
                self.pixels_mut()[i] = value;
                true
            }
            None => false,
        }
    }
}

/// Straight (non-premultiplied) alpha blend of `src` over `dst`.
///
/// The effective coverage is `alpha * src.alpha`. Color channels are mixed
/// linearly; the destination alpha accumulates as `a + dst_a * (1 - a)`.
pub fn blend_over(dst: [u8; 4], src: Rgba, alpha: f32) -> [u8; 4] {
    let a = (alpha.clamp(0.0, 1.0) * src.alpha_f32()).clamp(0.0, 1.0);
    let mix = |s: u8, d: u8| -> u8 {
        (f32::from(s) * a + f32::from(d) * (1.0 - a))
            .round()
            .clamp(0.0, 255.0) as u8
    };
    let dst_a = f32::from(dst[3]) / 255.0;
    let out_a = ((a + dst_a * (1.0 - a)) * 255.0).round().clamp(0.0, 255.0) as u8;

    [
        mix(src.r(), dst[0]),
        mix(src.g(), dst[1]),
        mix(src.b(), dst[2]),
        out_a,
    ]
}
