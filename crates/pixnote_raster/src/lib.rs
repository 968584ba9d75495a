//! Raster surface capability layer for pixnote.
//!
//! Defines the narrow drawing interface the annotation engine renders
//! through, plus an in-memory RGBA implementation backed by the `image` crate
//! with shapes rasterized by `tiny-skia`.

pub mod color;
pub mod error;
pub mod image_surface;
pub mod pixels;
pub mod style;
pub mod surface;

pub use color::Rgba;
pub use error::{RasterError, Result};
pub use image_surface::{ImageSurface, TextLabel};
pub use pixels::{blend_over, PixelBuffer, Rect};
pub use style::{DrawStyle, FontSpec};
pub use surface::RasterSurface;
