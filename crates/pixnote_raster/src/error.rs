use thiserror::Error;

use crate::pixels::Rect;

#[derive(Debug, Error)]
pub enum RasterError {
    #[error("Region {rect:?} lies outside the {width}x{height} surface")]
    OutOfBounds { rect: Rect, width: u32, height: u32 },

    #[error("Invalid buffer size: expected {expected} bytes, got {actual}")]
    BufferSize { expected: usize, actual: usize },

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RasterError>;
