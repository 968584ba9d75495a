//! Data models for layers and drawing elements.

mod element;
mod layer;

pub use element::{DrawingElement, ElementId, ElementShape, ElementStyle, ElementUpdate, Point};
pub use layer::{AnnotationLayer, BlendMode, LayerChange, LayerId};

/// Milliseconds since the UNIX epoch.
pub(crate) fn now_millis() -> u64 {
    web_time::SystemTime::now()
        .duration_since(web_time::SystemTime::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
