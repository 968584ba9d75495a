//! Pixnote - image annotation engine
//!
//! Measurements, box blur, translucent highlights and color picking on a
//! pluggable raster surface, plus a layered drawing document with bounded
//! undo/redo.

pub mod config;
pub mod constants;
pub mod document;
pub mod effects;
pub mod engine;
pub mod error;
pub mod layers;
pub mod model;
pub mod registry;
pub mod undo;

pub use config::{EngineConfig, LogLevel, MeasurementStyle};
pub use document::Document;
pub use effects::{BlurRegion, HighlightRegion, MeasurementResult, MeasurementUnit};
pub use engine::{AnnotationEngine, BoxedSurface};
pub use error::{EngineError, EntityKind, HistoryDirection, Result};
pub use model::{
    AnnotationLayer, BlendMode, DrawingElement, ElementId, ElementShape, ElementStyle,
    ElementUpdate, LayerChange, LayerId, Point,
};
pub use undo::{Command, CommandKind, HistoryRecord, UndoStack};

pub use pixnote_raster::{
    DrawStyle, FontSpec, ImageSurface, PixelBuffer, RasterError, RasterSurface, Rect, Rgba,
};
