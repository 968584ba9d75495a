//! Error types for annotation engine operations.

use std::fmt;

use pixnote_raster::RasterError;
use thiserror::Error;

/// Which history stack an operation tried to pop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryDirection {
    Undo,
    Redo,
}

impl fmt::Display for HistoryDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryDirection::Undo => f.write_str("undo"),
            HistoryDirection::Redo => f.write_str("redo"),
        }
    }
}

/// The kind of entity a lookup failed to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Layer,
    Element,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Layer => f.write_str("Layer"),
            EntityKind::Element => f.write_str("Element"),
        }
    }
}

/// Errors surfaced by the annotation engine and layer manager.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Input outside the allowed domain
    #[error("Validation failed: {message}")]
    Validation {
        /// Description of the rejected input
        message: String,
    },

    /// No raster surface is bound
    #[error("Raster surface unavailable")]
    SurfaceUnavailable,

    /// Layer or element id is unknown
    #[error("{kind} not found: {id}")]
    NotFound {
        /// What was being looked up
        kind: EntityKind,
        /// The missing id
        id: u64,
    },

    /// The document has no layers, so there is no active layer
    #[error("No active layer")]
    NoActiveLayer,

    /// Undo or redo stack is empty
    #[error("Nothing to {0}")]
    EmptyHistory(HistoryDirection),

    /// Element mutation on a locked layer
    #[error("Layer {id} is locked")]
    LayerLocked {
        /// The locked layer
        id: u64,
    },

    /// Failure reported by the raster surface
    #[error("Raster error: {0}")]
    Raster(#[from] RasterError),

    /// Configuration (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while reading or writing configuration
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EngineError {
    /// Create a validation error with a message.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a not-found error for a layer id.
    pub fn layer_not_found(id: u64) -> Self {
        Self::NotFound {
            kind: EntityKind::Layer,
            id,
        }
    }

    /// Create a not-found error for an element id.
    pub fn element_not_found(id: u64) -> Self {
        Self::NotFound {
            kind: EntityKind::Element,
            id,
        }
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
