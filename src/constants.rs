//! Global constants for the annotation engine

/// Default capacity of the undo stack
pub const DEFAULT_MAX_UNDO_STEPS: usize = 50;

/// Default number of box-blur passes for new blur regions
pub const DEFAULT_BLUR_RADIUS: u32 = 10;

/// Smallest accepted blur radius
pub const MIN_BLUR_RADIUS: u32 = 1;

/// Largest accepted blur radius
pub const MAX_BLUR_RADIUS: u32 = 50;

/// Radius of the endpoint markers drawn on measurements
pub const MEASUREMENT_MARKER_RADIUS: f32 = 4.0;

/// Offset of the distance label from the measurement midpoint
pub const MEASUREMENT_LABEL_OFFSET: (f64, f64) = (10.0, -10.0);

/// Name of the layer created with a fresh document
pub const BASE_LAYER_NAME: &str = "Base Layer";
