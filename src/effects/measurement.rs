//! Distance/angle measurements between two points.

use std::fmt;

use pixnote_raster::{DrawStyle, RasterSurface};

use crate::constants::{MEASUREMENT_LABEL_OFFSET, MEASUREMENT_MARKER_RADIUS};
use crate::error::{EngineError, Result};
use crate::registry::RegionRecord;

/// Unit label attached to a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeasurementUnit {
    #[default]
    Px,
    Cm,
    In,
}

impl fmt::Display for MeasurementUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MeasurementUnit::Px => f.write_str("px"),
            MeasurementUnit::Cm => f.write_str("cm"),
            MeasurementUnit::In => f.write_str("in"),
        }
    }
}

/// A recorded measurement. Immutable once created.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementResult {
    pub id: String,
    pub start_x: f64,
    pub start_y: f64,
    pub end_x: f64,
    pub end_y: f64,
    /// Euclidean distance between the endpoints.
    pub distance: f64,
    /// Direction from start to end in degrees, in `[0, 360)`.
    pub angle: f64,
    pub unit: MeasurementUnit,
}

impl RegionRecord for MeasurementResult {
    fn id(&self) -> &str {
        &self.id
    }
}

impl MeasurementResult {
    pub fn midpoint(&self) -> (f64, f64) {
        (
            (self.start_x + self.end_x) / 2.0,
            (self.start_y + self.end_y) / 2.0,
        )
    }

    /// Distance label, e.g. `5.00 px`.
    pub fn label(&self) -> String {
        format!("{:.2} {}", self.distance, self.unit)
    }

    /// Where the label is drawn: the midpoint shifted right and up.
    pub fn label_anchor(&self) -> (f64, f64) {
        let (mx, my) = self.midpoint();
        (mx + MEASUREMENT_LABEL_OFFSET.0, my + MEASUREMENT_LABEL_OFFSET.1)
    }
}

/// Distance and normalized angle (degrees, `[0, 360)`) from start to end.
pub fn segment_geometry(start_x: f64, start_y: f64, end_x: f64, end_y: f64) -> (f64, f64) {
    let dx = end_x - start_x;
    let dy = end_y - start_y;
    let distance = (dx * dx + dy * dy).sqrt();

    let mut angle = dy.atan2(dx).to_degrees();
    if angle < 0.0 {
        angle += 360.0;
    }
    // -tiny + 360 rounds to exactly 360
    if angle >= 360.0 {
        angle -= 360.0;
    }
    (distance, angle)
}

/// Reject coordinates that are negative, NaN or infinite.
pub fn validate_coordinates(coords: &[(&str, f64)]) -> Result<()> {
    for (name, value) in coords {
        if !value.is_finite() || *value < 0.0 {
            return Err(EngineError::validation(format!(
                "{} must be a non-negative finite number, got {}",
                name, value
            )));
        }
    }
    Ok(())
}

/// Draw the connecting line, endpoint markers and distance label.
pub fn draw_measurement(
    surface: &mut dyn RasterSurface,
    measurement: &MeasurementResult,
    style: &DrawStyle,
) {
    let (sx, sy) = (measurement.start_x as f32, measurement.start_y as f32);
    let (ex, ey) = (measurement.end_x as f32, measurement.end_y as f32);
    surface.draw_line(sx, sy, ex, ey, style);

    let marker = DrawStyle {
        fill: Some(style.stroke),
        stroke_width: 0.0,
        ..style.clone()
    };
    surface.draw_circle(sx, sy, MEASUREMENT_MARKER_RADIUS, &marker);
    surface.draw_circle(ex, ey, MEASUREMENT_MARKER_RADIUS, &marker);

    let (lx, ly) = measurement.label_anchor();
    let text = DrawStyle {
        fill: Some(style.fill.unwrap_or(style.stroke)),
        ..style.clone()
    };
    surface.draw_text(&measurement.label(), lx as f32, ly as f32, &text);
}
