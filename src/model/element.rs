//! Drawing elements owned by annotation layers.

use pixnote_raster::Rgba;

use super::now_millis;
use crate::error::{EngineError, Result};

/// Unique identifier for a drawing element within its layer.
pub type ElementId = u64;

/// A 2D point in image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    fn translated(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// Shape-specific payload of a drawing element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementShape {
    /// Freehand pen stroke.
    Freehand { points: Vec<Point> },
    /// Straight line segment.
    Line { start: Point, end: Point },
    /// Line segment with an arrow head at `end`.
    Arrow { start: Point, end: Point },
    /// Axis-aligned rectangle.
    Rectangle {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Axis-aligned ellipse.
    Ellipse {
        center: Point,
        radius_x: f64,
        radius_y: f64,
    },
    /// Text anchored at its baseline start.
    Text {
        position: Point,
        content: String,
        font_size: f32,
    },
}

impl ElementShape {
    /// Name of the shape kind.
    pub fn name(&self) -> &'static str {
        match self {
            ElementShape::Freehand { .. } => "freehand",
            ElementShape::Line { .. } => "line",
            ElementShape::Arrow { .. } => "arrow",
            ElementShape::Rectangle { .. } => "rectangle",
            ElementShape::Ellipse { .. } => "ellipse",
            ElementShape::Text { .. } => "text",
        }
    }

    /// Move the shape by `(dx, dy)`.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        match self {
            ElementShape::Freehand { points } => {
                for p in points.iter_mut() {
                    *p = p.translated(dx, dy);
                }
            }
            ElementShape::Line { start, end } | ElementShape::Arrow { start, end } => {
                *start = start.translated(dx, dy);
                *end = end.translated(dx, dy);
            }
            ElementShape::Rectangle { x, y, .. } => {
                *x += dx;
                *y += dy;
            }
            ElementShape::Ellipse { center, .. } => *center = center.translated(dx, dy),
            ElementShape::Text { position, .. } => *position = position.translated(dx, dy),
        }
    }

    /// Reject shapes with non-finite coordinates or negative extents.
    pub fn validate(&self) -> Result<()> {
        let finite = |p: &Point| p.x.is_finite() && p.y.is_finite();
        let ok = match self {
            ElementShape::Freehand { points } => !points.is_empty() && points.iter().all(finite),
            ElementShape::Line { start, end } | ElementShape::Arrow { start, end } => {
                finite(start) && finite(end)
            }
            ElementShape::Rectangle {
                x,
                y,
                width,
                height,
            } => finite(&Point::new(*x, *y)) && *width >= 0.0 && *height >= 0.0,
            ElementShape::Ellipse {
                center,
                radius_x,
                radius_y,
            } => finite(center) && *radius_x >= 0.0 && *radius_y >= 0.0,
            ElementShape::Text {
                position,
                font_size,
                ..
            } => finite(position) && font_size.is_finite() && *font_size > 0.0,
        };
        if ok {
            Ok(())
        } else {
            Err(EngineError::validation(format!(
                "invalid {} geometry",
                self.name()
            )))
        }
    }
}

/// Stroke and fill styling of an element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElementStyle {
    pub stroke: Rgba,
    pub stroke_width: f32,
    pub fill: Option<Rgba>,
}

impl Default for ElementStyle {
    fn default() -> Self {
        Self {
            stroke: Rgba::rgb(255, 0, 0),
            stroke_width: 2.0,
            fill: None,
        }
    }
}

/// One field-level change to a drawing element.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementUpdate {
    /// Replace the geometry.
    Shape(ElementShape),
    /// Set the stroke color.
    Stroke(Rgba),
    /// Set the stroke width.
    StrokeWidth(f32),
    /// Set or clear the fill color.
    Fill(Option<Rgba>),
    /// Move the geometry.
    Translate { dx: f64, dy: f64 },
}

impl ElementUpdate {
    pub fn validate(&self) -> Result<()> {
        match self {
            ElementUpdate::Shape(shape) => shape.validate(),
            ElementUpdate::StrokeWidth(w) if !w.is_finite() || *w < 0.0 => Err(
                EngineError::validation(format!("stroke width must be >= 0, got {}", w)),
            ),
            ElementUpdate::Translate { dx, dy } if !dx.is_finite() || !dy.is_finite() => {
                Err(EngineError::validation("translation must be finite"))
            }
            _ => Ok(()),
        }
    }
}

/// A drawing element on a layer.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawingElement {
    pub id: ElementId,
    pub shape: ElementShape,
    pub style: ElementStyle,
    /// Creation time, milliseconds since the UNIX epoch.
    pub created_at: u64,
    /// Last modification time, milliseconds since the UNIX epoch.
    pub updated_at: u64,
}

impl DrawingElement {
    pub fn new(id: ElementId, shape: ElementShape, style: ElementStyle) -> Self {
        let now = now_millis();
        Self {
            id,
            shape,
            style,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a single update without touching timestamps.
    pub fn apply(&mut self, update: &ElementUpdate) {
        match update {
            ElementUpdate::Shape(shape) => self.shape = shape.clone(),
            ElementUpdate::Stroke(color) => self.style.stroke = *color,
            ElementUpdate::StrokeWidth(width) => self.style.stroke_width = *width,
            ElementUpdate::Fill(fill) => self.style.fill = *fill,
            ElementUpdate::Translate { dx, dy } => self.shape.translate(*dx, *dy),
        }
    }

    /// Refresh `updated_at`, never moving it backwards.
    pub fn touch(&mut self) {
        self.updated_at = now_millis().max(self.updated_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translate_shapes() {
        let mut line = ElementShape::Line {
            start: Point::new(0.0, 0.0),
            end: Point::new(10.0, 5.0),
        };
        line.translate(2.0, -1.0);
        assert_eq!(
            line,
            ElementShape::Line {
                start: Point::new(2.0, -1.0),
                end: Point::new(12.0, 4.0),
            }
        );

        let mut rect = ElementShape::Rectangle {
            x: 1.0,
            y: 1.0,
            width: 4.0,
            height: 4.0,
        };
        rect.translate(1.0, 1.0);
        assert!(matches!(rect, ElementShape::Rectangle { x, y, .. } if x == 2.0 && y == 2.0));
    }

    #[test]
    fn test_apply_updates() {
        let mut element = DrawingElement::new(
            1,
            ElementShape::Freehand {
                points: vec![Point::new(1.0, 1.0)],
            },
            ElementStyle::default(),
        );
        element.apply(&ElementUpdate::StrokeWidth(5.0));
        element.apply(&ElementUpdate::Fill(Some(Rgba::WHITE)));
        element.apply(&ElementUpdate::Translate { dx: 1.0, dy: 2.0 });

        assert_eq!(element.style.stroke_width, 5.0);
        assert_eq!(element.style.fill, Some(Rgba::WHITE));
        assert_eq!(
            element.shape,
            ElementShape::Freehand {
                points: vec![Point::new(2.0, 3.0)]
            }
        );
    }

    #[test]
    fn test_validation() {
        assert!(ElementUpdate::StrokeWidth(-1.0).validate().is_err());
        assert!(
            ElementUpdate::Translate {
                dx: f64::NAN,
                dy: 0.0
            }
            .validate()
            .is_err()
        );
        assert!(ElementShape::Freehand { points: vec![] }.validate().is_err());
        assert!(
            ElementShape::Ellipse {
                center: Point::new(0.0, 0.0),
                radius_x: 3.0,
                radius_y: 2.0
            }
            .validate()
            .is_ok()
        );
    }

    #[test]
    fn test_touch_is_monotonic() {
        let mut element = DrawingElement::new(
            1,
            ElementShape::Line {
                start: Point::new(0.0, 0.0),
                end: Point::new(1.0, 1.0),
            },
            ElementStyle::default(),
        );
        element.updated_at = u64::MAX;
        element.touch();
        assert_eq!(element.updated_at, u64::MAX);
    }
}
