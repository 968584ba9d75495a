//! Drawing style passed to surface primitives.
//!
//! Mirrors the handful of 2D canvas state fields the engine needs:
//! stroke color and width, optional fill, global alpha and font.

use crate::color::Rgba;

/// Font selection for text primitives.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// Family name, e.g. `sans-serif`.
    pub family: String,
    /// Size in pixels.
    pub size: f32,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "sans-serif".to_string(),
            size: 14.0,
        }
    }
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: f32) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }
}

/// Style state for a single draw call.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawStyle {
    /// Stroke color for lines and outlines.
    pub stroke: Rgba,
    /// Stroke width in pixels.
    pub stroke_width: f32,
    /// Fill color for closed shapes and text. `None` draws outlines only.
    pub fill: Option<Rgba>,
    /// Global alpha multiplied into every draw, in `[0, 1]`.
    pub alpha: f32,
    pub font: FontSpec,
}

impl Default for DrawStyle {
    fn default() -> Self {
        Self {
            stroke: Rgba::BLACK,
            stroke_width: 2.0,
            fill: None,
            alpha: 1.0,
            font: FontSpec::default(),
        }
    }
}

impl DrawStyle {
    /// Solid fill with the given global alpha and no stroke width.
    pub fn fill(color: Rgba, alpha: f32) -> Self {
        Self {
            stroke: color,
            stroke_width: 0.0,
            fill: Some(color),
            alpha,
            ..Default::default()
        }
    }

    pub fn with_stroke(mut self, color: Rgba) -> Self {
        self.stroke = color;
        self
    }

    pub fn with_stroke_width(mut self, width: f32) -> Self {
        self.stroke_width = width;
        self
    }

    pub fn with_fill(mut self, color: Rgba) -> Self {
        self.fill = Some(color);
        self
    }

    pub fn with_alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    /// Color used for filled primitives: the fill if set, else the stroke.
    pub fn fill_color(&self) -> Rgba {
        self.fill.unwrap_or(self.stroke)
    }
}
