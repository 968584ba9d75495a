//! Translucent highlight overlays.

use pixnote_raster::{DrawStyle, RasterSurface, Rect, Rgba};

use crate::error::{EngineError, Result};
use crate::registry::RegionRecord;

/// A registered highlight. Drawing composites over the surface and never
/// changes this record.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightRegion {
    pub id: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub color: Rgba,
    /// Fill opacity in `[0, 1]`.
    pub opacity: f32,
}

impl RegionRecord for HighlightRegion {
    fn id(&self) -> &str {
        &self.id
    }
}

impl HighlightRegion {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

/// Parse and check highlight parameters, returning the parsed color.
pub fn validate_highlight(width: u32, height: u32, color: &str, opacity: f32) -> Result<Rgba> {
    if width < 1 || height < 1 {
        return Err(EngineError::validation(format!(
            "highlight region must be at least 1x1, got {}x{}",
            width, height
        )));
    }
    if !(0.0..=1.0).contains(&opacity) {
        return Err(EngineError::validation(format!(
            "opacity must be in [0, 1], got {}",
            opacity
        )));
    }
    color
        .parse::<Rgba>()
        .map_err(|e| EngineError::validation(e.to_string()))
}

/// Composite the highlight fill over its rectangle with a straight alpha blend.
pub fn draw_highlight(surface: &mut dyn RasterSurface, region: &HighlightRegion) {
    let style = DrawStyle::fill(region.color, region.opacity);
    surface.draw_filled_rect(region.rect(), &style);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_highlight() {
        assert_eq!(
            validate_highlight(4, 4, "#ffff00", 0.4).unwrap(),
            Rgba::rgb(255, 255, 0)
        );
        assert!(validate_highlight(0, 4, "#ffff00", 0.4).is_err());
        assert!(validate_highlight(4, 4, "#ffff00", 1.01).is_err());
        assert!(validate_highlight(4, 4, "#ffff00", f32::NAN).is_err());
        assert!(matches!(
            validate_highlight(4, 4, "not-a-color", 0.5),
            Err(EngineError::Validation { .. })
        ));
    }
}
