//! The annotation engine.
//!
//! Owns one optional raster surface, the three effect registries and the
//! layer document. Creation methods only touch registries; `apply_blur`,
//! `draw_highlight` and `draw_measurement` are the only pixel writers, and
//! they do nothing (with a warning) while no surface is bound.

use pixnote_raster::{DrawStyle, FontSpec, RasterSurface};

use crate::config::EngineConfig;
use crate::document::Document;
use crate::effects::blur::{self, BlurRegion};
use crate::effects::highlight::{self, HighlightRegion};
use crate::effects::measurement::{self, MeasurementResult, MeasurementUnit};
use crate::effects::sample;
use crate::error::{EngineError, Result};
use crate::registry::Registry;

/// A raster surface the engine can own.
pub type BoxedSurface = Box<dyn RasterSurface + Send>;

pub struct AnnotationEngine {
    config: EngineConfig,
    surface: Option<BoxedSurface>,
    measurement_style: DrawStyle,
    measurements: Registry<MeasurementResult>,
    blur_regions: Registry<BlurRegion>,
    highlight_regions: Registry<HighlightRegion>,
    document: Document,
}

impl std::fmt::Debug for AnnotationEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnnotationEngine")
            .field("surface", &self.surface.as_ref().map(|s| s.size()))
            .field("measurements", &self.measurements.len())
            .field("blur_regions", &self.blur_regions.len())
            .field("highlight_regions", &self.highlight_regions.len())
            .field("layers", &self.document.layer_count())
            .finish()
    }
}

impl AnnotationEngine {
    /// Create an engine with default configuration and no surface.
    pub fn new() -> Result<Self> {
        Self::with_config(EngineConfig::default())
    }

    /// Create an engine from a validated configuration. The document starts
    /// with its base layer, active and outside of history.
    ///
    /// Also applies `config.log_level` as the global `log` max level.
    pub fn with_config(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        log::set_max_level(config.log_level.to_level_filter());
        log::debug!("Log level set to {:?}", config.log_level);
        let style = &config.measurement_style;
        let measurement_style = DrawStyle::default()
            .with_stroke(style.rgba()?)
            .with_stroke_width(style.line_width)
            .with_font(FontSpec::new("sans-serif", style.font_size));
        let document = Document::with_base_layer(&config.base_layer_name, config.max_undo_steps)?;

        Ok(Self {
            config,
            surface: None,
            measurement_style,
            measurements: Registry::new("measurement"),
            blur_regions: Registry::new("blur"),
            highlight_regions: Registry::new("highlight"),
            document,
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Style used for measurements when the caller has none of its own.
    pub fn measurement_style(&self) -> &DrawStyle {
        &self.measurement_style
    }

    // ========================================================================
    // Surface binding
    // ========================================================================

    /// Bind a surface, returning the previously bound one.
    pub fn bind_surface(&mut self, surface: BoxedSurface) -> Option<BoxedSurface> {
        let (w, h) = surface.size();
        log::info!("Bound {}x{} raster surface", w, h);
        self.surface.replace(surface)
    }

    pub fn unbind_surface(&mut self) -> Option<BoxedSurface> {
        let surface = self.surface.take();
        if surface.is_some() {
            log::info!("Unbound raster surface");
        }
        surface
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    pub fn surface(&self) -> Option<&(dyn RasterSurface + Send)> {
        self.surface.as_deref()
    }

    pub fn surface_mut(&mut self) -> Option<&mut (dyn RasterSurface + Send + 'static)> {
        self.surface.as_deref_mut()
    }

    fn drawing_surface(
        &mut self,
        operation: &str,
    ) -> Option<&mut (dyn RasterSurface + Send + 'static)> {
        if self.surface.is_none() {
            log::warn!("{}: no surface bound, skipping", operation);
        }
        self.surface.as_deref_mut()
    }

    // ========================================================================
    // Measurements
    // ========================================================================

    pub fn create_measurement(
        &mut self,
        start_x: f64,
        start_y: f64,
        end_x: f64,
        end_y: f64,
        unit: MeasurementUnit,
    ) -> Result<MeasurementResult> {
        measurement::validate_coordinates(&[
            ("start_x", start_x),
            ("start_y", start_y),
            ("end_x", end_x),
            ("end_y", end_y),
        ])?;
        let (distance, angle) = measurement::segment_geometry(start_x, start_y, end_x, end_y);

        let id = self.measurements.allocate_id();
        Ok(self.measurements.insert(MeasurementResult {
            id,
            start_x,
            start_y,
            end_x,
            end_y,
            distance,
            angle,
            unit,
        }))
    }

    pub fn draw_measurement(&mut self, measurement: &MeasurementResult, style: &DrawStyle) {
        if let Some(surface) = self.drawing_surface("draw_measurement") {
            measurement::draw_measurement(surface, measurement, style);
        }
    }

    /// Draw every registered measurement in creation order.
    pub fn draw_all_measurements(&mut self, style: &DrawStyle) {
        let Some(surface) = self.surface.as_deref_mut() else {
            log::warn!("draw_all_measurements: no surface bound, skipping");
            return;
        };
        for m in self.measurements.as_slice() {
            measurement::draw_measurement(surface, m, style);
        }
    }

    pub fn measurements(&self) -> &[MeasurementResult] {
        self.measurements.as_slice()
    }

    pub fn measurement(&self, id: &str) -> Option<&MeasurementResult> {
        self.measurements.get(id)
    }

    // ========================================================================
    // Blur
    // ========================================================================

    /// Register a blur region. `blur_radius` defaults to the configured value.
    pub fn create_blur_region(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        blur_radius: Option<u32>,
    ) -> Result<BlurRegion> {
        let blur_radius = blur_radius.unwrap_or(self.config.default_blur_radius);
        blur::validate_blur(width, height, blur_radius)?;

        let id = self.blur_regions.allocate_id();
        Ok(self.blur_regions.insert(BlurRegion {
            id,
            x,
            y,
            width,
            height,
            blur_radius,
        }))
    }

    /// Blur the region's pixels on the bound surface.
    pub fn apply_blur(&mut self, region: &BlurRegion) -> Result<()> {
        self.apply_blur_with(region, |_| true).map(|_| ())
    }

    /// Blur pass by pass, calling `keep_going(pass_index)` before each pass.
    ///
    /// Returning `false` stops early; the passes completed so far are written
    /// back. Returns the number of passes applied (0 when no surface is bound).
    pub fn apply_blur_with(
        &mut self,
        region: &BlurRegion,
        keep_going: impl FnMut(u32) -> bool,
    ) -> Result<u32> {
        let Some(surface) = self.drawing_surface("apply_blur") else {
            return Ok(0);
        };
        let rect = region.rect();
        let pixels = surface.get_pixels(rect)?;
        let (blurred, passes) = blur::box_blur_until(&pixels, region.blur_radius, keep_going);
        surface.put_pixels(rect, &blurred)?;

        log::debug!("Applied {} blur passes to {}", passes, region.id);
        Ok(passes)
    }

    /// Apply every registered blur in creation order.
    pub fn apply_all_blurs(&mut self) -> Result<()> {
        let regions = self.blur_regions.as_slice().to_vec();
        for region in &regions {
            self.apply_blur(region)?;
        }
        Ok(())
    }

    pub fn blur_regions(&self) -> &[BlurRegion] {
        self.blur_regions.as_slice()
    }

    pub fn blur_region(&self, id: &str) -> Option<&BlurRegion> {
        self.blur_regions.get(id)
    }

    // ========================================================================
    // Highlights
    // ========================================================================

    pub fn create_highlight_region(
        &mut self,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        color: &str,
        opacity: f32,
    ) -> Result<HighlightRegion> {
        let color = highlight::validate_highlight(width, height, color, opacity)?;

        let id = self.highlight_regions.allocate_id();
        Ok(self.highlight_regions.insert(HighlightRegion {
            id,
            x,
            y,
            width,
            height,
            color,
            opacity,
        }))
    }

    pub fn draw_highlight(&mut self, region: &HighlightRegion) {
        if let Some(surface) = self.drawing_surface("draw_highlight") {
            highlight::draw_highlight(surface, region);
        }
    }

    /// Composite every registered highlight in creation order.
    pub fn draw_all_highlights(&mut self) {
        let Some(surface) = self.surface.as_deref_mut() else {
            log::warn!("draw_all_highlights: no surface bound, skipping");
            return;
        };
        for region in self.highlight_regions.as_slice() {
            highlight::draw_highlight(surface, region);
        }
    }

    pub fn highlight_regions(&self) -> &[HighlightRegion] {
        self.highlight_regions.as_slice()
    }

    pub fn highlight_region(&self, id: &str) -> Option<&HighlightRegion> {
        self.highlight_regions.get(id)
    }

    // ========================================================================
    // Sampling and reset
    // ========================================================================

    /// Color of the pixel at `(x, y)` as `rgb(r, g, b)`.
    pub fn pick_color(&self, x: u32, y: u32) -> Result<String> {
        let surface = self.surface.as_deref().ok_or(EngineError::SurfaceUnavailable)?;
        Ok(sample::sample_pixel(surface, x, y)?.to_rgb_string())
    }

    /// Forget every measurement, blur and highlight record. Surface pixels and
    /// layers are left alone.
    pub fn clear_all(&mut self) {
        log::info!(
            "Clearing {} measurements, {} blur regions, {} highlights",
            self.measurements.len(),
            self.blur_regions.len(),
            self.highlight_regions.len()
        );
        self.measurements.clear();
        self.blur_regions.clear();
        self.highlight_regions.clear();
    }

    // ========================================================================
    // Layers
    // ========================================================================

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.document
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pixnote_raster::{ImageSurface, Rgba};

    fn engine_with_surface(width: u32, height: u32, color: Rgba) -> AnnotationEngine {
        let mut engine = AnnotationEngine::new().unwrap();
        engine.bind_surface(Box::new(ImageSurface::filled(width, height, color)));
        engine
    }

    #[test]
    fn test_create_measurement_stores_result() {
        let mut engine = AnnotationEngine::new().unwrap();
        let m = engine
            .create_measurement(0.0, 0.0, 3.0, 4.0, MeasurementUnit::Px)
            .unwrap();
        assert_eq!(m.distance, 5.0);
        assert!((m.angle - 53.13).abs() < 0.01);
        assert_eq!(engine.measurements(), &[m.clone()]);
        assert_eq!(engine.measurement(&m.id), Some(&m));
    }

    #[test]
    fn test_create_measurement_rejects_negative() {
        let mut engine = AnnotationEngine::new().unwrap();
        assert!(matches!(
            engine.create_measurement(-1.0, 0.0, 3.0, 4.0, MeasurementUnit::Px),
            Err(EngineError::Validation { .. })
        ));
        assert!(engine.measurements().is_empty());
    }

    #[test]
    fn test_blur_region_defaults_and_validation() {
        let mut engine = AnnotationEngine::new().unwrap();
        let region = engine.create_blur_region(0, 0, 4, 4, None).unwrap();
        assert_eq!(region.blur_radius, 10);
        assert!(engine.create_blur_region(0, 0, 0, 4, None).is_err());
        assert!(engine.create_blur_region(0, 0, 4, 4, Some(51)).is_err());
        assert_eq!(engine.blur_regions().len(), 1);
    }

    #[test]
    fn test_rendering_without_surface_is_noop() {
        let mut engine = AnnotationEngine::new().unwrap();
        let region = engine.create_blur_region(0, 0, 2, 2, Some(1)).unwrap();
        assert_eq!(engine.apply_blur_with(&region, |_| true).unwrap(), 0);
        assert!(engine.apply_blur(&region).is_ok());

        let h = engine
            .create_highlight_region(0, 0, 2, 2, "yellow", 0.5)
            .unwrap();
        engine.draw_highlight(&h);
        let m = engine
            .create_measurement(0.0, 0.0, 1.0, 1.0, MeasurementUnit::Px)
            .unwrap();
        let style = engine.measurement_style().clone();
        engine.draw_measurement(&m, &style);
    }

    #[test]
    fn test_surface_mut_writes_through() {
        let mut engine = engine_with_surface(2, 2, Rgba::BLACK);
        let patch = pixnote_raster::PixelBuffer::filled(1, 1, Rgba::rgb(7, 8, 9));
        engine
            .surface_mut()
            .unwrap()
            .put_pixels(pixnote_raster::Rect::new(1, 0, 1, 1), &patch)
            .unwrap();
        assert_eq!(engine.pick_color(1, 0).unwrap(), "rgb(7, 8, 9)");

        engine.unbind_surface();
        assert!(engine.surface_mut().is_none());
    }

    #[test]
    fn test_registry_ids_are_sequential_per_kind() {
        let mut engine = AnnotationEngine::new().unwrap();
        for n in 1..=2 {
            let m = engine
                .create_measurement(0.0, 0.0, 1.0, 1.0, MeasurementUnit::Px)
                .unwrap();
            let b = engine.create_blur_region(0, 0, 1, 1, Some(1)).unwrap();
            let h = engine
                .create_highlight_region(0, 0, 1, 1, "red", 0.5)
                .unwrap();
            assert_eq!(m.id, format!("measurement-{}", n));
            assert_eq!(b.id, format!("blur-{}", n));
            assert_eq!(h.id, format!("highlight-{}", n));
        }
    }

    #[test]
    fn test_pick_color() {
        let engine = engine_with_surface(3, 3, Rgba::new(10, 20, 30, 40));
        assert_eq!(engine.pick_color(1, 2).unwrap(), "rgb(10, 20, 30)");
        assert!(matches!(
            engine.pick_color(3, 0),
            Err(EngineError::Raster(_))
        ));

        let unbound = AnnotationEngine::new().unwrap();
        assert!(matches!(
            unbound.pick_color(0, 0),
            Err(EngineError::SurfaceUnavailable)
        ));
    }

    #[test]
    fn test_draw_highlight_composites_without_mutating_record() {
        let mut engine = engine_with_surface(4, 4, Rgba::BLACK);
        let region = engine
            .create_highlight_region(1, 1, 2, 2, "#ffff00", 0.5)
            .unwrap();
        engine.draw_highlight(&region);

        assert_eq!(engine.pick_color(1, 1).unwrap(), "rgb(128, 128, 0)");
        assert_eq!(engine.pick_color(0, 0).unwrap(), "rgb(0, 0, 0)");
        assert_eq!(engine.highlight_region(&region.id), Some(&region));
    }

    #[test]
    fn test_apply_blur_out_of_bounds_fails() {
        let mut engine = engine_with_surface(4, 4, Rgba::BLACK);
        let region = engine.create_blur_region(2, 2, 4, 4, Some(1)).unwrap();
        assert!(matches!(
            engine.apply_blur(&region),
            Err(EngineError::Raster(_))
        ));
    }

    #[test]
    fn test_clear_all_keeps_ids_unique() {
        let mut engine = AnnotationEngine::new().unwrap();
        let first = engine
            .create_measurement(0.0, 0.0, 1.0, 0.0, MeasurementUnit::Px)
            .unwrap();
        engine.create_blur_region(0, 0, 1, 1, Some(1)).unwrap();
        engine
            .create_highlight_region(0, 0, 1, 1, "red", 1.0)
            .unwrap();

        engine.clear_all();
        assert!(engine.measurements().is_empty());
        assert!(engine.blur_regions().is_empty());
        assert!(engine.highlight_regions().is_empty());

        let second = engine
            .create_measurement(0.0, 0.0, 1.0, 0.0, MeasurementUnit::Px)
            .unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_engine_starts_with_base_layer() {
        let engine = AnnotationEngine::new().unwrap();
        assert_eq!(
            engine.document().active_layer().unwrap().name,
            "Base Layer"
        );
        assert!(!engine.document().can_undo());
    }

    #[test]
    fn test_rejects_invalid_config() {
        let config = EngineConfig {
            max_undo_steps: 0,
            ..Default::default()
        };
        assert!(AnnotationEngine::with_config(config).is_err());
    }
}
