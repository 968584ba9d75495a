//! Engine configuration.
//!
//! Settings are plain serde structs so they can be exported to and imported
//! from JSON. Missing fields fall back to their defaults.

use std::path::Path;

use pixnote_raster::Rgba;
use serde::{Deserialize, Serialize};

use crate::constants::{
    BASE_LAYER_NAME, DEFAULT_BLUR_RADIUS, DEFAULT_MAX_UNDO_STEPS, MAX_BLUR_RADIUS,
    MIN_BLUR_RADIUS,
};
use crate::error::{EngineError, Result};

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Log level setting for the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Default appearance of measurement overlays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeasurementStyle {
    /// Line, marker and label color (any CSS-style color string)
    pub color: String,
    /// Line width in pixels
    pub line_width: f32,
    /// Label font size in pixels
    pub font_size: f32,
}

impl Default for MeasurementStyle {
    fn default() -> Self {
        Self {
            color: "#ff0000".to_string(),
            line_width: 2.0,
            font_size: 14.0,
        }
    }
}

impl MeasurementStyle {
    /// Parse the configured color.
    pub fn rgba(&self) -> Result<Rgba> {
        Ok(self.color.parse::<Rgba>()?)
    }
}

/// Configuration for an [`AnnotationEngine`](crate::AnnotationEngine).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Maximum number of records kept on the undo stack
    pub max_undo_steps: usize,

    /// Blur radius used when none is given
    pub default_blur_radius: u32,

    /// Measurement overlay appearance
    pub measurement_style: MeasurementStyle,

    /// Name of the layer every new document starts with
    pub base_layer_name: String,

    /// Log verbosity level
    pub log_level: LogLevel,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            max_undo_steps: DEFAULT_MAX_UNDO_STEPS,
            default_blur_radius: DEFAULT_BLUR_RADIUS,
            measurement_style: MeasurementStyle::default(),
            base_layer_name: BASE_LAYER_NAME.to_string(),
            log_level: LogLevel::default(),
        }
    }
}

impl EngineConfig {
    /// Check that every setting lies in its allowed domain.
    pub fn validate(&self) -> Result<()> {
        if self.version > CONFIG_VERSION {
            return Err(EngineError::validation(format!(
                "config version {} is newer than supported version {}",
                self.version, CONFIG_VERSION
            )));
        }
        if self.max_undo_steps == 0 {
            return Err(EngineError::validation("max_undo_steps must be at least 1"));
        }
        if !(MIN_BLUR_RADIUS..=MAX_BLUR_RADIUS).contains(&self.default_blur_radius) {
            return Err(EngineError::validation(format!(
                "default_blur_radius must be in {}..={}, got {}",
                MIN_BLUR_RADIUS, MAX_BLUR_RADIUS, self.default_blur_radius
            )));
        }
        if self.base_layer_name.trim().is_empty() {
            return Err(EngineError::validation("base_layer_name must not be empty"));
        }
        self.measurement_style.rgba()?;
        Ok(())
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize and validate configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Save configuration to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.to_json()?)?;
        log::info!("Saved configuration to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = EngineConfig::default();
        assert_eq!(config.max_undo_steps, 50);
        assert_eq!(config.default_blur_radius, 10);
        assert_eq!(config.base_layer_name, "Base Layer");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_json_roundtrip_with_missing_fields() {
        let config = EngineConfig::from_json(r#"{ "max_undo_steps": 5 }"#).unwrap();
        assert_eq!(config.max_undo_steps, 5);
        assert_eq!(config.default_blur_radius, DEFAULT_BLUR_RADIUS);

        let json = config.to_json().unwrap();
        assert_eq!(EngineConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_out_of_range_values() {
        assert!(EngineConfig::from_json(r#"{ "default_blur_radius": 51 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "max_undo_steps": 0 }"#).is_err());
        assert!(EngineConfig::from_json(r#"{ "version": 99 }"#).is_err());
        assert!(
            EngineConfig::from_json(r#"{ "measurement_style": { "color": "nope" } }"#).is_err()
        );
    }

    #[test]
    fn test_log_level_lowercase() {
        let config = EngineConfig::from_json(r#"{ "log_level": "trace" }"#).unwrap();
        assert_eq!(config.log_level.to_level_filter(), log::LevelFilter::Trace);
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("pixnote-config-{}", std::process::id()));
        let path = dir.join("engine.json");
        let config = EngineConfig {
            max_undo_steps: 7,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(EngineConfig::load(&path).unwrap(), config);
        let _ = std::fs::remove_dir_all(dir);
    }
}
