//! Lamina configuration (lamina.toml)
//!
//! Every field has a default, so an empty document is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid TOML or has the wrong shape
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A value is out of range
    #[error("Invalid config value for {field}: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct LaminaConfig {
    #[serde(default)]
    pub frame: FrameConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub momentum: MomentumConfig,
}

/// Frame delivery settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct FrameConfig {
    /// Upper bound on back-to-back immediate frames run by one delivery
    #[serde(default = "default_max_immediate_frames")]
    pub max_immediate_frames: u32,
}

fn default_max_immediate_frames() -> u32 {
    8
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_immediate_frames: default_max_immediate_frames(),
        }
    }
}

/// Presentation write settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RenderConfig {
    /// Append `translateZ(0)` to 2D transforms to request a compositing layer
    #[serde(default = "default_true")]
    pub hardware_acceleration_hint: bool,
    /// Unit suffix for lengths written to the presentation tree
    #[serde(default = "default_length_unit")]
    pub length_unit: String,
}

fn default_true() -> bool {
    true
}

fn default_length_unit() -> String {
    "px".to_string()
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            hardware_acceleration_hint: true,
            length_unit: default_length_unit(),
        }
    }
}

/// Fling projection settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MomentumConfig {
    /// Projection window in milliseconds
    #[serde(default = "default_momentum_duration")]
    pub duration_ms: f64,
    /// Acceleration at or below this magnitude projects no motion
    #[serde(default = "default_min_acceleration")]
    pub min_acceleration: f64,
    /// Weight of the acceleration term in the projection
    #[serde(default = "default_friction")]
    pub friction: f64,
}

fn default_momentum_duration() -> f64 {
    300.0
}

fn default_min_acceleration() -> f64 {
    1.0 / 50.0
}

fn default_friction() -> f64 {
    0.001
}

impl Default for MomentumConfig {
    fn default() -> Self {
        Self {
            duration_ms: default_momentum_duration(),
            min_acceleration: default_min_acceleration(),
            friction: default_friction(),
        }
    }
}

impl LaminaConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: LaminaConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let source = fs::read_to_string(path.as_ref())?;
        let config = Self::from_toml_str(&source)?;
        tracing::debug!(path = %path.as_ref().display(), "loaded lamina config");
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        let momentum = &self.momentum;
        check_non_negative("momentum.duration_ms", momentum.duration_ms)?;
        check_non_negative("momentum.min_acceleration", momentum.min_acceleration)?;
        check_non_negative("momentum.friction", momentum.friction)?;
        if self.render.length_unit.trim().is_empty() {
            return Err(ConfigError::Invalid {
                field: "render.length_unit",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn check_non_negative(field: &'static str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(ConfigError::Invalid {
            field,
            reason: format!("expected a finite, non-negative number, got {value}"),
        });
    }
    Ok(())
}
