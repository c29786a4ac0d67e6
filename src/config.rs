use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Main configuration for the Cadence-Compositor
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Stroke-rate analysis settings
    pub cadence: CadenceConfig,

    /// Layer scaling and trimming settings
    pub timeline: TimelineConfig,

    /// Background music scoring settings
    pub music: MusicConfig,

    /// Template overlay layer names
    pub overlays: OverlayConfig,

    /// Batch variants and reel output
    pub batch: BatchConfig,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound { path: path.display().to_string() })?;

        let config: Config = toml::from_str(&content)
            .map_err(|_| ConfigError::ParseFailed { path: path.display().to_string() })?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::InvalidValue {
                key: "config".to_string(),
                value: e.to_string()
            })?;

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.cadence.validate()?;
        self.timeline.validate()?;
        self.music.validate()?;
        self.batch.validate()?;
        Ok(())
    }
}

/// Stroke-rate analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CadenceConfig {
    /// Lowest accepted spot rate (strokes per minute, inclusive)
    pub rate_limit_low: f64,

    /// Highest accepted spot rate (strokes per minute, inclusive)
    pub rate_limit_high: f64,
}

impl Default for CadenceConfig {
    fn default() -> Self {
        Self {
            rate_limit_low: 15.0,
            rate_limit_high: 50.0,
        }
    }
}

impl CadenceConfig {
    fn validate(&self) -> Result<()> {
        if !self.rate_limit_low.is_finite() || self.rate_limit_low <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "cadence.rate_limit_low".to_string(),
                value: self.rate_limit_low.to_string()
            }.into());
        }

        if !self.rate_limit_high.is_finite() || self.rate_limit_low >= self.rate_limit_high {
            return Err(ConfigError::InvalidValue {
                key: "cadence.rate_range".to_string(),
                value: format!("{}-{}", self.rate_limit_low, self.rate_limit_high)
            }.into());
        }

        Ok(())
    }
}

/// Timeline scaling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Absolute ceiling for any scaled out point (seconds)
    pub hard_cap: f64,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            hard_cap: 10800.0, // 3 hours
        }
    }
}

impl TimelineConfig {
    fn validate(&self) -> Result<()> {
        if !self.hard_cap.is_finite() || self.hard_cap <= 0.0 {
            return Err(ConfigError::InvalidValue {
                key: "timeline.hard_cap".to_string(),
                value: self.hard_cap.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Background music scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MusicConfig {
    /// Modulus applied to the name hash before the length penalty
    pub credit_modulus: i32,

    /// Seconds a track is preferred to outlast the composition by
    pub length_bias: f64,
}

impl Default for MusicConfig {
    fn default() -> Self {
        Self {
            credit_modulus: 30,
            length_bias: 10.0,
        }
    }
}

impl MusicConfig {
    fn validate(&self) -> Result<()> {
        if self.credit_modulus <= 0 {
            return Err(ConfigError::InvalidValue {
                key: "music.credit_modulus".to_string(),
                value: self.credit_modulus.to_string()
            }.into());
        }

        if !self.length_bias.is_finite() {
            return Err(ConfigError::InvalidValue {
                key: "music.length_bias".to_string(),
                value: self.length_bias.to_string()
            }.into());
        }

        Ok(())
    }
}

/// Names of template text layers that receive computed values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayConfig {
    /// Text layer showing the final average rate
    pub rate_layer: String,

    /// Text layer keyed with the running average at each stroke
    pub subtitle_layer: String,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            rate_layer: "text_rate".to_string(),
            subtitle_layer: "text_rate_subtitle".to_string(),
        }
    }
}

/// One output variant: a template id and the factor sources are stretched by
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantConfig {
    /// Template id (second field of `_template:<id>:<suffix>`)
    pub template: String,

    /// Time scale applied to the source (2.0 = half speed)
    pub scale_factor: f64,
}

impl VariantConfig {
    pub fn new<S: Into<String>>(template: S, scale_factor: f64) -> Self {
        Self {
            template: template.into(),
            scale_factor,
        }
    }
}

/// Batch run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Join every timeline of this template into one reel after the run
    pub reel_template: Option<String>,

    /// Variants produced for every source, in output order
    pub variants: Vec<VariantConfig>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            reel_template: None,
            variants: vec![
                VariantConfig::new("fullspeed", 1.0),
                VariantConfig::new("legacy", 2.0),
                VariantConfig::new("slowmotion", 8.0),
            ],
        }
    }
}

impl BatchConfig {
    /// Scale factor configured for a template id
    pub fn scale_factor_for(&self, template_id: &str) -> Option<f64> {
        self.variants
            .iter()
            .find(|variant| variant.template == template_id)
            .map(|variant| variant.scale_factor)
    }

    fn validate(&self) -> Result<()> {
        if self.variants.is_empty() {
            return Err(ConfigError::MissingKey {
                key: "batch.variants".to_string()
            }.into());
        }

        for variant in &self.variants {
            if !variant.scale_factor.is_finite() || variant.scale_factor <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    key: format!("batch.variants.{}.scale_factor", variant.template),
                    value: variant.scale_factor.to_string()
                }.into());
            }
        }

        Ok(())
    }
}
