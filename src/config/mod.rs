//! Configuration management for graphics-surface
//!
//! This module handles loading, parsing, and validating configuration
//! from TOML files: backend selection, default capability requests,
//! offscreen surface sizing and logging.

use crate::backend::{BackendFamily, QueryMechanism};
use crate::capability::CapabilityRequest;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

const MAX_COLOUR_DEPTH: u32 = 96;
const MAX_DEPTH_BUFFER_DEPTH: u32 = 32;
const MAX_ALPHA_DEPTH: u32 = 32;
const MAX_ACCUMULATION_DEPTH: u32 = 192;

/// Main configuration struct containing all surface package settings
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct SurfaceConfig {
    /// Backend family and query mechanism selection
    #[serde(default)]
    pub backend: BackendSettings,

    /// Capability request used when a caller has no opinion
    #[serde(default)]
    pub defaults: CapabilityRequest,

    /// Offscreen surface sizing
    #[serde(default)]
    pub offscreen: OffscreenConfig,

    /// Logging bootstrap
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct BackendSettings {
    /// Backend family; unset selects the family this build targets
    #[serde(default)]
    pub family: Option<BackendFamily>,

    /// Visual identifier applied to every surface whose own request has none
    #[serde(default)]
    pub override_visual_id: Option<u32>,

    /// Query mechanisms to treat as unavailable
    #[serde(default)]
    pub disabled_mechanisms: Vec<QueryMechanism>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OffscreenConfig {
    /// Width used when an offscreen surface is requested with width 0
    #[serde(default = "OffscreenConfig::default_size")]
    pub default_width: u32,

    /// Height used when an offscreen surface is requested with height 0
    #[serde(default = "OffscreenConfig::default_size")]
    pub default_height: u32,

    /// Upper bound on either dimension, on top of the driver's own limit
    #[serde(default)]
    pub max_size: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingConfig {
    /// Default filter ("error", "warn", "info", "debug", "trace"); RUST_LOG wins
    pub level: String,

    /// Prefix log lines with a timestamp
    pub timestamps: bool,
}

impl OffscreenConfig {
    fn default_size() -> u32 {
        256
    }
}

impl Default for OffscreenConfig {
    fn default() -> Self {
        Self {
            default_width: Self::default_size(),
            default_height: Self::default_size(),
            max_size: None,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            timestamps: true,
        }
    }
}

impl SurfaceConfig {
    /// Load configuration from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Expand ~ to home directory
        let expanded_path = if path.to_string_lossy().starts_with('~') {
            let home = std::env::var("HOME").context("Failed to get HOME environment variable")?;
            Path::new(&home).join(path.strip_prefix("~").unwrap_or(path))
        } else {
            path.to_path_buf()
        };

        let contents = fs::read_to_string(&expanded_path)
            .with_context(|| format!("Failed to read config file: {}", expanded_path.display()))?;

        Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to load config file: {}", expanded_path.display()))
    }

    /// Parse and validate configuration held in memory
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: SurfaceConfig =
            toml::from_str(contents).context("Failed to parse configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.offscreen.default_width == 0 || self.offscreen.default_height == 0 {
            anyhow::bail!("Invalid offscreen size: default width and height must be non-zero");
        }
        if self.offscreen.max_size == Some(0) {
            anyhow::bail!("Invalid offscreen max_size: must be non-zero when set");
        }

        let defaults = &self.defaults;
        if defaults.min_colour_depth() > MAX_COLOUR_DEPTH {
            anyhow::bail!(
                "Invalid colour depth {}: must be at most {} bits",
                defaults.min_colour_depth(),
                MAX_COLOUR_DEPTH
            );
        }
        if defaults.min_depth_buffer_depth() > MAX_DEPTH_BUFFER_DEPTH {
            anyhow::bail!(
                "Invalid depth buffer depth {}: must be at most {} bits",
                defaults.min_depth_buffer_depth(),
                MAX_DEPTH_BUFFER_DEPTH
            );
        }
        if defaults.min_alpha_depth() > MAX_ALPHA_DEPTH {
            anyhow::bail!(
                "Invalid alpha depth {}: must be at most {} bits",
                defaults.min_alpha_depth(),
                MAX_ALPHA_DEPTH
            );
        }
        if defaults.min_accumulation_depth() > MAX_ACCUMULATION_DEPTH {
            anyhow::bail!(
                "Invalid accumulation depth {}: must be at most {} bits",
                defaults.min_accumulation_depth(),
                MAX_ACCUMULATION_DEPTH
            );
        }

        let valid_levels = ["off", "error", "warn", "info", "debug", "trace"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            anyhow::bail!("Invalid log level: {}", self.logging.level);
        }

        Ok(())
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let contents = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, contents).context("Failed to write configuration file")?;

        Ok(())
    }

    /// Merge a partial configuration into this one
    /// Sections of the partial config that differ from the defaults win
    pub fn merge_partial(mut self, partial: SurfaceConfig) -> Self {
        let default_config = SurfaceConfig::default();

        if partial.backend != default_config.backend {
            self.backend = partial.backend;
        }
        if partial.defaults != default_config.defaults {
            self.defaults = partial.defaults;
        }
        if partial.offscreen != default_config.offscreen {
            self.offscreen = partial.offscreen;
        }
        if partial.logging != default_config.logging {
            self.logging = partial.logging;
        }

        self
    }
}
