//! Host settings file.
//!
//! # TOML Format
//!
//! ```toml
//! [storage]
//! dir = "/home/me/.config/pedalboard/store"
//! namespace = "default"
//! seed_factory_presets = true
//!
//! [chain]
//! default_output_level = 1.0
//! sample_rate = 48000
//! ```
//!
//! Every field is optional; missing fields take their defaults.

use std::path::{Path, PathBuf};

use pedalboard_core::{MIX_DEFAULT, MIX_MAX, MIX_MIN};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::paths;

/// Default store namespace.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Where and how presets are persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Store directory. `None` uses the platform default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
    /// Namespace inside the store.
    pub namespace: String,
    /// Seed factory presets into an empty store.
    pub seed_factory_presets: bool,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            dir: None,
            namespace: DEFAULT_NAMESPACE.to_string(),
            seed_factory_presets: true,
        }
    }
}

impl StorageSettings {
    /// Store directory with the platform default applied.
    pub fn resolved_dir(&self) -> PathBuf {
        self.dir.clone().unwrap_or_else(paths::default_store_dir)
    }
}

/// Chain defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainSettings {
    /// Output level of a fresh chain.
    pub default_output_level: f64,
    /// Sample rate used to express latency in time units.
    pub sample_rate: u32,
}

impl Default for ChainSettings {
    fn default() -> Self {
        Self {
            default_output_level: MIX_DEFAULT,
            sample_rate: 48000,
        }
    }
}

impl ChainSettings {
    /// Convert a latency in samples to milliseconds.
    pub fn latency_ms(&self, samples: u32) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        f64::from(samples) * 1000.0 / f64::from(self.sample_rate)
    }
}

/// All host settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PedalboardConfig {
    /// Preset persistence.
    pub storage: StorageSettings,
    /// Chain defaults.
    pub chain: ChainSettings,
}

impl PedalboardConfig {
    /// Parse settings from a TOML string and validate them.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Load settings from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::read_file(path, e))?;
        Self::from_toml(&content)
    }

    /// Load settings from `path`, or the default settings file when `None`.
    /// A missing file yields the defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let path = path.map_or_else(paths::default_config_path, Path::to_path_buf);
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no settings file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Save settings to a TOML file, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            paths::ensure_dir(parent)?;
        }
        let content = self.to_toml()?;
        std::fs::write(path, content).map_err(|e| ConfigError::write_file(path, e))?;
        Ok(())
    }

    /// Reject values no chain can use.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let level = self.chain.default_output_level;
        if !(MIX_MIN..=MIX_MAX).contains(&level) {
            return Err(ConfigError::InvalidSetting {
                field: "chain.default_output_level",
                reason: format!("{level} is outside [{MIX_MIN}, {MIX_MAX}]"),
            });
        }
        if self.storage.namespace.trim().is_empty() {
            return Err(ConfigError::InvalidSetting {
                field: "storage.namespace",
                reason: "must not be empty".to_string(),
            });
        }
        Ok(())
    }
}
