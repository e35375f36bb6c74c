//! Configuration management.
//!
//! Configuration is loaded from a TOML file in the platform config
//! directory, with defaults for anything missing. The loaded [`Config`] is
//! also the structured source the pipeline resolves its per-call
//! [`CompressorSettings`] from.

mod resolve;
mod types;
mod validate;

pub use resolve::{
    CompressorSettings, ConfigResolver, PropertySource, COMPRESSION_RATIO_KEY,
    RESIZE_FACTOR_FX_KEY, RESIZE_FACTOR_FY_KEY,
};
pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resize and recompression settings
    pub compressor: CompressorConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.biocompress.biocompress/config.toml
    /// - Linux: ~/.config/biocompress/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\biocompress\config\config.toml
    ///
    /// Falls back to ~/.biocompress/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "biocompress", "biocompress")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".biocompress").join("config.toml")
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}
