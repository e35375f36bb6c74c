//! Sub-configuration structs with their defaults.

use serde::{Deserialize, Serialize};

/// Default horizontal resize factor.
pub const DEFAULT_RESIZE_FACTOR_FX: f32 = 0.25;

/// Default vertical resize factor.
pub const DEFAULT_RESIZE_FACTOR_FY: f32 = 0.25;

/// Default codec compression parameter (thousandths scale).
pub const DEFAULT_COMPRESSION_RATIO: i32 = 50;

/// Resize and recompression settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorConfig {
    /// Horizontal scale multiplier, > 0
    pub resize_factor_fx: f32,

    /// Vertical scale multiplier, > 0
    pub resize_factor_fy: f32,

    /// Compression parameter in the container's 1..=1000 scale
    pub compression_ratio: i32,
}

impl Default for CompressorConfig {
    fn default() -> Self {
        Self {
            resize_factor_fx: DEFAULT_RESIZE_FACTOR_FX,
            resize_factor_fy: DEFAULT_RESIZE_FACTOR_FY,
            compression_ratio: DEFAULT_COMPRESSION_RATIO,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}
