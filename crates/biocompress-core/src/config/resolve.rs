//! Per-call resolution of the compressor tunables.
//!
//! Settings are layered: hardcoded defaults, then a structured
//! [`PropertySource`], then a flat string-keyed override map. Resolution
//! never fails. A lookup or parse error stops that layer and whatever was
//! written before it stays in place.

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::ConfigError;

use super::types::{
    DEFAULT_COMPRESSION_RATIO, DEFAULT_RESIZE_FACTOR_FX, DEFAULT_RESIZE_FACTOR_FY,
};
use super::Config;

/// Property key for the horizontal resize factor.
pub const RESIZE_FACTOR_FX_KEY: &str = "bio.image.compressor.resize.factor.fx";

/// Property key for the vertical resize factor.
pub const RESIZE_FACTOR_FY_KEY: &str = "bio.image.compressor.resize.factor.fy";

/// Property key for the compression ratio.
pub const COMPRESSION_RATIO_KEY: &str = "bio.image.compressor.compression.ratio";

/// A structured configuration source answering typed lookups.
///
/// `Ok(None)` means the key is not set; `Err` means the source itself
/// could not be read.
pub trait PropertySource: Send + Sync {
    fn float_property(&self, key: &str) -> Result<Option<f32>, ConfigError>;

    fn int_property(&self, key: &str) -> Result<Option<i32>, ConfigError>;
}

impl PropertySource for Config {
    fn float_property(&self, key: &str) -> Result<Option<f32>, ConfigError> {
        Ok(match key {
            RESIZE_FACTOR_FX_KEY => Some(self.compressor.resize_factor_fx),
            RESIZE_FACTOR_FY_KEY => Some(self.compressor.resize_factor_fy),
            _ => None,
        })
    }

    fn int_property(&self, key: &str) -> Result<Option<i32>, ConfigError> {
        Ok(match key {
            COMPRESSION_RATIO_KEY => Some(self.compressor.compression_ratio),
            _ => None,
        })
    }
}

/// Immutable settings snapshot used for one pipeline call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompressorSettings {
    pub resize_factor_fx: f32,
    pub resize_factor_fy: f32,
    pub compression_ratio: i32,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            resize_factor_fx: DEFAULT_RESIZE_FACTOR_FX,
            resize_factor_fy: DEFAULT_RESIZE_FACTOR_FY,
            compression_ratio: DEFAULT_COMPRESSION_RATIO,
        }
    }
}

/// Resolves [`CompressorSettings`] from the configuration layers.
pub struct ConfigResolver;

impl ConfigResolver {
    /// Resolve settings for one call.
    ///
    /// The override map is only consulted when a structured source is
    /// present and all three keys are in the map.
    pub fn resolve(
        source: Option<&dyn PropertySource>,
        flags: &HashMap<String, String>,
    ) -> CompressorSettings {
        let mut settings = CompressorSettings::default();

        let Some(source) = source else {
            tracing::debug!("No structured config source, using default compressor settings");
            return settings;
        };

        if let Err(e) = Self::apply_source(&mut settings, source) {
            tracing::warn!("Structured config lookup failed, keeping prior values: {e}");
        }

        if Self::has_all_overrides(flags) {
            if let Err(e) = Self::apply_overrides(&mut settings, flags) {
                tracing::warn!("Config override rejected, keeping prior values: {e}");
            }
        }

        tracing::debug!(
            fx = settings.resize_factor_fx,
            fy = settings.resize_factor_fy,
            compression = settings.compression_ratio,
            "Resolved compressor settings"
        );
        settings
    }

    fn apply_source(
        settings: &mut CompressorSettings,
        source: &dyn PropertySource,
    ) -> Result<(), ConfigError> {
        if let Some(fx) = source.float_property(RESIZE_FACTOR_FX_KEY)? {
            settings.resize_factor_fx = fx;
        }
        if let Some(fy) = source.float_property(RESIZE_FACTOR_FY_KEY)? {
            settings.resize_factor_fy = fy;
        }
        if let Some(ratio) = source.int_property(COMPRESSION_RATIO_KEY)? {
            settings.compression_ratio = ratio;
        }
        Ok(())
    }

    fn has_all_overrides(flags: &HashMap<String, String>) -> bool {
        [RESIZE_FACTOR_FX_KEY, RESIZE_FACTOR_FY_KEY, COMPRESSION_RATIO_KEY]
            .iter()
            .all(|key| flags.contains_key(*key))
    }

    fn apply_overrides(
        settings: &mut CompressorSettings,
        flags: &HashMap<String, String>,
    ) -> Result<(), ConfigError> {
        settings.resize_factor_fx = parse_flag(flags, RESIZE_FACTOR_FX_KEY)?;
        settings.resize_factor_fy = parse_flag(flags, RESIZE_FACTOR_FY_KEY)?;
        settings.compression_ratio = parse_flag(flags, COMPRESSION_RATIO_KEY)?;
        Ok(())
    }
}

fn parse_flag<T>(flags: &HashMap<String, String>, key: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = flags.get(key).map(String::as_str).unwrap_or_default();
    raw.trim().parse().map_err(|e: T::Err| ConfigError::Property {
        key: key.to_string(),
        message: format!("cannot parse {raw:?}: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source returning fixed values, optionally failing on one key.
    struct StubSource {
        fx: f32,
        fy: f32,
        ratio: i32,
        fail_on: Option<&'static str>,
    }

    impl StubSource {
        fn new(fx: f32, fy: f32, ratio: i32) -> Self {
            Self {
                fx,
                fy,
                ratio,
                fail_on: None,
            }
        }

        fn failing_on(mut self, key: &'static str) -> Self {
            self.fail_on = Some(key);
            self
        }

        fn check(&self, key: &str) -> Result<(), ConfigError> {
            if self.fail_on == Some(key) {
                return Err(ConfigError::Property {
                    key: key.to_string(),
                    message: "source unavailable".into(),
                });
            }
            Ok(())
        }
    }

    impl PropertySource for StubSource {
        fn float_property(&self, key: &str) -> Result<Option<f32>, ConfigError> {
            self.check(key)?;
            Ok(match key {
                RESIZE_FACTOR_FX_KEY => Some(self.fx),
                RESIZE_FACTOR_FY_KEY => Some(self.fy),
                _ => None,
            })
        }

        fn int_property(&self, key: &str) -> Result<Option<i32>, ConfigError> {
            self.check(key)?;
            Ok((key == COMPRESSION_RATIO_KEY).then_some(self.ratio))
        }
    }

    fn overrides(fx: &str, fy: &str, ratio: &str) -> HashMap<String, String> {
        HashMap::from([
            (RESIZE_FACTOR_FX_KEY.to_string(), fx.to_string()),
            (RESIZE_FACTOR_FY_KEY.to_string(), fy.to_string()),
            (COMPRESSION_RATIO_KEY.to_string(), ratio.to_string()),
        ])
    }

    #[test]
    fn test_defaults_without_source() {
        let settings = ConfigResolver::resolve(None, &HashMap::new());
        assert_eq!(settings.resize_factor_fx, 0.25);
        assert_eq!(settings.resize_factor_fy, 0.25);
        assert_eq!(settings.compression_ratio, 50);
    }

    #[test]
    fn test_structured_source_values_used() {
        let source = StubSource::new(0.5, 0.75, 75);
        let settings = ConfigResolver::resolve(Some(&source), &HashMap::new());
        assert_eq!(settings.resize_factor_fx, 0.5);
        assert_eq!(settings.resize_factor_fy, 0.75);
        assert_eq!(settings.compression_ratio, 75);
    }

    #[test]
    fn test_structured_source_failure_keeps_defaults() {
        let source = StubSource::new(0.5, 0.75, 75).failing_on(RESIZE_FACTOR_FX_KEY);
        let settings = ConfigResolver::resolve(Some(&source), &HashMap::new());
        assert_eq!(settings, CompressorSettings::default());
    }

    #[test]
    fn test_structured_source_failure_midway_keeps_earlier_values() {
        let source = StubSource::new(0.5, 0.75, 75).failing_on(RESIZE_FACTOR_FY_KEY);
        let settings = ConfigResolver::resolve(Some(&source), &HashMap::new());
        assert_eq!(settings.resize_factor_fx, 0.5);
        assert_eq!(settings.resize_factor_fy, 0.25);
        assert_eq!(settings.compression_ratio, 50);
    }

    #[test]
    fn test_complete_overrides_win_over_source() {
        let source = StubSource::new(0.5, 0.75, 75);
        let flags = overrides("0.6", "0.8", "90");
        let settings = ConfigResolver::resolve(Some(&source), &flags);
        assert_eq!(settings.resize_factor_fx, 0.6);
        assert_eq!(settings.resize_factor_fy, 0.8);
        assert_eq!(settings.compression_ratio, 90);
    }

    #[test]
    fn test_overrides_ignored_without_source() {
        let flags = overrides("0.6", "0.8", "90");
        let settings = ConfigResolver::resolve(None, &flags);
        assert_eq!(settings, CompressorSettings::default());
    }

    #[test]
    fn test_partial_overrides_ignored() {
        let source = StubSource::new(0.5, 0.75, 75);
        let mut flags = overrides("0.6", "0.8", "90");
        flags.remove(COMPRESSION_RATIO_KEY);
        let settings = ConfigResolver::resolve(Some(&source), &flags);
        assert_eq!(settings.resize_factor_fx, 0.5);
        assert_eq!(settings.resize_factor_fy, 0.75);
        assert_eq!(settings.compression_ratio, 75);
    }

    #[test]
    fn test_unparsable_override_keeps_prior_values() {
        let source = StubSource::new(0.5, 0.75, 75);
        let flags = overrides("0.6", "wide", "90");
        let settings = ConfigResolver::resolve(Some(&source), &flags);
        assert_eq!(settings.resize_factor_fx, 0.6);
        assert_eq!(settings.resize_factor_fy, 0.75);
        assert_eq!(settings.compression_ratio, 75);
    }

    #[test]
    fn test_overrides_tolerate_whitespace() {
        let source = StubSource::new(0.5, 0.75, 75);
        let flags = overrides(" 0.3 ", "0.4", " 120");
        let settings = ConfigResolver::resolve(Some(&source), &flags);
        assert_eq!(settings.resize_factor_fx, 0.3);
        assert_eq!(settings.compression_ratio, 120);
    }

    #[test]
    fn test_config_is_a_property_source() {
        let mut config = Config::default();
        config.compressor.resize_factor_fx = 0.5;
        config.compressor.compression_ratio = 200;
        let settings = ConfigResolver::resolve(Some(&config), &HashMap::new());
        assert_eq!(settings.resize_factor_fx, 0.5);
        assert_eq!(settings.resize_factor_fy, 0.25);
        assert_eq!(settings.compression_ratio, 200);
        assert_eq!(config.float_property("unknown.key").unwrap(), None);
    }
}
