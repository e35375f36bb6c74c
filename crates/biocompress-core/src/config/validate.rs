//! Configuration validation with range checks.

use crate::error::ConfigError;

use super::Config;

impl Config {
    /// Validate configuration values are within acceptable ranges.
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let compressor = &self.compressor;
        if !(compressor.resize_factor_fx.is_finite() && compressor.resize_factor_fx > 0.0) {
            return Err(ConfigError::ValidationError(
                "compressor.resize_factor_fx must be > 0".into(),
            ));
        }
        if !(compressor.resize_factor_fy.is_finite() && compressor.resize_factor_fy > 0.0) {
            return Err(ConfigError::ValidationError(
                "compressor.resize_factor_fy must be > 0".into(),
            ));
        }
        if !(1..=1000).contains(&compressor.compression_ratio) {
            return Err(ConfigError::ValidationError(
                "compressor.compression_ratio must be between 1 and 1000".into(),
            ));
        }
        if !matches!(self.logging.format.as_str(), "pretty" | "json") {
            return Err(ConfigError::ValidationError(
                "logging.format must be \"pretty\" or \"json\"".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_passes_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_resize_factor() {
        let mut config = Config::default();
        config.compressor.resize_factor_fx = 0.0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("resize_factor_fx"));
    }

    #[test]
    fn test_validate_rejects_nan_resize_factor() {
        let mut config = Config::default();
        config.compressor.resize_factor_fy = f32::NAN;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("resize_factor_fy"));
    }

    #[test]
    fn test_validate_rejects_compression_out_of_range() {
        let mut config = Config::default();
        config.compressor.compression_ratio = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("compression_ratio"));

        config.compressor.compression_ratio = 1001;
        assert!(config.validate().is_err());

        config.compressor.compression_ratio = 1000;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_unknown_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".into();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("logging.format"));
    }
}
