//! Error types for the biometric compression pipeline.
//!
//! Errors are organized by concern. Stages return [`PipelineError`]; the
//! orchestrator is the only place that turns one into a caller-visible
//! [`ResponseStatus`].

use thiserror::Error;

use crate::status::ResponseStatus;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// A structured source could not answer a property lookup
    #[error("Cannot read property {key}: {message}")]
    Property { key: String, message: String },
}

/// Failures raised by image or interchange codec implementations.
#[derive(Error, Debug)]
pub enum CodecError {
    /// Input bytes could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Output bytes could not be produced
    #[error("Encode error: {0}")]
    Encode(String),

    /// Resampling failed or was asked for an impossible size
    #[error("Resize error: {0}")]
    Resize(String),

    /// Container format the codec cannot handle
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Structurally broken interchange record
    #[error("Malformed record at offset {offset}: {message}")]
    Malformed { offset: usize, message: String },
}

/// The single classified error kind raised by pipeline stages.
///
/// Carries the status it will be reported as plus a diagnostic message.
/// The message is for logs; callers only ever see the status template.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("[{}] {message}", status.code())]
pub struct SdkError {
    pub status: ResponseStatus,
    pub message: String,
}

impl SdkError {
    pub fn new(status: ResponseStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn missing_input(message: impl Into<String>) -> Self {
        Self::new(ResponseStatus::MissingInput, message)
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ResponseStatus::InvalidInput, message)
    }

    pub fn biometric_not_found(message: impl Into<String>) -> Self {
        Self::new(ResponseStatus::BiometricNotFoundInCbeff, message)
    }

    pub fn unknown(message: impl Into<String>) -> Self {
        Self::new(ResponseStatus::UnknownError, message)
    }
}

/// Errors returned by pipeline stages.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Classified failure with a known status
    #[error(transparent)]
    Sdk(#[from] SdkError),

    /// Unclassified codec fault
    #[error("Codec failure: {0}")]
    Codec(#[from] CodecError),
}

impl PipelineError {
    /// The status this error is reported as.
    ///
    /// Anything that is not an [`SdkError`] downgrades to `UnknownError`.
    pub fn status(&self) -> ResponseStatus {
        match self {
            PipelineError::Sdk(e) => e.status,
            PipelineError::Codec(_) => ResponseStatus::UnknownError,
        }
    }
}

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
