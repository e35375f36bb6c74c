//! Biocompress Core - face biometric record compression.
//!
//! Takes a biometric record whose segments carry ISO 19794-5 face records,
//! shrinks the embedded images and hands the record back with rewritten
//! segment metadata. Every outcome, including failure, is a status
//! envelope.
//!
//! # Architecture
//!
//! ```text
//! Record → Validate → Extract (ISO) → Resize + Recompress → Encode (ISO) → Rewrite → Response
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::collections::HashMap;
//! use biocompress_core::{BiometricRecord, Config, ImageCompressor};
//!
//! let compressor = ImageCompressor::new(Config::load()?);
//! let record: BiometricRecord = serde_json::from_str(&input)?;
//! let response = compressor.extract_template(Some(record), None, &HashMap::new());
//! println!("{}", response.status_code);
//! ```

// Module declarations
pub mod codec;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod status;
pub mod types;

use std::collections::HashMap;

// Re-exports for convenient access
pub use codec::{ImageCodec, InterchangeCodec, IsoFaceCodec, RasterCodec};
pub use config::{CompressorSettings, Config, ConfigResolver, PropertySource};
pub use error::{CodecError, ConfigError, PipelineError, PipelineResult, SdkError};
pub use pipeline::PipelineOrchestrator;
pub use status::{Response, ResponseStatus};
pub use types::{BiometricRecord, BiometricType, Segment};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compressor entry point, the face-compression slice of a biometric SDK.
pub struct ImageCompressor {
    config: Option<Config>,
    image_codec: Box<dyn ImageCodec>,
    interchange_codec: Box<dyn InterchangeCodec>,
}

impl ImageCompressor {
    /// Create a compressor backed by `config` and the production codecs.
    pub fn new(config: Config) -> Self {
        tracing::debug!("Initializing biocompress v{}", VERSION);
        Self::with_codecs(
            Some(config),
            Box::new(RasterCodec::new()),
            Box::new(IsoFaceCodec::new()),
        )
    }

    /// Create a compressor with no structured source.
    ///
    /// Every call then runs with the built-in defaults and ignores flag
    /// overrides.
    pub fn without_config() -> Self {
        Self::with_codecs(
            None,
            Box::new(RasterCodec::new()),
            Box::new(IsoFaceCodec::new()),
        )
    }

    /// Create a compressor with explicit codec implementations.
    pub fn with_codecs(
        config: Option<Config>,
        image_codec: Box<dyn ImageCodec>,
        interchange_codec: Box<dyn InterchangeCodec>,
    ) -> Self {
        Self {
            config,
            image_codec,
            interchange_codec,
        }
    }

    pub fn config(&self) -> Option<&Config> {
        self.config.as_ref()
    }

    /// Compress every face segment of `record`.
    ///
    /// `flags` may override all three compressor settings at once; see
    /// [`ConfigResolver::resolve`].
    pub fn extract_template(
        &self,
        record: Option<BiometricRecord>,
        modalities: Option<&[BiometricType]>,
        flags: &HashMap<String, String>,
    ) -> Response<BiometricRecord> {
        let source = self.config.as_ref().map(|c| c as &dyn PropertySource);
        PipelineOrchestrator::new(
            source,
            self.image_codec.as_ref(),
            self.interchange_codec.as_ref(),
        )
        .run(record, modalities, flags)
    }
}

impl Default for ImageCompressor {
    fn default() -> Self {
        Self::new(Config::default())
    }
}
