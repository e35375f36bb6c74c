//! Record compression pipeline components.
//!
//! Each segment of a record flows through the same stages:
//! - **validate**: Structural checks on the whole record before any decoding
//! - **extract**: Decode the interchange BDB back to its container image
//! - **transcode**: Down-sample and recompress the image
//! - **encode**: Wrap the compressed image in a new interchange record
//! - **processor**: Orchestrates the stages and rewrites segment metadata

pub mod encode;
pub mod extract;
pub mod processor;
pub mod transcode;
pub mod validate;

// Re-exports for convenient access
pub use encode::InterchangeEncoder;
pub use extract::RawImageExtractor;
pub use processor::PipelineOrchestrator;
pub use transcode::ImageTranscoder;
pub use validate::SegmentValidator;
