//! Codec capability interfaces and their production implementations.
//!
//! The pipeline never touches an image library or the interchange format
//! directly. It goes through two narrow traits:
//! - [`ImageCodec`]: decode a container image, resize it, re-encode it
//! - [`InterchangeCodec`]: read and write face interchange records
//!
//! [`RasterCodec`] and [`IsoFaceCodec`] are the implementations used in
//! production; tests substitute deterministic fakes.

pub mod iso;
pub mod raster;

pub use iso::IsoFaceCodec;
pub use raster::RasterCodec;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::error::CodecError;

/// Modality tag understood by the interchange codec.
pub const FACE_MODALITY: &str = "Face";

/// Interchange format version tag for ISO/IEC 19794-5:2011 face records.
pub const ISO_19794_5_2011: &str = "ISO19794_5_2011";

/// A decoded container image and the format it came from.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub image: DynamicImage,
    pub format: ImageFormat,
}

impl RasterImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Decodes, resizes and re-encodes container images.
pub trait ImageCodec: Send + Sync {
    /// Decode `bytes` using the container's own codec.
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, CodecError>;

    /// Resize to exactly `width` x `height` with area averaging and encode
    /// into the image's original container.
    ///
    /// `compression` is the container-native parameter on a 1..=1000 scale.
    fn resize_encode(
        &self,
        image: &RasterImage,
        width: u32,
        height: u32,
        compression: i32,
    ) -> Result<Vec<u8>, CodecError>;
}

/// Face-record image type, as carried in the interchange record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaceImageType {
    Basic,
    FullFrontal,
    TokenFrontal,
    PostProcessedFrontal,
}

/// Encoding of the image embedded in an interchange record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageDataType {
    Jpeg,
    Jpeg2000Lossy,
    Jpeg2000Lossless,
    Png,
}

impl ImageDataType {
    /// Identify the container from its leading signature bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        const JP2_BOX: [u8; 12] = [0, 0, 0, 0x0C, b'j', b'P', b' ', b' ', 0x0D, 0x0A, 0x87, 0x0A];
        const J2K_CODESTREAM: [u8; 4] = [0xFF, 0x4F, 0xFF, 0x51];
        const PNG: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(ImageDataType::Jpeg)
        } else if bytes.starts_with(&JP2_BOX) || bytes.starts_with(&J2K_CODESTREAM) {
            Some(ImageDataType::Jpeg2000Lossy)
        } else if bytes.starts_with(&PNG) {
            Some(ImageDataType::Png)
        } else {
            None
        }
    }
}

/// A decoded face interchange record.
#[derive(Debug, Clone, PartialEq)]
pub struct FaceRecord {
    pub face_image_type: FaceImageType,
    pub image_data_type: ImageDataType,
    pub width: u16,
    pub height: u16,
    /// The embedded container image
    pub image: Vec<u8>,
}

/// Request to decode an interchange payload.
#[derive(Debug, Clone)]
pub struct DecodeRequest {
    pub modality: String,
    pub version: String,
    /// The BDB in URL-safe base64 without padding, as it crosses the SDK boundary
    pub bdb: String,
}

/// Request to wrap an image into an interchange payload.
#[derive(Debug, Clone)]
pub struct EncodeRequest {
    pub modality: String,
    pub purpose: String,
    pub version: String,
    pub image: Vec<u8>,
}

/// Reads and writes biometric interchange records.
pub trait InterchangeCodec: Send + Sync {
    fn decode(&self, request: &DecodeRequest) -> Result<FaceRecord, CodecError>;

    fn encode(&self, request: &EncodeRequest) -> Result<Vec<u8>, CodecError>;
}

/// Encode bytes as URL-safe base64 without padding.
pub fn encode_url_safe_base64(data: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decode URL-safe base64, with or without trailing padding.
pub fn decode_url_safe_base64(data: &str) -> Result<Vec<u8>, CodecError> {
    let trimmed = data.trim().trim_end_matches('=');
    if trimmed.is_empty() {
        return Err(CodecError::Decode("empty base64 payload".into()));
    }
    URL_SAFE_NO_PAD
        .decode(trimmed)
        .map_err(|e| CodecError::Decode(format!("invalid base64: {e}")))
}
