//! Down-sample and recompress a raw face image.

use crate::codec::ImageCodec;
use crate::config::CompressorSettings;
use crate::error::{CodecError, PipelineResult};

/// Largest output image, in pixels, the transcoder will ask a codec for.
pub const MAX_TARGET_PIXELS: u64 = 1 << 26;

/// Resizes an image by the configured factors and re-encodes it in its
/// original container.
pub struct ImageTranscoder<'a> {
    codec: &'a dyn ImageCodec,
}

impl<'a> ImageTranscoder<'a> {
    pub fn new(codec: &'a dyn ImageCodec) -> Self {
        Self { codec }
    }

    /// Decode, resize and re-encode `bytes`.
    ///
    /// Failures here are codec faults; they surface as unknown errors.
    pub fn transcode(&self, bytes: &[u8], settings: &CompressorSettings) -> PipelineResult<Vec<u8>> {
        let source = self.codec.decode(bytes)?;
        let (width, height) = source.dimensions();
        tracing::info!(
            "Original image: width {} height {} total size {}",
            width,
            height,
            u64::from(width) * u64::from(height)
        );
        tracing::info!(
            "Factor ratio: fx={}, fy={}, compression ratio={}",
            settings.resize_factor_fx,
            settings.resize_factor_fy,
            settings.compression_ratio
        );

        let (new_width, new_height) = Self::target_size(
            width,
            height,
            settings.resize_factor_fx,
            settings.resize_factor_fy,
        )?;
        tracing::info!(
            "Resized image: width {} height {} total size {}",
            new_width,
            new_height,
            u64::from(new_width) * u64::from(new_height)
        );

        let data = self.codec.resize_encode(
            &source,
            new_width,
            new_height,
            settings.compression_ratio,
        )?;
        tracing::info!("Compressed image length {}", data.len());
        Ok(data)
    }

    /// Scale each axis by its factor, rounding to the nearest pixel.
    ///
    /// A non-empty source never collapses below one pixel per axis, and
    /// the result never exceeds [`MAX_TARGET_PIXELS`].
    pub fn target_size(
        width: u32,
        height: u32,
        fx: f32,
        fy: f32,
    ) -> Result<(u32, u32), CodecError> {
        let scale = |dim: u32, factor: f32, axis: &str| -> Result<u32, CodecError> {
            if !(factor.is_finite() && factor > 0.0) {
                return Err(CodecError::Resize(format!(
                    "{axis} resize factor {factor} must be positive"
                )));
            }
            let scaled = (f64::from(dim) * f64::from(factor)).round();
            if scaled > f64::from(u32::MAX) {
                return Err(CodecError::Resize(format!(
                    "{axis} dimension {dim} scaled by {factor} overflows"
                )));
            }
            Ok((scaled as u32).max(u32::from(dim > 0)))
        };
        let new_width = scale(width, fx, "horizontal")?;
        let new_height = scale(height, fy, "vertical")?;
        if u64::from(new_width) * u64::from(new_height) > MAX_TARGET_PIXELS {
            return Err(CodecError::Resize(format!(
                "target size {new_width}x{new_height} exceeds {MAX_TARGET_PIXELS} pixels"
            )));
        }
        Ok((new_width, new_height))
    }
}
