//! Container image codec built on `image` and `fast_image_resize`.

use std::io::Cursor;

use fast_image_resize::{FilterType, ResizeAlg, ResizeOptions, Resizer};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat};

use super::{ImageCodec, RasterImage};
use crate::error::CodecError;

/// Largest destination raster `resize_encode` will allocate.
pub const MAX_RASTER_BYTES: u64 = 1 << 30;

/// Production [`ImageCodec`].
///
/// Downscaling uses a box convolution, which averages every source pixel
/// covered by a destination pixel.
#[derive(Debug, Default, Clone, Copy)]
pub struct RasterCodec;

impl RasterCodec {
    pub fn new() -> Self {
        Self
    }

    /// Map the 1..=1000 compression scale onto JPEG quality (1..=100).
    pub fn jpeg_quality(compression: i32) -> u8 {
        let quality = (compression as f32 / 10.0).ceil() as i32;
        quality.clamp(1, 100) as u8
    }

    fn resize(image: &DynamicImage, width: u32, height: u32) -> Result<DynamicImage, CodecError> {
        let mut dst = DynamicImage::new(width, height, image.color());
        let options =
            ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Box));
        Resizer::new()
            .resize(image, &mut dst, &options)
            .map_err(|e| CodecError::Resize(e.to_string()))?;
        Ok(dst)
    }

    fn encode(image: &DynamicImage, format: ImageFormat, compression: i32) -> Result<Vec<u8>, CodecError> {
        let mut buffer = Cursor::new(Vec::new());
        match format {
            ImageFormat::Jpeg => {
                // JPEG carries neither alpha nor 16-bit samples
                let image = match image.color() {
                    ColorType::L8 | ColorType::Rgb8 => image.clone(),
                    ColorType::La8 | ColorType::L16 | ColorType::La16 => {
                        DynamicImage::ImageLuma8(image.to_luma8())
                    }
                    _ => DynamicImage::ImageRgb8(image.to_rgb8()),
                };
                let encoder =
                    JpegEncoder::new_with_quality(&mut buffer, Self::jpeg_quality(compression));
                image
                    .write_with_encoder(encoder)
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
            }
            format if format.writing_enabled() => {
                tracing::debug!(
                    "{:?} has no lossy knob, compression {} ignored",
                    format,
                    compression
                );
                image
                    .write_to(&mut buffer, format)
                    .map_err(|e| CodecError::Encode(e.to_string()))?;
            }
            other => {
                return Err(CodecError::UnsupportedFormat(format!(
                    "cannot encode {other:?}"
                )))
            }
        }
        Ok(buffer.into_inner())
    }
}

impl ImageCodec for RasterCodec {
    fn decode(&self, bytes: &[u8]) -> Result<RasterImage, CodecError> {
        let reader = image::ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()
            .map_err(|e| CodecError::Decode(format!("Cannot detect image format: {e}")))?;
        let format = reader
            .format()
            .ok_or_else(|| CodecError::UnsupportedFormat("unrecognized image container".into()))?;
        let image = reader
            .decode()
            .map_err(|e| CodecError::Decode(e.to_string()))?;
        Ok(RasterImage { image, format })
    }

    fn resize_encode(
        &self,
        image: &RasterImage,
        width: u32,
        height: u32,
        compression: i32,
    ) -> Result<Vec<u8>, CodecError> {
        if width == 0 || height == 0 {
            return Err(CodecError::Resize(format!(
                "target size {width}x{height} is empty"
            )));
        }
        let bytes = u64::from(width)
            .checked_mul(u64::from(height))
            .and_then(|px| px.checked_mul(u64::from(image.image.color().bytes_per_pixel())));
        if !bytes.is_some_and(|b| b <= MAX_RASTER_BYTES) {
            return Err(CodecError::Resize(format!(
                "target size {width}x{height} exceeds the {MAX_RASTER_BYTES} byte raster limit"
            )));
        }
        let resized = Self::resize(&image.image, width, height)?;
        Self::encode(&resized, image.format, compression)
    }
}
