//! ISO/IEC 19794-5:2011 face record reader and writer.
//!
//! Covers the 2D subset this pipeline exchanges: a general header followed
//! by representations, each holding capture metadata, quality blocks, the
//! facial information block, landmark points, the image information block
//! and the embedded image. All integers are big-endian.
//!
//! ```text
//! General header (15 bytes)
//!   "FAC\0" | "030\0" | record length u32 | representations u16 | certification u8
//! Representation
//!   length u32 | capture date-time (9) | device technology u8 | vendor u16 | type u16
//!   quality block count u8 | quality blocks (5 each)
//!   facial info (17) | landmark points (8 each)
//!   image info (11) | image length u32 | image data
//! ```

use chrono::{Datelike, NaiveDateTime, Timelike, Utc};

use super::{
    decode_url_safe_base64, DecodeRequest, EncodeRequest, FaceImageType, FaceRecord,
    ImageDataType, InterchangeCodec, FACE_MODALITY, ISO_19794_5_2011,
};
use crate::error::CodecError;

const FORMAT_IDENTIFIER: &[u8; 4] = b"FAC\0";
const VERSION_NUMBER: &[u8; 4] = b"030\0";
const GENERAL_HEADER_LEN: usize = 15;
const CAPTURE_DATE_TIME_LEN: usize = 9;
const QUALITY_BLOCK_LEN: usize = 5;
const FACIAL_INFO_LEN: usize = 17;
const LANDMARK_POINT_LEN: usize = 8;
const IMAGE_INFO_LEN: usize = 11;

/// Fixed bytes of a representation, excluding variable-length blocks.
const REPRESENTATION_FIXED_LEN: usize =
    4 + CAPTURE_DATE_TIME_LEN + 1 + 2 + 2 + 1 + FACIAL_INFO_LEN + IMAGE_INFO_LEN + 4;

/// Purpose tag selecting a full frontal image type on encode.
pub const PURPOSE_REGISTRATION: &str = "REGISTRATION";

impl FaceImageType {
    fn code(self) -> u8 {
        match self {
            FaceImageType::Basic => 0x00,
            FaceImageType::FullFrontal => 0x01,
            FaceImageType::TokenFrontal => 0x02,
            FaceImageType::PostProcessedFrontal => 0x03,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(FaceImageType::Basic),
            0x01 => Some(FaceImageType::FullFrontal),
            0x02 => Some(FaceImageType::TokenFrontal),
            0x03 => Some(FaceImageType::PostProcessedFrontal),
            _ => None,
        }
    }
}

impl ImageDataType {
    fn code(self) -> u8 {
        match self {
            ImageDataType::Jpeg => 0x00,
            ImageDataType::Jpeg2000Lossy => 0x01,
            ImageDataType::Jpeg2000Lossless => 0x02,
            ImageDataType::Png => 0x03,
        }
    }

    fn from_code(code: u8) -> Option<Self> {
        match code {
            0x00 => Some(ImageDataType::Jpeg),
            0x01 => Some(ImageDataType::Jpeg2000Lossy),
            0x02 => Some(ImageDataType::Jpeg2000Lossless),
            0x03 => Some(ImageDataType::Png),
            _ => None,
        }
    }
}

/// Production [`InterchangeCodec`] for face records.
#[derive(Debug, Default, Clone, Copy)]
pub struct IsoFaceCodec;

impl IsoFaceCodec {
    pub fn new() -> Self {
        Self
    }

    /// Parse a complete record and return its first representation.
    pub fn read_record(bytes: &[u8]) -> Result<FaceRecord, CodecError> {
        let mut reader = ByteReader::new(bytes);

        if reader.take(4)? != FORMAT_IDENTIFIER {
            return Err(reader.malformed(0, "missing FAC format identifier"));
        }
        if reader.take(4)? != VERSION_NUMBER {
            return Err(reader.malformed(4, "unsupported version, expected 030"));
        }
        let record_len = reader.u32()? as usize;
        if record_len != bytes.len() {
            return Err(reader.malformed(
                8,
                format!("record length {record_len} but {} bytes given", bytes.len()),
            ));
        }
        let representations = reader.u16()?;
        if representations == 0 {
            return Err(reader.malformed(12, "record holds no representation"));
        }
        let _certification = reader.u8()?;

        Self::read_representation(&mut reader)
    }

    fn read_representation(reader: &mut ByteReader<'_>) -> Result<FaceRecord, CodecError> {
        let start = reader.pos;
        let representation_len = reader.u32()? as usize;
        if representation_len < REPRESENTATION_FIXED_LEN
            || start + representation_len > reader.buf.len()
        {
            return Err(reader.malformed(
                start,
                format!("representation length {representation_len} out of bounds"),
            ));
        }

        reader.skip(CAPTURE_DATE_TIME_LEN)?;
        // device technology, vendor, type
        reader.skip(1 + 2 + 2)?;
        let quality_blocks = reader.u8()? as usize;
        reader.skip(quality_blocks * QUALITY_BLOCK_LEN)?;

        let landmark_points = reader.u16()? as usize;
        reader.skip(FACIAL_INFO_LEN - 2)?;
        reader.skip(landmark_points * LANDMARK_POINT_LEN)?;

        let type_offset = reader.pos;
        let face_image_type = FaceImageType::from_code(reader.u8()?).ok_or_else(|| {
            CodecError::UnsupportedFormat(format!(
                "face image type at offset {type_offset} is not a 2D type"
            ))
        })?;
        let data_type_offset = reader.pos;
        let image_data_type = ImageDataType::from_code(reader.u8()?).ok_or_else(|| {
            reader.malformed(data_type_offset, "unknown image data type")
        })?;
        let width = reader.u16()?;
        let height = reader.u16()?;
        // sampling rate, post-acquisition processing, cross reference, colour space
        reader.skip(1 + 2 + 1 + 1)?;

        let image_len = reader.u32()? as usize;
        if reader.pos + image_len > start + representation_len {
            return Err(reader.malformed(
                reader.pos - 4,
                format!("image length {image_len} overruns representation"),
            ));
        }
        let image = reader.take(image_len)?.to_vec();

        Ok(FaceRecord {
            face_image_type,
            image_data_type,
            width,
            height,
            image,
        })
    }

    /// Build a single-representation record around `image`.
    pub fn write_record(
        image: &[u8],
        face_image_type: FaceImageType,
        captured_at: NaiveDateTime,
    ) -> Result<Vec<u8>, CodecError> {
        let image_data_type = ImageDataType::sniff(image).ok_or_else(|| {
            CodecError::UnsupportedFormat("image is not JPEG, JPEG 2000 or PNG".into())
        })?;
        let (width, height) = Self::image_size(image, image_data_type)?;

        let representation_len = REPRESENTATION_FIXED_LEN + image.len();
        let record_len = GENERAL_HEADER_LEN + representation_len;
        let record_len_u32 = u32::try_from(record_len)
            .map_err(|_| CodecError::Encode(format!("record of {record_len} bytes too large")))?;

        let mut out = Vec::with_capacity(record_len);
        out.extend_from_slice(FORMAT_IDENTIFIER);
        out.extend_from_slice(VERSION_NUMBER);
        out.extend_from_slice(&record_len_u32.to_be_bytes());
        out.extend_from_slice(&1u16.to_be_bytes());
        out.push(0); // certification flag

        out.extend_from_slice(&(representation_len as u32).to_be_bytes());
        write_date_time(&mut out, captured_at);
        out.push(0); // device technology: unknown
        out.extend_from_slice(&0u16.to_be_bytes()); // vendor
        out.extend_from_slice(&0u16.to_be_bytes()); // device type
        out.push(0); // no quality blocks

        // Facial information: no landmarks, everything unspecified
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&[0u8; FACIAL_INFO_LEN - 2]);

        out.push(face_image_type.code());
        out.push(image_data_type.code());
        out.extend_from_slice(&width.to_be_bytes());
        out.extend_from_slice(&height.to_be_bytes());
        out.push(0); // spatial sampling rate
        out.extend_from_slice(&0u16.to_be_bytes()); // post-acquisition processing
        out.push(0); // cross reference
        out.push(0); // colour space

        out.extend_from_slice(&(image.len() as u32).to_be_bytes());
        out.extend_from_slice(image);

        debug_assert_eq!(out.len(), record_len);
        Ok(out)
    }

    /// Image dimensions, or zero when the container cannot be probed.
    fn image_size(image: &[u8], data_type: ImageDataType) -> Result<(u16, u16), CodecError> {
        let probed = image::ImageReader::new(std::io::Cursor::new(image))
            .with_guessed_format()
            .ok()
            .and_then(|reader| reader.into_dimensions().ok());

        let Some((width, height)) = probed else {
            tracing::debug!("Cannot probe {:?} image size, recording 0x0", data_type);
            return Ok((0, 0));
        };
        let width = u16::try_from(width)
            .map_err(|_| CodecError::Encode(format!("image width {width} exceeds 65535")))?;
        let height = u16::try_from(height)
            .map_err(|_| CodecError::Encode(format!("image height {height} exceeds 65535")))?;
        Ok((width, height))
    }
}

impl InterchangeCodec for IsoFaceCodec {
    fn decode(&self, request: &DecodeRequest) -> Result<FaceRecord, CodecError> {
        check_tags(&request.modality, &request.version)?;
        let bytes = decode_url_safe_base64(&request.bdb)?;
        Self::read_record(&bytes)
    }

    fn encode(&self, request: &EncodeRequest) -> Result<Vec<u8>, CodecError> {
        check_tags(&request.modality, &request.version)?;
        let face_image_type = if request.purpose.eq_ignore_ascii_case(PURPOSE_REGISTRATION) {
            FaceImageType::FullFrontal
        } else {
            FaceImageType::Basic
        };
        Self::write_record(&request.image, face_image_type, Utc::now().naive_utc())
    }
}

fn check_tags(modality: &str, version: &str) -> Result<(), CodecError> {
    if !modality.eq_ignore_ascii_case(FACE_MODALITY) {
        return Err(CodecError::UnsupportedFormat(format!(
            "modality {modality} is not supported"
        )));
    }
    if version != ISO_19794_5_2011 {
        return Err(CodecError::UnsupportedFormat(format!(
            "interchange version {version} is not supported"
        )));
    }
    Ok(())
}

fn write_date_time(out: &mut Vec<u8>, at: NaiveDateTime) {
    let year = u16::try_from(at.year()).unwrap_or(0xFFFF);
    out.extend_from_slice(&year.to_be_bytes());
    out.push(at.month() as u8);
    out.push(at.day() as u8);
    out.push(at.hour() as u8);
    out.push(at.minute() as u8);
    out.push(at.second().min(59) as u8);
    let millis = (at.nanosecond() / 1_000_000).min(999) as u16;
    out.extend_from_slice(&millis.to_be_bytes());
}

/// Bounds-checked big-endian cursor over a record.
struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn malformed(&self, offset: usize, message: impl Into<String>) -> CodecError {
        CodecError::Malformed {
            offset,
            message: message.into(),
        }
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        let end = self.pos.checked_add(n).filter(|&end| end <= self.buf.len());
        let Some(end) = end else {
            return Err(self.malformed(
                self.pos,
                format!("need {n} bytes, {} left", self.buf.len() - self.pos),
            ));
        };
        let slice = &self.buf[self.pos..end];
        self.pos = end;
        Ok(slice)
    }

    fn skip(&mut self, n: usize) -> Result<(), CodecError> {
        self.take(n).map(|_| ())
    }

    fn u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    fn u16(&mut self) -> Result<u16, CodecError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    fn u32(&mut self) -> Result<u32, CodecError> {
        let b = self.take(4)?;
        Ok(u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
    }
}
