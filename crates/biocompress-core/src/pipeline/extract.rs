//! Pull the raw face image out of a segment's interchange payload.

use crate::codec::{
    encode_url_safe_base64, DecodeRequest, InterchangeCodec, FACE_MODALITY, ISO_19794_5_2011,
};
use crate::error::{PipelineResult, SdkError};
use crate::types::{BiometricType, Segment};

/// Decodes a segment's BDB back into its embedded container image.
pub struct RawImageExtractor<'a> {
    codec: &'a dyn InterchangeCodec,
}

impl<'a> RawImageExtractor<'a> {
    pub fn new(codec: &'a dyn InterchangeCodec) -> Self {
        Self { codec }
    }

    /// Extract the raw image bytes from a validated segment.
    ///
    /// Only face segments are supported; any other modality is reported as
    /// missing input.
    pub fn extract(&self, segment: &Segment) -> PipelineResult<Vec<u8>> {
        let info = segment
            .bdb_info
            .as_ref()
            .ok_or_else(|| SdkError::invalid_input("BDBInfo is null"))?;

        let modality = segment.modality();
        let sub_type = Self::sub_type_label(&info.subtype);
        if modality != Some(BiometricType::Face) {
            tracing::error!(
                "Unsupported biometric type {:?} (subtype {:?})",
                modality,
                sub_type
            );
            return Err(SdkError::missing_input(format!(
                "biometric type {modality:?} is not supported"
            ))
            .into());
        }
        tracing::debug!(
            "Extracting face image, purpose {:?}, subtype {:?}",
            info.purpose,
            sub_type
        );

        let bdb = segment
            .bdb
            .as_deref()
            .filter(|bdb| !bdb.is_empty())
            .ok_or_else(|| SdkError::biometric_not_found("BDB is null or empty"))?;

        let request = DecodeRequest {
            modality: FACE_MODALITY.to_string(),
            version: ISO_19794_5_2011.to_string(),
            bdb: encode_url_safe_base64(bdb),
        };
        let record = self
            .codec
            .decode(&request)
            .map_err(|e| SdkError::invalid_input(format!("interchange decode failed: {e}")))?;
        Ok(record.image)
    }

    /// Join up to two subtype labels with a single space.
    fn sub_type_label(subtypes: &[String]) -> Option<String> {
        match subtypes {
            [] => None,
            [first] => Some(first.trim().to_string()),
            [first, second, ..] => Some(format!("{} {}", first.trim(), second.trim())),
        }
    }
}
