//! Core data types for biometric records.
//!
//! A [`BiometricRecord`] is an ordered list of [`Segment`]s, each one a
//! biometric interchange record (BIR): descriptive metadata plus the raw
//! biometric data block (BDB). Every field is optional on the wire, so the
//! pipeline can report precisely which part of an input is missing.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Format-type code identifying a face image record.
pub const FORMAT_TYPE_FACE: &str = "8";

/// A record holding one or more biometric segments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiometricRecord {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cbeff_version: Option<VersionType>,

    /// Segments in caller order. `None` and empty are both "no input".
    pub segments: Option<Vec<Segment>>,
}

impl BiometricRecord {
    /// Build a record from a list of segments.
    pub fn with_segments(segments: Vec<Segment>) -> Self {
        Self {
            segments: Some(segments),
            ..Self::default()
        }
    }

    /// Group segments by their first modality.
    ///
    /// An absent or empty `filter` selects every segment. Segments without
    /// a modality are skipped.
    pub fn segments_by_modality(
        &self,
        filter: Option<&[BiometricType]>,
    ) -> HashMap<BiometricType, Vec<&Segment>> {
        let filter = filter.filter(|f| !f.is_empty());
        let mut map: HashMap<BiometricType, Vec<&Segment>> = HashMap::new();

        for segment in self.segments.iter().flatten() {
            let Some(modality) = segment.modality() else {
                continue;
            };
            if filter.is_some_and(|f| !f.contains(&modality)) {
                continue;
            }
            map.entry(modality).or_default().push(segment);
        }
        map
    }
}

/// One biometric interchange record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    /// Record format version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<VersionType>,

    /// CBEFF specification version
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cbeff_version: Option<VersionType>,

    /// Owner/index info, passed through untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bir_info: Option<BirInfo>,

    /// Descriptive metadata for the data block
    pub bdb_info: Option<BdbInfo>,

    /// Raw biometric data block (interchange-format payload)
    #[serde(with = "bdb_base64", default)]
    pub bdb: Option<Vec<u8>>,
}

impl Segment {
    /// First modality listed in the segment info, if any.
    pub fn modality(&self) -> Option<BiometricType> {
        self.bdb_info
            .as_ref()
            .and_then(|info| info.biometric_type.as_ref())
            .and_then(|types| types.first().copied())
    }
}

/// Major/minor version pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionType {
    pub major: u32,
    pub minor: u32,
}

impl VersionType {
    pub fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }
}

/// Segment-level descriptive info. Opaque to the pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BirInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrity: Option<bool>,
}

/// Metadata describing the biometric data block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BdbInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<String>,

    /// Format descriptor; `format.format_type` must be [`FORMAT_TYPE_FACE`]
    pub format: Option<RegistryId>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub encryption: Option<bool>,

    pub creation_date: Option<NaiveDateTime>,

    /// Modality list. Exactly one entry is expected.
    #[serde(rename = "type")]
    pub biometric_type: Option<Vec<BiometricType>>,

    #[serde(default)]
    pub subtype: Vec<String>,

    pub level: Option<ProcessedLevelType>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<RegistryId>,

    pub purpose: Option<PurposeType>,

    pub quality: Option<QualityType>,
}

/// Organization/type identifier pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryId {
    pub organization: String,
    #[serde(rename = "type")]
    pub format_type: Option<String>,
}

impl RegistryId {
    pub fn new(organization: impl Into<String>, format_type: impl Into<String>) -> Self {
        Self {
            organization: organization.into(),
            format_type: Some(format_type.into()),
        }
    }
}

/// Quality score attached to a data block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityType {
    pub algorithm: Option<RegistryId>,
    pub score: i64,
    #[serde(default)]
    pub quality_calculation_failed: Option<String>,
}

/// Biometric modality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BiometricType {
    Face,
    Finger,
    Iris,
    Voice,
    Signature,
    HandGeometry,
    Keystroke,
    LipMovement,
    Gait,
    Vein,
    Dna,
    ExceptionPhoto,
}

/// How far the data block has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessedLevelType {
    Raw,
    Intermediate,
    Processed,
}

/// Why the sample was captured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurposeType {
    Verify,
    Identify,
    Enroll,
    EnrollVerify,
    EnrollIdentify,
    Audit,
}

/// Serialize BDB bytes as standard base64 strings in JSON.
mod bdb_base64 {
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Vec<u8>>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(bytes) => s.serialize_str(&BASE64.encode(bytes)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Vec<u8>>, D::Error> {
        let encoded: Option<String> = Option::deserialize(d)?;
        encoded
            .map(|s| BASE64.decode(s.trim()).map_err(serde::de::Error::custom))
            .transpose()
    }
}
