//! Structural validation before any decoding.

use crate::error::SdkError;
use crate::types::{BiometricRecord, Segment, FORMAT_TYPE_FACE};

/// Checks record and segment preconditions. Pure; never mutates input.
pub struct SegmentValidator;

impl SegmentValidator {
    /// Validate a record and every one of its segments.
    ///
    /// Checks:
    /// - The record exists and has at least one segment
    /// - Every segment has segment info with a format descriptor
    /// - Every format-type code is the face code
    ///
    /// Returns the validated segments.
    pub fn validate(record: Option<&BiometricRecord>) -> Result<&[Segment], SdkError> {
        let segments = record
            .and_then(|r| r.segments.as_deref())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| SdkError::missing_input("record has no segments"))?;

        for (index, segment) in segments.iter().enumerate() {
            Self::validate_segment(segment).map_err(|e| SdkError {
                message: format!("segment {index}: {}", e.message),
                ..e
            })?;
        }
        Ok(segments)
    }

    /// Validate a single segment's metadata.
    pub fn validate_segment(segment: &Segment) -> Result<(), SdkError> {
        let format = segment
            .bdb_info
            .as_ref()
            .and_then(|info| info.format.as_ref())
            .ok_or_else(|| SdkError::invalid_input("BDBInfo is null or Format Value is null"))?;

        match format.format_type.as_deref() {
            Some(FORMAT_TYPE_FACE) => Ok(()),
            other => Err(SdkError::invalid_input(format!(
                "FORMAT_TYPE_FACE is wrong! Expected value is {FORMAT_TYPE_FACE}, received is {}",
                other.unwrap_or("null")
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::ResponseStatus;
    use crate::types::{BdbInfo, RegistryId};

    fn segment_with_format(format_type: Option<&str>) -> Segment {
        Segment {
            bdb_info: Some(BdbInfo {
                format: Some(RegistryId {
                    organization: "Vendor".into(),
                    format_type: format_type.map(str::to_string),
                }),
                ..BdbInfo::default()
            }),
            ..Segment::default()
        }
    }

    #[test]
    fn test_absent_record_is_missing_input() {
        let err = SegmentValidator::validate(None).unwrap_err();
        assert_eq!(err.status, ResponseStatus::MissingInput);
    }

    #[test]
    fn test_absent_or_empty_segments_is_missing_input() {
        let record = BiometricRecord::default();
        let err = SegmentValidator::validate(Some(&record)).unwrap_err();
        assert_eq!(err.status, ResponseStatus::MissingInput);

        let record = BiometricRecord::with_segments(vec![]);
        let err = SegmentValidator::validate(Some(&record)).unwrap_err();
        assert_eq!(err.status, ResponseStatus::MissingInput);
    }

    #[test]
    fn test_face_segment_passes() {
        let record = BiometricRecord::with_segments(vec![segment_with_format(Some("8"))]);
        let segments = SegmentValidator::validate(Some(&record)).unwrap();
        assert_eq!(segments.len(), 1);
    }

    #[test]
    fn test_missing_segment_info_is_invalid_input() {
        let err = SegmentValidator::validate_segment(&Segment::default()).unwrap_err();
        assert_eq!(err.status, ResponseStatus::InvalidInput);
    }

    #[test]
    fn test_missing_format_is_invalid_input() {
        let segment = Segment {
            bdb_info: Some(BdbInfo::default()),
            ..Segment::default()
        };
        let err = SegmentValidator::validate_segment(&segment).unwrap_err();
        assert_eq!(err.status, ResponseStatus::InvalidInput);
    }

    #[test]
    fn test_wrong_format_type_names_the_value() {
        let err = SegmentValidator::validate_segment(&segment_with_format(Some("7"))).unwrap_err();
        assert_eq!(err.status, ResponseStatus::InvalidInput);
        assert!(err.message.contains("received is 7"));
    }

    #[test]
    fn test_null_format_type_is_invalid_input() {
        let err = SegmentValidator::validate_segment(&segment_with_format(None)).unwrap_err();
        assert_eq!(err.status, ResponseStatus::InvalidInput);
        assert!(err.message.contains("null"));
    }

    #[test]
    fn test_any_bad_segment_fails_the_record() {
        let record = BiometricRecord::with_segments(vec![
            segment_with_format(Some("8")),
            segment_with_format(Some("2")),
        ]);
        let err = SegmentValidator::validate(Some(&record)).unwrap_err();
        assert_eq!(err.status, ResponseStatus::InvalidInput);
        assert!(err.message.starts_with("segment 1:"));
        assert!(err.message.contains("received is 2"));
    }
}
