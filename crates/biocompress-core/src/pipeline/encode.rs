//! Wrap a compressed image back into a face interchange record.

use crate::codec::{EncodeRequest, InterchangeCodec, FACE_MODALITY, ISO_19794_5_2011};
use crate::error::{PipelineResult, SdkError};

pub struct InterchangeEncoder<'a> {
    codec: &'a dyn InterchangeCodec,
}

impl<'a> InterchangeEncoder<'a> {
    pub fn new(codec: &'a dyn InterchangeCodec) -> Self {
        Self { codec }
    }

    /// Encode `image` as an ISO 19794-5:2011 face record tagged with `purpose`.
    pub fn encode(&self, purpose: &str, image: &[u8]) -> PipelineResult<Vec<u8>> {
        if image.is_empty() {
            return Err(SdkError::unknown("no image to encode").into());
        }

        let request = EncodeRequest {
            modality: FACE_MODALITY.to_string(),
            purpose: purpose.to_string(),
            version: ISO_19794_5_2011.to_string(),
            image: image.to_vec(),
        };
        let record = self
            .codec
            .encode(&request)
            .map_err(|e| SdkError::unknown(format!("face conversion failed: {e}")))?;
        tracing::debug!("Encoded face record of {} bytes", record.len());
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{DecodeRequest, FaceRecord};
    use crate::error::{CodecError, PipelineError};
    use crate::status::ResponseStatus;
    use std::sync::Mutex;

    #[derive(Default)]
    struct CapturingCodec {
        last: Mutex<Option<EncodeRequest>>,
        fail: bool,
    }

    impl InterchangeCodec for CapturingCodec {
        fn decode(&self, _request: &DecodeRequest) -> Result<FaceRecord, CodecError> {
            unreachable!("encoder never decodes")
        }

        fn encode(&self, request: &EncodeRequest) -> Result<Vec<u8>, CodecError> {
            *self.last.lock().unwrap() = Some(request.clone());
            if self.fail {
                return Err(CodecError::Encode("writer exploded".into()));
            }
            let mut out = b"FAC\0".to_vec();
            out.extend_from_slice(&request.image);
            Ok(out)
        }
    }

    #[test]
    fn test_encode_builds_face_request() {
        let codec = CapturingCodec::default();
        let out = InterchangeEncoder::new(&codec)
            .encode("REGISTRATION", &[1, 2, 3])
            .unwrap();

        assert_eq!(out, b"FAC\0\x01\x02\x03".to_vec());
        let request = codec.last.lock().unwrap().clone().unwrap();
        assert_eq!(request.modality, "Face");
        assert_eq!(request.purpose, "REGISTRATION");
        assert_eq!(request.version, "ISO19794_5_2011");
    }

    #[test]
    fn test_empty_image_is_unknown_error() {
        let codec = CapturingCodec::default();
        let err = InterchangeEncoder::new(&codec).encode("REGISTRATION", &[]).unwrap_err();
        assert_eq!(err.status(), ResponseStatus::UnknownError);
        assert!(codec.last.lock().unwrap().is_none());
    }

    #[test]
    fn test_codec_failure_is_unknown_error_with_cause() {
        let codec = CapturingCodec {
            fail: true,
            ..CapturingCodec::default()
        };
        let err = InterchangeEncoder::new(&codec).encode("REGISTRATION", &[9]).unwrap_err();
        match err {
            PipelineError::Sdk(e) => {
                assert_eq!(e.status, ResponseStatus::UnknownError);
                assert!(e.message.contains("writer exploded"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
