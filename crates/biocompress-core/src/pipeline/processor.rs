//! Pipeline orchestration - wires together all processing stages.

use std::any::Any;
use std::collections::HashMap;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use chrono::Local;

use crate::codec::iso::PURPOSE_REGISTRATION;
use crate::codec::{ImageCodec, InterchangeCodec};
use crate::config::{CompressorSettings, ConfigResolver, PropertySource};
use crate::error::PipelineResult;
use crate::status::{Response, ResponseStatus};
use crate::types::{BiometricRecord, BiometricType, ProcessedLevelType, Segment};

use super::encode::InterchangeEncoder;
use super::extract::RawImageExtractor;
use super::transcode::ImageTranscoder;
use super::validate::SegmentValidator;

/// Runs validate, extract, transcode, encode and rewrite over every segment
/// of a record and turns the outcome into a [`Response`] envelope.
pub struct PipelineOrchestrator<'a> {
    source: Option<&'a dyn PropertySource>,
    image_codec: &'a dyn ImageCodec,
    interchange_codec: &'a dyn InterchangeCodec,
}

impl<'a> PipelineOrchestrator<'a> {
    pub fn new(
        source: Option<&'a dyn PropertySource>,
        image_codec: &'a dyn ImageCodec,
        interchange_codec: &'a dyn InterchangeCodec,
    ) -> Self {
        Self {
            source,
            image_codec,
            interchange_codec,
        }
    }

    /// Compress every face segment of `record`.
    ///
    /// Never fails: errors and panics become failure envelopes. `modalities`
    /// is accepted for interface compatibility and does not filter segments.
    pub fn run(
        &self,
        record: Option<BiometricRecord>,
        modalities: Option<&[BiometricType]>,
        flags: &HashMap<String, String>,
    ) -> Response<BiometricRecord> {
        tracing::info!("extractTemplate start, record: {:?}", record);
        tracing::debug!("Requested modalities {:?} (not used for filtering)", modalities);

        let settings = ConfigResolver::resolve(self.source, flags);
        let start = Instant::now();

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.process(record, &settings)));

        let response = match outcome {
            Ok(Ok(record)) => Response::success(record),
            Ok(Err(e)) => {
                tracing::error!("extractTemplate failed: {}", e);
                Response::failure(e.status())
            }
            Err(payload) => {
                tracing::error!(
                    "extractTemplate aborted by panic: {}",
                    panic_message(payload.as_ref())
                );
                Response::failure(ResponseStatus::UnknownError)
            }
        };

        tracing::info!(
            "extractTemplate end in {:?}, response: {:?}",
            start.elapsed(),
            response
        );
        response
    }

    fn process(
        &self,
        record: Option<BiometricRecord>,
        settings: &CompressorSettings,
    ) -> PipelineResult<BiometricRecord> {
        let count = SegmentValidator::validate(record.as_ref())?.len();
        tracing::debug!("Validated {} segment(s)", count);

        let mut record = record.unwrap_or_default();

        let segments = record.segments.get_or_insert_with(Vec::new);
        for (index, segment) in segments.iter_mut().enumerate() {
            let segment_start = Instant::now();
            *segment = self.process_segment(segment, settings)?;
            tracing::trace!("  Segment {}: {:?}", index, segment_start.elapsed());
        }
        Ok(record)
    }

    fn process_segment(
        &self,
        segment: &Segment,
        settings: &CompressorSettings,
    ) -> PipelineResult<Segment> {
        let raw = RawImageExtractor::new(self.interchange_codec).extract(segment)?;
        let compressed = ImageTranscoder::new(self.image_codec).transcode(&raw, settings)?;
        let bdb = InterchangeEncoder::new(self.interchange_codec)
            .encode(PURPOSE_REGISTRATION, &compressed)?;
        Ok(Self::rewrite(segment, bdb))
    }

    /// Build the replacement segment around a freshly encoded BDB.
    ///
    /// Level becomes raw, quality is cleared and the creation date is now.
    /// Everything else is carried over from the original.
    fn rewrite(segment: &Segment, bdb: Vec<u8>) -> Segment {
        let bdb_info = segment.bdb_info.clone().map(|mut info| {
            info.level = Some(ProcessedLevelType::Raw);
            info.quality = None;
            info.creation_date = Some(Local::now().naive_local());
            info
        });
        Segment {
            version: segment.version,
            cbeff_version: segment.cbeff_version,
            bir_info: segment.bir_info.clone(),
            bdb_info,
            bdb: Some(bdb),
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}
