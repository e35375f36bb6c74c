//! Caller-visible status taxonomy and the response envelope.

use serde::{Deserialize, Serialize};

/// Context token embedded in input-related status messages.
pub const SAMPLE_CONTEXT: &str = "sample";

/// Status reported back to SDK callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseStatus {
    Success,
    InvalidInput,
    MissingInput,
    QualityCheckFailed,
    BiometricNotFoundInCbeff,
    MatchingOfBiometricDataFailed,
    PoorDataQuality,
    UnknownError,
}

impl ResponseStatus {
    const ALL: [ResponseStatus; 8] = [
        ResponseStatus::Success,
        ResponseStatus::InvalidInput,
        ResponseStatus::MissingInput,
        ResponseStatus::QualityCheckFailed,
        ResponseStatus::BiometricNotFoundInCbeff,
        ResponseStatus::MatchingOfBiometricDataFailed,
        ResponseStatus::PoorDataQuality,
        ResponseStatus::UnknownError,
    ];

    /// Numeric status code.
    pub fn code(self) -> i32 {
        match self {
            ResponseStatus::Success => 200,
            ResponseStatus::InvalidInput => 401,
            ResponseStatus::MissingInput => 402,
            ResponseStatus::QualityCheckFailed => 403,
            ResponseStatus::BiometricNotFoundInCbeff => 404,
            ResponseStatus::MatchingOfBiometricDataFailed => 405,
            ResponseStatus::PoorDataQuality => 406,
            ResponseStatus::UnknownError => 500,
        }
    }

    /// Raw message template; `%s` marks where the context goes.
    pub fn message_template(self) -> &'static str {
        match self {
            ResponseStatus::Success => "OK",
            ResponseStatus::InvalidInput => "Invalid Input Parameter - %s",
            ResponseStatus::MissingInput => "Missing Input Parameter - %s",
            ResponseStatus::QualityCheckFailed => "Quality check of Biometric data failed",
            ResponseStatus::BiometricNotFoundInCbeff => "Biometrics not found in CBEFF",
            ResponseStatus::MatchingOfBiometricDataFailed => "Matching of Biometric data failed",
            ResponseStatus::PoorDataQuality => "Data provided is of poor quality",
            ResponseStatus::UnknownError => "UNKNOWN_ERROR",
        }
    }

    /// Fill the template with `context`.
    pub fn message(self, context: &str) -> String {
        self.message_template().replace("%s", context)
    }

    /// Message shown to callers when the pipeline fails with this status.
    pub fn failure_message(self) -> String {
        match self {
            ResponseStatus::InvalidInput | ResponseStatus::MissingInput => {
                self.message(SAMPLE_CONTEXT)
            }
            _ => self.message(""),
        }
    }

    /// Look a status up by its numeric code.
    pub fn from_status_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }
}

/// Envelope returned from every SDK call.
///
/// Failures are ordinary values: `response` is `None` and the status says why.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Response<T> {
    pub status_code: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
    pub response: Option<T>,
}

impl<T> Response<T> {
    /// Successful envelope carrying `value` and no message.
    pub fn success(value: T) -> Self {
        Self {
            status_code: ResponseStatus::Success.code(),
            status_message: None,
            response: Some(value),
        }
    }

    /// Failure envelope for `status` with its templated message.
    pub fn failure(status: ResponseStatus) -> Self {
        Self {
            status_code: status.code(),
            status_message: Some(status.failure_message()),
            response: None,
        }
    }

    pub fn status(&self) -> Option<ResponseStatus> {
        ResponseStatus::from_status_code(self.status_code)
    }

    pub fn is_success(&self) -> bool {
        self.status_code == ResponseStatus::Success.code()
    }
}
