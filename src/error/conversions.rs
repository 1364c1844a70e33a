//! Provider client failures that reach [`LlmError`] through `?`.
//!
//! Transport and body-decoding errors never carry an HTTP status, so they
//! always classify as [`FailureClass::Other`](super::FailureClass::Other) and
//! never trigger the secondary provider.

use super::types::LlmError;

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        Self::HttpError(err.to_string())
    }
}

impl From<serde_json::Error> for LlmError {
    fn from(err: serde_json::Error) -> Self {
        Self::JsonError(err.to_string())
    }
}
