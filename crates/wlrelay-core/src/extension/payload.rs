//! Typed decode of the page preprocessing payload.
//!
//! Expected shape:
//! `{"NSExtensionJavaScriptPreprocessingResultsKey": {"baseURI": "...", "title": "..."}}`

use serde_json::Value;
use thiserror::Error;

pub const PREPROCESSING_RESULTS_KEY: &str = "NSExtensionJavaScriptPreprocessingResultsKey";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PayloadError {
    #[error("payload is not a mapping")]
    NotAMapping,
    #[error("payload has no preprocessing results mapping")]
    MissingResults,
    #[error("preprocessing results have no string baseURI")]
    MissingBaseUri,
}

/// What the page told us about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagePayload {
    pub base_uri: String,
    pub title: Option<String>,
}

/// Decode a loaded attachment. A non-string `title` is dropped rather than
/// failing the whole payload.
pub fn decode_payload(value: &Value) -> Result<PagePayload, PayloadError> {
    let root = value.as_object().ok_or(PayloadError::NotAMapping)?;
    let results = root
        .get(PREPROCESSING_RESULTS_KEY)
        .and_then(Value::as_object)
        .ok_or(PayloadError::MissingResults)?;
    let base_uri = results
        .get("baseURI")
        .and_then(Value::as_str)
        .ok_or(PayloadError::MissingBaseUri)?;
    let title = results
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(PagePayload {
        base_uri: base_uri.to_string(),
        title,
    })
}
