//! Analysis request/reply types and how replies are read.
//!
//! The board submits `{"image": "<base64 png>"}` and expects back either
//! `{"result": "..."}` (markdown with LaTeX math) or `{"error": "..."}`.
//! Every failure is reported to the user as a single message, so
//! [`AnalysisError`]'s `Display` output is exactly what the alert shows.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::canvas::CanvasError;

/// Route served by the proxy and by the backend.
pub const ANALYZE_PATH: &str = "/api/analyze";

/// Body of an analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyzeRequest {
    /// Base64-encoded PNG, without a `data:` prefix.
    pub image: String,
}

impl AnalyzeRequest {
    pub fn new(image: impl Into<String>) -> Self {
        Self { image: image.into() }
    }
}

/// Body of an error reply as produced by the proxy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReply {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorReply {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into(), details: None }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

/// Why an analysis produced no result.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Another analysis is still in flight
    #[error("An analysis is already in progress")]
    InFlight,
    /// The drawing could not be encoded
    #[error("Failed to capture the drawing: {0}")]
    Capture(#[from] CanvasError),
    /// Non-OK HTTP status; the message comes from the reply when it has one
    #[error("{message}")]
    Status { status: u16, message: String },
    /// OK status but the reply carried an `error`
    #[error("{0}")]
    Rejected(String),
    /// OK status with no `result`
    #[error("No analysis result received")]
    MissingResult,
    /// OK status but the body was not JSON
    #[error("Invalid response from server: {0}")]
    InvalidBody(String),
    /// The request never got a reply
    #[error("Failed to analyze image: {0}")]
    Transport(String),
}

/// Turn an HTTP status and body into the analysis text or a user-facing error.
///
/// ```
/// use chalkx::analysis::interpret_reply;
///
/// let text = interpret_reply(200, br#"{"result": "$x = 2$"}"#).unwrap();
/// assert_eq!(text, "$x = 2$");
///
/// let err = interpret_reply(400, br#"{"error": "No image data provided"}"#).unwrap_err();
/// assert_eq!(err.to_string(), "No image data provided");
/// ```
pub fn interpret_reply(status: u16, body: &[u8]) -> Result<String, AnalysisError> {
    let parsed: Result<Value, _> = serde_json::from_slice(body);

    if !(200..300).contains(&status) {
        let message = match parsed {
            Ok(value) => error_text(&value).unwrap_or_else(|| format!("Server error: {}", status)),
            Err(_) => format!("HTTP error! status: {}", status),
        };
        return Err(AnalysisError::Status { status, message });
    }

    let value = parsed.map_err(|e| AnalysisError::InvalidBody(e.to_string()))?;
    if let Some(error) = error_text(&value) {
        return Err(AnalysisError::Rejected(error));
    }
    match value.get("result").and_then(Value::as_str) {
        Some(result) if !result.is_empty() => Ok(result.to_string()),
        _ => Err(AnalysisError::MissingResult),
    }
}

/// The `error` member of a reply, if it is set to something truthy.
pub fn error_text(value: &Value) -> Option<String> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_wire_format() {
        let json = serde_json::to_string(&AnalyzeRequest::new("iVBOR")).unwrap();
        assert_eq!(json, r#"{"image":"iVBOR"}"#);
    }

    #[test]
    fn test_error_reply_omits_empty_details() {
        let json = serde_json::to_string(&ErrorReply::new("boom")).unwrap();
        assert_eq!(json, r#"{"error":"boom"}"#);
        let json = serde_json::to_string(&ErrorReply::new("boom").with_details("io")).unwrap();
        assert_eq!(json, r#"{"error":"boom","details":"io"}"#);
    }

    #[test]
    fn test_ok_with_result() {
        assert_eq!(interpret_reply(200, br#"{"result":"Hi! I'm ChalkX."}"#).unwrap(), "Hi! I'm ChalkX.");
    }

    #[test]
    fn test_bad_status_uses_error_verbatim() {
        let err = interpret_reply(400, br#"{"error":"Invalid base64 image data"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Status { status: 400, .. }));
        assert_eq!(err.to_string(), "Invalid base64 image data");
    }

    #[test]
    fn test_bad_status_without_error_field() {
        let err = interpret_reply(502, br#"{"detail":"upstream"}"#).unwrap_err();
        assert_eq!(err.to_string(), "Server error: 502");
    }

    #[test]
    fn test_bad_status_non_json() {
        let err = interpret_reply(503, b"<html>Service Unavailable</html>").unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 503");
    }

    #[test]
    fn test_ok_with_error_field() {
        let err = interpret_reply(200, br#"{"error":"quota exceeded"}"#).unwrap_err();
        assert!(matches!(err, AnalysisError::Rejected(_)));
        assert_eq!(err.to_string(), "quota exceeded");
    }

    #[test]
    fn test_ok_without_result() {
        let err = interpret_reply(200, br#"{"result":""}"#).unwrap_err();
        assert_eq!(err.to_string(), "No analysis result received");
        let err = interpret_reply(200, b"{}").unwrap_err();
        assert!(matches!(err, AnalysisError::MissingResult));
    }

    #[test]
    fn test_ok_non_json() {
        let err = interpret_reply(200, b"not json").unwrap_err();
        assert!(matches!(err, AnalysisError::InvalidBody(_)));
    }

    #[test]
    fn test_error_text_truthiness() {
        assert_eq!(error_text(&serde_json::json!({"error": null})), None);
        assert_eq!(error_text(&serde_json::json!({"error": ""})), None);
        assert_eq!(error_text(&serde_json::json!({"error": false})), None);
        assert_eq!(error_text(&serde_json::json!({"error": 42})), Some("42".to_string()));
    }
}
