//! Error taxonomy for probing and generation.
//!
//! Every variant carries a human-readable `Display` message. Diagnostic detail
//! (raw provider bodies, unparseable model text) is kept on the variant so
//! callers can log it without showing it to the user.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// Why JSON Recovery could not produce a shot list.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParseFailure {
    /// No `[` … `]` pair in the text.
    NoArray,
    /// A bracketed region was found but is not valid JSON.
    Malformed,
    /// Valid JSON array holding elements that are not scene objects.
    Schema,
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseFailure::NoArray => write!(f, "no JSON array found"),
            ParseFailure::Malformed => write!(f, "malformed JSON array"),
            ParseFailure::Schema => write!(f, "JSON array does not hold scene objects"),
        }
    }
}

/// Errors surfaced by the provider pipeline.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("network error: {0}")]
    Network(String),

    #[error("request timed out after {}s", .0.as_secs())]
    Timeout(Duration),

    #[error("request cancelled")]
    Cancelled,

    #[error("invalid API key for {provider} (HTTP {status})")]
    Auth {
        provider: String,
        status: u16,
        body: String,
    },

    #[error("rate limited by {provider}; the key is valid, wait and try again")]
    RateLimit { provider: String, body: String },

    #[error("model \"{model}\" not found; try a different model")]
    ModelNotFound { model: String, body: String },

    #[error("{message}")]
    Provider {
        message: String,
        body: Option<String>,
    },

    #[error("blocked by safety filters: {0}")]
    SafetyBlocked(String),

    #[error("empty response: {0}")]
    EmptyResponse(String),

    #[error("could not parse AI response ({failure})")]
    Parse { failure: ParseFailure, raw: String },

    #[error("AI returned empty results; try again with more story detail")]
    EmptyResult,

    #[error("please enter an API key for {0}")]
    MissingApiKey(String),

    #[error("unknown provider: {0}")]
    UnknownProvider(String),

    #[error("invalid credential: {0}")]
    InvalidCredential(String),
}

/// Copyable classification of a [`GenerationError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Network,
    Timeout,
    Cancelled,
    Auth,
    RateLimit,
    ModelNotFound,
    Provider,
    SafetyBlocked,
    EmptyResponse,
    Parse,
    EmptyResult,
    MissingApiKey,
    UnknownProvider,
    InvalidCredential,
}

impl GenerationError {
    /// Build a provider error with no attached body.
    pub fn provider(message: impl Into<String>) -> Self {
        GenerationError::Provider {
            message: message.into(),
            body: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            GenerationError::Network(_) => ErrorKind::Network,
            GenerationError::Timeout(_) => ErrorKind::Timeout,
            GenerationError::Cancelled => ErrorKind::Cancelled,
            GenerationError::Auth { .. } => ErrorKind::Auth,
            GenerationError::RateLimit { .. } => ErrorKind::RateLimit,
            GenerationError::ModelNotFound { .. } => ErrorKind::ModelNotFound,
            GenerationError::Provider { .. } => ErrorKind::Provider,
            GenerationError::SafetyBlocked(_) => ErrorKind::SafetyBlocked,
            GenerationError::EmptyResponse(_) => ErrorKind::EmptyResponse,
            GenerationError::Parse { .. } => ErrorKind::Parse,
            GenerationError::EmptyResult => ErrorKind::EmptyResult,
            GenerationError::MissingApiKey(_) => ErrorKind::MissingApiKey,
            GenerationError::UnknownProvider(_) => ErrorKind::UnknownProvider,
            GenerationError::InvalidCredential(_) => ErrorKind::InvalidCredential,
        }
    }

    /// Raw diagnostic payload (provider body or model text), if any.
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            GenerationError::Auth { body, .. }
            | GenerationError::RateLimit { body, .. }
            | GenerationError::ModelNotFound { body, .. } => Some(body),
            GenerationError::Provider { body, .. } => body.as_deref(),
            GenerationError::Parse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}

/// Human-readable message out of a provider `error` value.
///
/// Prefers `error.message`, then a bare string, then the serialized value.
pub fn provider_error_message(error: &serde_json::Value) -> String {
    if let Some(msg) = error.get("message").and_then(|m| m.as_str()) {
        if !msg.is_empty() {
            return msg.to_string();
        }
    }
    match error {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// JavaScript-style truthiness, used by vendor error checks that treat
/// `null`, `false`, `0`, and `""` as absent.
pub fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(GenerationError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(
            GenerationError::Timeout(Duration::from_secs(15)).kind(),
            ErrorKind::Timeout
        );
        assert_eq!(GenerationError::provider("boom").kind(), ErrorKind::Provider);
        assert_eq!(GenerationError::EmptyResult.kind(), ErrorKind::EmptyResult);
    }

    #[test]
    fn test_timeout_message() {
        let err = GenerationError::Timeout(Duration::from_secs(120));
        assert_eq!(err.to_string(), "request timed out after 120s");
    }

    #[test]
    fn test_parse_error_keeps_raw_text() {
        let err = GenerationError::Parse {
            failure: ParseFailure::NoArray,
            raw: "I cannot help with that".to_string(),
        };
        assert_eq!(err.diagnostic(), Some("I cannot help with that"));
        assert!(err.to_string().contains("no JSON array found"));
    }

    #[test]
    fn test_provider_error_message() {
        assert_eq!(
            provider_error_message(&json!({"message": "bad key", "code": 7})),
            "bad key"
        );
        assert_eq!(provider_error_message(&json!("plain")), "plain");
        assert_eq!(
            provider_error_message(&json!({"code": "oops"})),
            r#"{"code":"oops"}"#
        );
    }

    #[test]
    fn test_is_truthy() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(false)));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
    }
}
