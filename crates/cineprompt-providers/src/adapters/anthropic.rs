//! Anthropic Messages API (`POST {base}/v1/messages`).

use reqwest::header::{HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::{json, Value};

use cineprompt_core::error::GenerationError;

use super::{
    decode, join_url, vendor_error, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE,
    PROBE_INSTRUCTION, SYSTEM_INSTRUCTION,
};
use crate::traits::{json_headers, secret_header_value, Credentials, Endpoint, ProviderAdapter};

pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com";
pub const API_VERSION: &str = "2023-06-01";

#[derive(Clone, Debug)]
pub struct AnthropicAdapter {
    base_url: String,
}

impl AnthropicAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    content: Option<Vec<ContentBlock>>,
    #[serde(default)]
    stop_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
}

impl ProviderAdapter for AnthropicAdapter {
    fn endpoint(&self, credentials: &Credentials) -> Result<Endpoint, GenerationError> {
        let mut headers = json_headers();
        headers.insert(
            HeaderName::from_static("x-api-key"),
            secret_header_value(&credentials.api_key)?,
        );
        headers.insert(
            HeaderName::from_static("anthropic-version"),
            HeaderValue::from_static(API_VERSION),
        );
        Ok(Endpoint {
            url: join_url(&self.base_url, "v1/messages"),
            headers,
        })
    }

    fn test_body(&self, model: &str) -> Value {
        json!({
            "model": model,
            "max_tokens": 10,
            "messages": [{ "role": "user", "content": PROBE_INSTRUCTION }],
        })
    }

    fn generation_body(&self, model: &str, prompt: &str) -> Value {
        json!({
            "model": model,
            "max_tokens": GENERATION_MAX_TOKENS,
            "temperature": GENERATION_TEMPERATURE,
            "system": SYSTEM_INSTRUCTION,
            "messages": [{ "role": "user", "content": prompt }],
        })
    }

    fn classify_test_response(&self, body: &Value) -> Result<(), GenerationError> {
        let response: MessagesResponse = decode(body)?;
        if let Some(err) = vendor_error(response.error.as_ref(), body) {
            return Err(err);
        }
        if response.content.is_some() {
            Ok(())
        } else {
            Err(GenerationError::Provider {
                message: "Unexpected response".into(),
                body: Some(body.to_string()),
            })
        }
    }

    fn classify_generation_response(&self, body: &Value) -> Result<String, GenerationError> {
        let response: MessagesResponse = decode(body)?;
        if let Some(err) = vendor_error(response.error.as_ref(), body) {
            return Err(err);
        }

        let blocks = response
            .content
            .filter(|c| !c.is_empty())
            .ok_or_else(|| GenerationError::EmptyResponse("No response from Claude".into()))?;

        let text = blocks
            .into_iter()
            .find(|b| b.kind.as_deref() == Some("text"))
            .and_then(|b| b.text)
            .filter(|t| !t.is_empty());

        match text {
            Some(text) => Ok(text),
            None if response.stop_reason.as_deref() == Some("refusal") => {
                Err(GenerationError::SafetyBlocked("refusal".into()))
            }
            None => Err(GenerationError::EmptyResponse("Empty Claude response".into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> AnthropicAdapter {
        AnthropicAdapter::new(DEFAULT_BASE_URL)
    }

    fn creds() -> Credentials {
        Credentials {
            api_key: "sk-ant-test".into(),
            model: "claude-sonnet-4-20250514".into(),
        }
    }

    #[test]
    fn test_endpoint_headers() {
        let ep = adapter().endpoint(&creds()).unwrap();
        assert_eq!(ep.url, "https://api.anthropic.com/v1/messages");
        assert_eq!(ep.headers["x-api-key"], "sk-ant-test");
        assert_eq!(ep.headers["anthropic-version"], "2023-06-01");
        assert!(ep.headers.get("authorization").is_none());
    }

    #[test]
    fn test_bodies() {
        let test = adapter().test_body("claude-sonnet-4-20250514");
        assert_eq!(test["max_tokens"], 10);
        assert_eq!(test["messages"][0]["content"], PROBE_INSTRUCTION);

        let gen = adapter().generation_body("claude-sonnet-4-20250514", "PROMPT");
        assert_eq!(gen["system"], SYSTEM_INSTRUCTION);
        assert_eq!(gen["max_tokens"], 16384);
        assert_eq!(gen["temperature"], 0.75);
        assert_eq!(gen["messages"][0]["role"], "user");
        assert_eq!(gen["messages"][0]["content"], "PROMPT");
    }

    #[test]
    fn test_probe_classification() {
        let ok = json!({"content": [{"type": "text", "text": "OK"}]});
        assert!(adapter().classify_test_response(&ok).is_ok());

        let err = adapter()
            .classify_test_response(&json!({"type": "error", "error": {"type": "authentication_error", "message": "invalid x-api-key"}}))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid x-api-key");

        let err = adapter().classify_test_response(&json!({"id": "msg_1"})).unwrap_err();
        assert_eq!(err.to_string(), "Unexpected response");
    }

    #[test]
    fn test_generation_skips_non_text_blocks() {
        let body = json!({
            "content": [
                {"type": "thinking", "thinking": "hmm"},
                {"type": "text", "text": "[]"}
            ],
            "stop_reason": "end_turn"
        });
        assert_eq!(adapter().classify_generation_response(&body).unwrap(), "[]");
    }

    #[test]
    fn test_generation_empty_content() {
        let err = adapter()
            .classify_generation_response(&json!({"content": []}))
            .unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse(_)));
    }

    #[test]
    fn test_generation_refusal() {
        let body = json!({"content": [{"type": "tool_use"}], "stop_reason": "refusal"});
        let err = adapter().classify_generation_response(&body).unwrap_err();
        assert!(matches!(err, GenerationError::SafetyBlocked(_)));
    }
}
