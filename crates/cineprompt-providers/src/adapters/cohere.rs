//! Cohere v2 chat (`POST {base}/v2/chat`).
//!
//! Cohere reports failures as a top-level `message` on a body with no `id`.
//! On success `message` is the assistant turn instead.

use serde::Deserialize;
use serde_json::{json, Value};

use cineprompt_core::error::{is_truthy, provider_error_message, GenerationError};
use cineprompt_core::types::{ChatCompletionRequest, Message};

use super::{
    decode, join_url, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE, PROBE_INSTRUCTION,
    SYSTEM_INSTRUCTION,
};
use crate::traits::{bearer_headers, Credentials, Endpoint, ProviderAdapter};

pub const DEFAULT_BASE_URL: &str = "https://api.cohere.com";

#[derive(Clone, Debug)]
pub struct CohereAdapter {
    base_url: String,
}

impl CohereAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct AssistantTurn {
    #[serde(default)]
    content: Option<Vec<ContentItem>>,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    #[serde(default)]
    text: Option<String>,
}

impl ChatResponse {
    fn vendor_error(&self, body: &Value) -> Option<GenerationError> {
        let has_id = self.id.as_ref().is_some_and(is_truthy);
        match &self.message {
            Some(message) if !has_id && is_truthy(message) => Some(GenerationError::Provider {
                message: provider_error_message(message),
                body: Some(body.to_string()),
            }),
            _ => None,
        }
    }
}

impl ProviderAdapter for CohereAdapter {
    fn endpoint(&self, credentials: &Credentials) -> Result<Endpoint, GenerationError> {
        Ok(Endpoint {
            url: join_url(&self.base_url, "v2/chat"),
            headers: bearer_headers(&credentials.api_key)?,
        })
    }

    fn test_body(&self, model: &str) -> Value {
        json!(ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![Message::user(PROBE_INSTRUCTION)],
            max_tokens: Some(10),
            temperature: None,
        })
    }

    fn generation_body(&self, model: &str, prompt: &str) -> Value {
        json!(ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![Message::system(SYSTEM_INSTRUCTION), Message::user(prompt)],
            max_tokens: Some(GENERATION_MAX_TOKENS),
            temperature: Some(GENERATION_TEMPERATURE),
        })
    }

    fn classify_test_response(&self, body: &Value) -> Result<(), GenerationError> {
        let response: ChatResponse = decode(body)?;
        match response.vendor_error(body) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn classify_generation_response(&self, body: &Value) -> Result<String, GenerationError> {
        let response: ChatResponse = decode(body)?;
        if let Some(err) = response.vendor_error(body) {
            return Err(err);
        }

        let turn: Option<AssistantTurn> = match response.message.as_ref() {
            Some(message @ Value::Object(_)) => Some(decode(message)?),
            _ => None,
        };

        turn.and_then(|t| t.content)
            .and_then(|items| items.into_iter().next())
            .and_then(|item| item.text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GenerationError::EmptyResponse("No response from AI".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adapter() -> CohereAdapter {
        CohereAdapter::new(DEFAULT_BASE_URL)
    }

    #[test]
    fn test_endpoint() {
        let creds = Credentials {
            api_key: "co-test".into(),
            model: "command-r-plus".into(),
        };
        let ep = adapter().endpoint(&creds).unwrap();
        assert_eq!(ep.url, "https://api.cohere.com/v2/chat");
        assert_eq!(ep.headers["authorization"], "Bearer co-test");
    }

    #[test]
    fn test_bodies() {
        let test = adapter().test_body("command-r-plus");
        assert_eq!(test["max_tokens"], 10);
        assert!(test.get("temperature").is_none());

        let gen = adapter().generation_body("command-r-plus", "PROMPT");
        assert_eq!(gen["messages"][0]["role"], "system");
        assert_eq!(gen["messages"][1]["content"], "PROMPT");
        assert_eq!(gen["max_tokens"], 16384);
        assert_eq!(gen["temperature"], 0.75);
    }

    #[test]
    fn test_message_without_id_is_error() {
        let err = adapter()
            .classify_test_response(&json!({"message": "invalid api token"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid api token");

        let err = adapter()
            .classify_generation_response(&json!({"message": "invalid api token"}))
            .unwrap_err();
        assert_eq!(err.to_string(), "invalid api token");
    }

    #[test]
    fn test_probe_success() {
        let body = json!({"id": "abc", "message": {"role": "assistant", "content": [{"type": "text", "text": "OK"}]}});
        assert!(adapter().classify_test_response(&body).is_ok());
    }

    #[test]
    fn test_generation_text() {
        let body = json!({"id": "abc", "message": {"content": [{"type": "text", "text": "[]"}]}});
        assert_eq!(adapter().classify_generation_response(&body).unwrap(), "[]");
    }

    #[test]
    fn test_generation_empty() {
        let body = json!({"id": "abc", "message": {"content": []}});
        let err = adapter().classify_generation_response(&body).unwrap_err();
        assert!(matches!(err, GenerationError::EmptyResponse(_)));
    }
}
