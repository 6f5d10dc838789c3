//! OpenAI-compatible chat completions (`POST {base}/chat/completions`).
//!
//! Covers OpenAI, DeepSeek, Perplexity, xAI, Groq, Mistral, Together,
//! Fireworks and OpenRouter. They differ only in base URL and, for
//! OpenRouter, two attribution headers.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::{json, Value};

use cineprompt_core::error::GenerationError;
use cineprompt_core::types::{ChatCompletionRequest, ChatCompletionResponse, Message};

use super::{
    decode, join_url, vendor_error, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE,
    PROBE_INSTRUCTION, SYSTEM_INSTRUCTION,
};
use crate::traits::{bearer_headers, Credentials, Endpoint, ProviderAdapter};

/// Probe replies only need a non-empty `choices`; message shape is not checked.
#[derive(Debug, Deserialize)]
struct ProbeResponse {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    choices: Option<Vec<Value>>,
}

#[derive(Clone, Debug)]
pub struct OpenAiCompatible {
    base_url: String,
    extra_headers: HeaderMap,
}

impl OpenAiCompatible {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            extra_headers: HeaderMap::new(),
        }
    }

    /// Add a fixed header sent with every request.
    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.extra_headers.insert(name, value);
        self
    }

    pub fn completions_url(&self) -> String {
        join_url(&self.base_url, "chat/completions")
    }
}

impl ProviderAdapter for OpenAiCompatible {
    fn endpoint(&self, credentials: &Credentials) -> Result<Endpoint, GenerationError> {
        let mut headers = bearer_headers(&credentials.api_key)?;
        headers.extend(self.extra_headers.clone());
        Ok(Endpoint {
            url: self.completions_url(),
            headers,
        })
    }

    fn test_body(&self, model: &str) -> Value {
        json!(ChatCompletionRequest {
            model: model.to_string(),
            messages: vec![Message::user(PROBE_INSTRUCTION)],
            max_tokens: Some(5),
            temperature: Some(0.0),
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
        let response: ProbeResponse = decode(body)?;
        if let Some(err) = vendor_error(response.error.as_ref(), body) {
            return Err(err);
        }
        match response.choices {
            Some(choices) if !choices.is_empty() => Ok(()),
            _ => Err(GenerationError::Provider {
                message: "Unexpected response format".into(),
                body: Some(body.to_string()),
            }),
        }
    }

    fn classify_generation_response(&self, body: &Value) -> Result<String, GenerationError> {
        let response: ChatCompletionResponse = decode(body)?;
        if let Some(err) = vendor_error(response.error.as_ref(), body) {
            return Err(err);
        }

        let choice = response
            .choices
            .and_then(|choices| choices.into_iter().next())
            .ok_or_else(|| GenerationError::EmptyResponse("No response from AI".into()))?;

        let content = choice
            .message
            .and_then(|m| m.content)
            .filter(|c| !c.is_empty());

        match content {
            Some(text) => Ok(text),
            None if choice.finish_reason.as_deref() == Some("content_filter") => {
                Err(GenerationError::SafetyBlocked("content_filter".into()))
            }
            None => Err(GenerationError::EmptyResponse("Empty AI response".into())),
        }
    }
}
