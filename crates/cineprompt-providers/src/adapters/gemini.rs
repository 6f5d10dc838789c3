//! Google Gemini `generateContent`.
//!
//! The key travels as a `key` query parameter; there is no auth header.

use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};

use cineprompt_core::error::GenerationError;

use super::{decode, join_url, vendor_error, GENERATION_TEMPERATURE, PROBE_INSTRUCTION, SYSTEM_INSTRUCTION};
use crate::traits::{json_headers, Credentials, Endpoint, ProviderAdapter};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Gemini accepts a far larger output budget than the other vendors.
pub const MAX_OUTPUT_TOKENS: u32 = 65536;

#[derive(Clone, Debug)]
pub struct GeminiAdapter {
    base_url: String,
}

impl GeminiAdapter {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }
}

// ─────────────────────────────────────────────
// Partial response schema
// ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    candidates: Option<Vec<Candidate>>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<Content>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Option<Vec<Part>>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

impl ProviderAdapter for GeminiAdapter {
    fn endpoint(&self, credentials: &Credentials) -> Result<Endpoint, GenerationError> {
        let path = format!("v1beta/models/{}:generateContent", credentials.model);
        let url = Url::parse_with_params(
            &join_url(&self.base_url, &path),
            &[("key", credentials.api_key.as_str())],
        )
        .map_err(|e| GenerationError::provider(format!("invalid Gemini endpoint: {e}")))?;

        Ok(Endpoint {
            url: url.into(),
            headers: json_headers(),
        })
    }

    fn test_body(&self, _model: &str) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": PROBE_INSTRUCTION }] }],
            "generationConfig": { "maxOutputTokens": 10, "temperature": 0 },
        })
    }

    fn generation_body(&self, _model: &str, prompt: &str) -> Value {
        json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM_INSTRUCTION }] },
            "contents": [{ "role": "user", "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": GENERATION_TEMPERATURE,
                "maxOutputTokens": MAX_OUTPUT_TOKENS,
            },
        })
    }

    fn classify_test_response(&self, body: &Value) -> Result<(), GenerationError> {
        let response: GenerateContentResponse = decode(body)?;
        match vendor_error(response.error.as_ref(), body) {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn classify_generation_response(&self, body: &Value) -> Result<String, GenerationError> {
        let response: GenerateContentResponse = decode(body)?;
        if let Some(err) = vendor_error(response.error.as_ref(), body) {
            return Err(err);
        }

        let Some(candidate) = response.candidates.and_then(|c| c.into_iter().next()) else {
            return Err(
                match response.prompt_feedback.and_then(|f| f.block_reason) {
                    Some(reason) => GenerationError::SafetyBlocked(reason),
                    None => GenerationError::EmptyResponse("No response from AI".into()),
                },
            );
        };

        if candidate.finish_reason.as_deref() == Some("SAFETY") {
            return Err(GenerationError::SafetyBlocked("SAFETY".into()));
        }

        candidate
            .content
            .and_then(|c| c.parts)
            .and_then(|parts| parts.into_iter().next())
            .and_then(|p| p.text)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| GenerationError::EmptyResponse("Empty AI response".into()))
    }
}
