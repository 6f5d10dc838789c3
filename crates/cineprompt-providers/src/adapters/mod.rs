//! Built-in adapters, one per API family.

pub mod anthropic;
pub mod cohere;
pub mod gemini;
pub mod openai_compat;

use std::sync::Arc;

use reqwest::header::{HeaderName, HeaderValue};
use serde::Deserialize;
use serde_json::Value;

use cineprompt_core::error::{is_truthy, provider_error_message, GenerationError};

pub use anthropic::AnthropicAdapter;
pub use cohere::CohereAdapter;
pub use gemini::GeminiAdapter;
pub use openai_compat::OpenAiCompatible;

use crate::traits::ProviderAdapter;

/// System turn sent with every generation request.
pub const SYSTEM_INSTRUCTION: &str = "You are an expert cinematographer and AI image prompt engineer. \
You respond ONLY with valid JSON arrays. No markdown, no code blocks, no explanations.";

/// User turn of every connectivity probe.
pub const PROBE_INSTRUCTION: &str = "Reply with exactly one word: OK";

pub const GENERATION_TEMPERATURE: f64 = 0.75;
pub const GENERATION_MAX_TOKENS: u32 = 16384;

/// Sent to OpenRouter so requests are attributed to the app.
pub const APP_URL: &str = "https://cineprompt.studio";
pub const APP_TITLE: &str = "CinePrompt Studio";

// ─────────────────────────────────────────────
// Built-in table
// ─────────────────────────────────────────────

/// Builds an adapter, optionally pointed at a different base URL.
pub type AdapterFactory = fn(Option<&str>) -> Arc<dyn ProviderAdapter>;

/// Every built-in provider id with the factory for its adapter.
pub static BUILTIN_ADAPTERS: &[(&str, AdapterFactory)] = &[
    ("gemini", |base| {
        Arc::new(GeminiAdapter::new(base.unwrap_or(gemini::DEFAULT_BASE_URL)))
    }),
    ("deepseek", |base| {
        Arc::new(OpenAiCompatible::new(base.unwrap_or("https://api.deepseek.com/v1")))
    }),
    ("anthropic", |base| {
        Arc::new(AnthropicAdapter::new(base.unwrap_or(anthropic::DEFAULT_BASE_URL)))
    }),
    ("openai", |base| {
        Arc::new(OpenAiCompatible::new(base.unwrap_or("https://api.openai.com/v1")))
    }),
    ("perplexity", |base| {
        Arc::new(OpenAiCompatible::new(base.unwrap_or("https://api.perplexity.ai")))
    }),
    ("xai", |base| {
        Arc::new(OpenAiCompatible::new(base.unwrap_or("https://api.x.ai/v1")))
    }),
    ("groq", |base| {
        Arc::new(OpenAiCompatible::new(base.unwrap_or("https://api.groq.com/openai/v1")))
    }),
    ("mistral", |base| {
        Arc::new(OpenAiCompatible::new(base.unwrap_or("https://api.mistral.ai/v1")))
    }),
    ("together", |base| {
        Arc::new(OpenAiCompatible::new(base.unwrap_or("https://api.together.xyz/v1")))
    }),
    ("fireworks", |base| {
        Arc::new(OpenAiCompatible::new(
            base.unwrap_or("https://api.fireworks.ai/inference/v1"),
        ))
    }),
    ("cohere", |base| {
        Arc::new(CohereAdapter::new(base.unwrap_or(cohere::DEFAULT_BASE_URL)))
    }),
    ("openrouter", |base| {
        Arc::new(
            OpenAiCompatible::new(base.unwrap_or("https://openrouter.ai/api/v1"))
                .with_header(
                    HeaderName::from_static("http-referer"),
                    HeaderValue::from_static(APP_URL),
                )
                .with_header(HeaderName::from_static("x-title"), HeaderValue::from_static(APP_TITLE)),
        )
    }),
];

/// The built-in adapter for `provider_id`, if there is one.
pub fn builtin_adapter(provider_id: &str, base_url: Option<&str>) -> Option<Arc<dyn ProviderAdapter>> {
    BUILTIN_ADAPTERS
        .iter()
        .find(|(id, _)| *id == provider_id)
        .map(|(_, factory)| factory(base_url))
}

// ─────────────────────────────────────────────
// Shared classification helpers
// ─────────────────────────────────────────────

/// Decode a 2xx body into a partial vendor schema.
pub(crate) fn decode<'a, T: Deserialize<'a>>(body: &'a Value) -> Result<T, GenerationError> {
    T::deserialize(body).map_err(|e| GenerationError::Provider {
        message: format!("Unexpected response format: {e}"),
        body: Some(body.to_string()),
    })
}

/// The vendor's own error indicator, if it is set.
pub(crate) fn vendor_error(error: Option<&Value>, body: &Value) -> Option<GenerationError> {
    error.filter(|e| is_truthy(e)).map(|e| GenerationError::Provider {
        message: provider_error_message(e),
        body: Some(body.to_string()),
    })
}

/// Join a base URL and a path without doubling the slash.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::PROVIDERS;
    use serde_json::json;

    #[test]
    fn test_every_catalog_provider_has_an_adapter() {
        for p in PROVIDERS {
            assert!(builtin_adapter(p.id, None).is_some(), "missing adapter for {}", p.id);
        }
        assert_eq!(BUILTIN_ADAPTERS.len(), PROVIDERS.len());
    }

    #[test]
    fn test_unknown_adapter() {
        assert!(builtin_adapter("nonexistent", None).is_none());
    }

    #[test]
    fn test_join_url() {
        assert_eq!(join_url("https://a.b/v1/", "/chat"), "https://a.b/v1/chat");
        assert_eq!(join_url("https://a.b/v1", "chat"), "https://a.b/v1/chat");
    }

    #[test]
    fn test_vendor_error_ignores_falsy() {
        let body = json!({});
        assert!(vendor_error(None, &body).is_none());
        assert!(vendor_error(Some(&Value::Null), &body).is_none());
        assert!(vendor_error(Some(&json!("")), &body).is_none());
        let err = vendor_error(Some(&json!({"message": "bad key"})), &body).unwrap();
        assert_eq!(err.to_string(), "bad key");
    }
}
