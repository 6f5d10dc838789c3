//! Provider adapter trait and the `RequestSpec` it produces.
//!
//! Every backend (Gemini, Anthropic, Cohere, the OpenAI-compatible family)
//! implements [`ProviderAdapter`]. An adapter knows how to address the vendor
//! (URL + auth headers), what the probe and generation bodies look like, and
//! how to tell a usable reply from a vendor-reported failure.

use std::fmt;
use std::sync::Arc;

use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;

use cineprompt_core::error::GenerationError;

// ─────────────────────────────────────────────
// Inputs / outputs
// ─────────────────────────────────────────────

/// The `(api_key, model)` pair an adapter addresses a vendor with.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub api_key: String,
    pub model: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .finish()
    }
}

/// Where to send a request and with which headers.
#[derive(Clone, Debug, PartialEq)]
pub struct Endpoint {
    pub url: String,
    pub headers: HeaderMap,
}

/// A fully built POST request.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpCall {
    pub url: String,
    pub headers: HeaderMap,
    pub body: Value,
}

// ─────────────────────────────────────────────
// ProviderAdapter
// ─────────────────────────────────────────────

/// Capability interface implemented once per API family.
///
/// Classifiers never trust HTTP status alone: they look for the vendor's own
/// error indicator in the decoded body first, and a missing payload is always
/// an error.
pub trait ProviderAdapter: Send + Sync + fmt::Debug {
    /// URL and headers (including vendor auth) for both probe and generation.
    fn endpoint(&self, credentials: &Credentials) -> Result<Endpoint, GenerationError>;

    /// Minimal one-word completion request.
    fn test_body(&self, model: &str) -> Value;

    /// Generation request carrying `prompt` as the user turn.
    fn generation_body(&self, model: &str, prompt: &str) -> Value;

    /// Decide whether a 2xx probe reply means the credentials work.
    fn classify_test_response(&self, body: &Value) -> Result<(), GenerationError>;

    /// Extract the model's text from a 2xx generation reply.
    fn classify_generation_response(&self, body: &Value) -> Result<String, GenerationError>;

    fn build_test_request(&self, credentials: &Credentials) -> Result<HttpCall, GenerationError> {
        let Endpoint { url, headers } = self.endpoint(credentials)?;
        Ok(HttpCall {
            url,
            headers,
            body: self.test_body(&credentials.model),
        })
    }

    fn build_generation_request(
        &self,
        credentials: &Credentials,
        prompt: &str,
    ) -> Result<HttpCall, GenerationError> {
        let Endpoint { url, headers } = self.endpoint(credentials)?;
        Ok(HttpCall {
            url,
            headers,
            body: self.generation_body(&credentials.model, prompt),
        })
    }
}

// ─────────────────────────────────────────────
// RequestSpec
// ─────────────────────────────────────────────

/// Everything needed to probe or call one provider/model pair.
///
/// Built fresh from `(provider_id, api_key, model)` and owned by the caller.
#[derive(Clone)]
pub struct RequestSpec {
    pub provider_id: String,
    /// Display name used in error messages.
    pub provider_name: String,
    pub model: String,
    pub test_url: String,
    pub test_headers: HeaderMap,
    pub test_body: Value,
    pub generate_url: String,
    pub generate_headers: HeaderMap,
    adapter: Arc<dyn ProviderAdapter>,
}

impl fmt::Debug for RequestSpec {
    // URLs and headers may carry the key; keep them out of logs.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestSpec")
            .field("provider", &self.provider_id)
            .field("model", &self.model)
            .field("adapter", &self.adapter)
            .finish()
    }
}

impl RequestSpec {
    pub fn new(
        provider_id: impl Into<String>,
        provider_name: impl Into<String>,
        adapter: Arc<dyn ProviderAdapter>,
        credentials: &Credentials,
    ) -> Result<Self, GenerationError> {
        let test = adapter.build_test_request(credentials)?;
        let generate = adapter.endpoint(credentials)?;

        Ok(RequestSpec {
            provider_id: provider_id.into(),
            provider_name: provider_name.into(),
            model: credentials.model.clone(),
            test_url: test.url,
            test_headers: test.headers,
            test_body: test.body,
            generate_url: generate.url,
            generate_headers: generate.headers,
            adapter,
        })
    }

    pub fn build_generation_body(&self, prompt: &str) -> Value {
        self.adapter.generation_body(&self.model, prompt)
    }

    pub fn classify_test_response(&self, body: &Value) -> Result<(), GenerationError> {
        self.adapter.classify_test_response(body)
    }

    pub fn classify_generation_response(&self, body: &Value) -> Result<String, GenerationError> {
        self.adapter.classify_generation_response(body)
    }
}

// ─────────────────────────────────────────────
// Header helpers
// ─────────────────────────────────────────────

/// `Content-Type: application/json` and nothing else.
pub fn json_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers
}

/// A header value holding a secret; rejected if it contains characters HTTP
/// headers cannot carry.
pub fn secret_header_value(value: &str) -> Result<HeaderValue, GenerationError> {
    let mut header = HeaderValue::from_str(value).map_err(|_| {
        GenerationError::InvalidCredential("API key contains characters not allowed in HTTP headers".into())
    })?;
    header.set_sensitive(true);
    Ok(header)
}

/// JSON headers plus `Authorization: Bearer <key>`.
pub fn bearer_headers(api_key: &str) -> Result<HeaderMap, GenerationError> {
    let mut headers = json_headers();
    headers.insert(AUTHORIZATION, secret_header_value(&format!("Bearer {api_key}"))?);
    Ok(headers)
}
