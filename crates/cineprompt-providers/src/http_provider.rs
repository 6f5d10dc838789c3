//! HTTP dispatch: the connectivity prober and the generation orchestrator.
//!
//! Both send one POST built from a [`RequestSpec`], bound the whole exchange
//! (connect, send, read body) by a deadline, map non-2xx statuses to the
//! error taxonomy, and hand 2xx bodies to the adapter's classifier.

use std::future::Future;
use std::time::{Duration, Instant};

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use cineprompt_core::config::GenerationSettings;
use cineprompt_core::error::{is_truthy, GenerationError};
use cineprompt_core::recovery;
use cineprompt_core::types::{total_shots, Scene};
use cineprompt_core::utils::truncate_string;

use crate::traits::RequestSpec;

pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_GENERATE_TIMEOUT: Duration = Duration::from_secs(120);

/// Result of a successful probe.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProbeOutcome {
    pub provider_id: String,
    pub provider_name: String,
    pub model: String,
    pub elapsed: Duration,
}

// ─────────────────────────────────────────────
// ProviderClient
// ─────────────────────────────────────────────

/// Shared HTTP client plus the two deadlines.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct ProviderClient {
    client: reqwest::Client,
    probe_timeout: Duration,
    generate_timeout: Duration,
}

impl Default for ProviderClient {
    fn default() -> Self {
        Self::with_timeouts(DEFAULT_PROBE_TIMEOUT, DEFAULT_GENERATE_TIMEOUT)
    }
}

impl ProviderClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeouts(probe_timeout: Duration, generate_timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(concat!("cineprompt/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "Falling back to a default HTTP client");
                reqwest::Client::new()
            });

        ProviderClient {
            client,
            probe_timeout,
            generate_timeout,
        }
    }

    /// Deadlines from the `generation` config section.
    pub fn from_settings(settings: &GenerationSettings) -> Self {
        Self::with_timeouts(settings.probe_timeout(), settings.generate_timeout())
    }

    pub fn probe_timeout(&self) -> Duration {
        self.probe_timeout
    }

    pub fn generate_timeout(&self) -> Duration {
        self.generate_timeout
    }

    /// Check that the key and model in `spec` work, with a one-word request.
    pub async fn probe(&self, spec: &RequestSpec) -> Result<ProbeOutcome, GenerationError> {
        debug!(provider = %spec.provider_id, model = %spec.model, "Probing provider");
        let started = Instant::now();

        let body = self
            .post_json(
                spec,
                &spec.test_url,
                &spec.test_headers,
                &spec.test_body,
                self.probe_timeout,
            )
            .await?;
        spec.classify_test_response(&body)?;

        let elapsed = started.elapsed();
        info!(
            provider = %spec.provider_id,
            model = %spec.model,
            elapsed_ms = elapsed.as_millis() as u64,
            "Provider connected"
        );

        Ok(ProbeOutcome {
            provider_id: spec.provider_id.clone(),
            provider_name: spec.provider_name.clone(),
            model: spec.model.clone(),
            elapsed,
        })
    }

    /// Send a compiled prompt and recover the shot list from the reply.
    pub async fn generate(&self, spec: &RequestSpec, prompt: &str) -> Result<Vec<Scene>, GenerationError> {
        self.generate_until(spec, prompt, std::future::pending()).await
    }

    /// Like [`generate`](Self::generate), but gives up with
    /// [`GenerationError::Cancelled`] as soon as `cancel` resolves.
    pub async fn generate_until<F>(
        &self,
        spec: &RequestSpec,
        prompt: &str,
        cancel: F,
    ) -> Result<Vec<Scene>, GenerationError>
    where
        F: Future<Output = ()>,
    {
        debug!(
            provider = %spec.provider_id,
            model = %spec.model,
            prompt_chars = prompt.len(),
            "Generating shot list"
        );

        let body = spec.build_generation_body(prompt);
        let exchange = self.post_json(
            spec,
            &spec.generate_url,
            &spec.generate_headers,
            &body,
            self.generate_timeout,
        );

        let response = tokio::select! {
            result = exchange => result?,
            _ = cancel => {
                warn!(provider = %spec.provider_id, "Generation cancelled");
                return Err(GenerationError::Cancelled);
            }
        };

        let text = spec.classify_generation_response(&response)?;
        debug!(provider = %spec.provider_id, chars = text.len(), "Model text received");

        let scenes = recovery::recover(&text)?;
        info!(
            provider = %spec.provider_id,
            scenes = scenes.len(),
            shots = total_shots(&scenes),
            "Shot list generated"
        );
        Ok(scenes)
    }

    /// POST `body` and return the decoded 2xx JSON body.
    async fn post_json(
        &self,
        spec: &RequestSpec,
        url: &str,
        headers: &HeaderMap,
        body: &Value,
        timeout: Duration,
    ) -> Result<Value, GenerationError> {
        let exchange = async {
            let response = self
                .client
                .post(url)
                .headers(headers.clone())
                .json(body)
                .send()
                .await
                .map_err(|e| transport_error(spec, e, timeout))?;
            let status = response.status();
            let text = response
                .text()
                .await
                .map_err(|e| transport_error(spec, e, timeout))?;
            Ok::<_, GenerationError>((status, text))
        };

        let (status, text) = match tokio::time::timeout(timeout, exchange).await {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    provider = %spec.provider_id,
                    timeout_secs = timeout.as_secs_f64(),
                    "Request timed out"
                );
                return Err(GenerationError::Timeout(timeout));
            }
        };

        if !status.is_success() {
            error!(
                provider = %spec.provider_id,
                status = %status,
                body = %truncate_string(&text, 500),
                "API error"
            );
            return Err(status_error(spec, status, text));
        }

        serde_json::from_str(&text).map_err(|e| {
            error!(provider = %spec.provider_id, error = %e, "Response body is not JSON");
            GenerationError::Provider {
                message: format!("Invalid JSON from {}: {e}", spec.provider_name),
                body: Some(text),
            }
        })
    }
}

// ─────────────────────────────────────────────
// Error mapping
// ─────────────────────────────────────────────

fn transport_error(spec: &RequestSpec, e: reqwest::Error, timeout: Duration) -> GenerationError {
    if e.is_timeout() {
        return GenerationError::Timeout(timeout);
    }
    error!(provider = %spec.provider_id, error = %e, "HTTP request failed");
    GenerationError::Network(e.to_string())
}

/// Map a non-2xx status to the taxonomy. Only unrecognized statuses look at
/// the body for a message.
fn status_error(spec: &RequestSpec, status: StatusCode, body: String) -> GenerationError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GenerationError::Auth {
            provider: spec.provider_name.clone(),
            status: status.as_u16(),
            body,
        },
        StatusCode::NOT_FOUND => GenerationError::ModelNotFound {
            model: spec.model.clone(),
            body,
        },
        StatusCode::TOO_MANY_REQUESTS => GenerationError::RateLimit {
            provider: spec.provider_name.clone(),
            body,
        },
        _ => GenerationError::Provider {
            message: error_summary(&body).unwrap_or_else(|| format!("HTTP {}", status.as_u16())),
            body: Some(body),
        },
    }
}

/// `error.message`, then `error.code`, then a top-level `message`.
fn error_summary(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let error = value.get("error");

    let non_empty = |v: &Value| -> Option<String> {
        match v {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(_) if is_truthy(v) => Some(v.to_string()),
            _ => None,
        }
    };

    error
        .and_then(|e| e.get("message"))
        .and_then(non_empty)
        .or_else(|| error.and_then(|e| e.get("code")).and_then(non_empty))
        .or_else(|| value.get("message").and_then(non_empty))
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
