//! Adapter registry: provider id → adapter, and the `RequestSpec` builder.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use tracing::debug;

use cineprompt_core::error::GenerationError;

use crate::adapters::{builtin_adapter, BUILTIN_ADAPTERS};
use crate::registry;
use crate::traits::{Credentials, ProviderAdapter, RequestSpec};

static DEFAULT_REGISTRY: LazyLock<AdapterRegistry> = LazyLock::new(AdapterRegistry::with_defaults);

/// Map from provider id to the adapter that speaks its protocol.
///
/// Adding a provider is one `register` call; nothing else branches on ids.
#[derive(Clone, Debug, Default)]
pub struct AdapterRegistry {
    adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl AdapterRegistry {
    /// A registry with no adapters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every built-in provider at its public base URL.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for (id, factory) in BUILTIN_ADAPTERS {
            registry.register(*id, factory(None));
        }
        registry
    }

    /// Add or replace the adapter for `provider_id`.
    pub fn register(
        &mut self,
        provider_id: impl Into<String>,
        adapter: Arc<dyn ProviderAdapter>,
    ) -> Option<Arc<dyn ProviderAdapter>> {
        self.adapters.insert(provider_id.into(), adapter)
    }

    /// Re-point a built-in provider at another base URL (a proxy, a local
    /// gateway, or a test server).
    pub fn with_api_base(mut self, provider_id: &str, base_url: &str) -> Result<Self, GenerationError> {
        let adapter = builtin_adapter(provider_id, Some(base_url))
            .ok_or_else(|| GenerationError::UnknownProvider(provider_id.to_string()))?;
        debug!(provider = %provider_id, base = %base_url, "Overriding provider base URL");
        self.register(provider_id, adapter);
        Ok(self)
    }

    pub fn get(&self, provider_id: &str) -> Option<&Arc<dyn ProviderAdapter>> {
        self.adapters.get(provider_id)
    }

    /// Build the request spec for `(provider_id, api_key, model)`.
    ///
    /// The key is trimmed. Pure: no I/O and no shared state.
    pub fn build_request_spec(
        &self,
        provider_id: &str,
        api_key: &str,
        model: &str,
    ) -> Result<RequestSpec, GenerationError> {
        let provider_name = registry::find_by_id(provider_id)
            .map(|p| p.name.to_string())
            .unwrap_or_else(|| provider_id.to_string());

        let api_key = api_key.trim();
        if api_key.is_empty() {
            return Err(GenerationError::MissingApiKey(provider_name));
        }

        let adapter = self
            .get(provider_id)
            .cloned()
            .ok_or_else(|| GenerationError::UnknownProvider(provider_id.to_string()))?;

        let credentials = Credentials {
            api_key: api_key.to_string(),
            model: model.to_string(),
        };
        RequestSpec::new(provider_id, provider_name, adapter, &credentials)
    }
}

/// [`AdapterRegistry::build_request_spec`] against the built-in providers.
pub fn build_request_spec(
    provider_id: &str,
    api_key: &str,
    model: &str,
) -> Result<RequestSpec, GenerationError> {
    DEFAULT_REGISTRY.build_request_spec(provider_id, api_key, model)
}
