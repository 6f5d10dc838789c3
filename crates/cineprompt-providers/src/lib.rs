//! LLM provider layer for CinePrompt.
//!
//! # Architecture
//!
//! - [`registry`] — static catalog of the 12 supported providers and their models
//! - [`traits::ProviderAdapter`] — trait each API family implements
//! - [`adapters`] — Gemini, Anthropic, Cohere and the OpenAI-compatible family
//! - [`builder::AdapterRegistry`] — provider id → adapter, builds [`RequestSpec`]s
//! - [`http_provider::ProviderClient`] — connectivity probe and shot-list generation

pub mod adapters;
pub mod builder;
pub mod http_provider;
pub mod registry;
pub mod traits;

// Re-export main types for convenience
pub use builder::{build_request_spec, AdapterRegistry};
pub use http_provider::{ProbeOutcome, ProviderClient};
pub use registry::{ModelOption, ProviderDescriptor, PROVIDERS};
pub use traits::{Credentials, ProviderAdapter, RequestSpec};
