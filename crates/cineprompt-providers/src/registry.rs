//! Provider registry — static descriptors for all 12 supported backends.
//!
//! Each `ProviderDescriptor` is display metadata plus a model catalog. How to
//! talk to the provider lives in [`crate::adapters`].

// ─────────────────────────────────────────────
// Descriptor types
// ─────────────────────────────────────────────

/// One selectable model of a provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelOption {
    /// Model id sent to the API.
    pub id: &'static str,
    /// Human-readable name.
    pub name: &'static str,
    /// Short tagline (e.g. `"Fast & Free"`).
    pub desc: &'static str,
}

/// Static description of one provider.
#[derive(Clone, Debug)]
pub struct ProviderDescriptor {
    /// Internal id (e.g. `"openrouter"`).
    pub id: &'static str,
    /// Human-readable name for logs and listings.
    pub name: &'static str,
    /// Where a user obtains an API key.
    pub api_key_url: &'static str,
    /// What a key looks like (e.g. `"sk-ant-..."`).
    pub api_key_hint: &'static str,
    /// Short label shown next to the name.
    pub badge: &'static str,
    /// Selectable models. Never empty; the first is the default.
    pub models: &'static [ModelOption],
}

impl ProviderDescriptor {
    /// The default model (first in the catalog).
    pub fn default_model(&self) -> &'static ModelOption {
        &self.models[0]
    }

    /// Find a model in this provider's catalog.
    pub fn find_model(&self, id: &str) -> Option<&'static ModelOption> {
        self.models.iter().find(|m| m.id == id)
    }

    /// Resolve a requested model id, falling back to the default model.
    ///
    /// Ids outside the catalog are passed through unchanged: providers add
    /// models faster than the catalog is updated.
    pub fn resolve_model(&self, requested: Option<&str>) -> String {
        match requested.map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => self.default_model().id.to_string(),
        }
    }
}

const fn model(id: &'static str, name: &'static str, desc: &'static str) -> ModelOption {
    ModelOption { id, name, desc }
}

// ─────────────────────────────────────────────
// All 12 providers (first entry is the default)
// ─────────────────────────────────────────────

/// Complete list of supported providers, in display order.
pub static PROVIDERS: &[ProviderDescriptor] = &[
    ProviderDescriptor {
        id: "gemini",
        name: "Google Gemini",
        api_key_url: "https://aistudio.google.com/apikey",
        api_key_hint: "AIzaSy...",
        badge: "Free Tier",
        models: &[
            model("gemini-2.5-flash-preview-05-20", "Gemini 2.5 Flash Preview", "Latest & Smartest"),
            model("gemini-2.5-pro-preview-06-05", "Gemini 2.5 Pro Preview", "Most Capable"),
            model("gemini-2.0-flash", "Gemini 2.0 Flash", "Fast & Free"),
            model("gemini-2.0-flash-lite", "Gemini 2.0 Flash Lite", "Ultra Fast"),
            model("gemini-1.5-flash", "Gemini 1.5 Flash", "Balanced"),
            model("gemini-1.5-flash-8b", "Gemini 1.5 Flash 8B", "Lightweight"),
            model("gemini-1.5-pro", "Gemini 1.5 Pro", "Powerful"),
        ],
    },
    ProviderDescriptor {
        id: "deepseek",
        name: "DeepSeek",
        api_key_url: "https://platform.deepseek.com/api_keys",
        api_key_hint: "sk-...",
        badge: "Very Affordable",
        models: &[
            model("deepseek-chat", "DeepSeek V3 (Chat)", "Best Value"),
            model("deepseek-reasoner", "DeepSeek R1 (Reasoner)", "Deep Reasoning"),
        ],
    },
    ProviderDescriptor {
        id: "anthropic",
        name: "Anthropic Claude",
        api_key_url: "https://console.anthropic.com/settings/keys",
        api_key_hint: "sk-ant-...",
        badge: "Premium Quality",
        models: &[
            model("claude-sonnet-4-20250514", "Claude Sonnet 4", "Latest & Best"),
            model("claude-opus-4-20250514", "Claude Opus 4", "Most Powerful"),
            model("claude-3-7-sonnet-20250219", "Claude 3.7 Sonnet", "Extended Thinking"),
            model("claude-3-5-sonnet-20241022", "Claude 3.5 Sonnet v2", "Fast & Smart"),
            model("claude-3-5-haiku-20241022", "Claude 3.5 Haiku", "Ultra Fast"),
            model("claude-3-opus-20240229", "Claude 3 Opus", "Previous Best"),
            model("claude-3-haiku-20240307", "Claude 3 Haiku", "Budget Fast"),
        ],
    },
    ProviderDescriptor {
        id: "openai",
        name: "OpenAI",
        api_key_url: "https://platform.openai.com/api-keys",
        api_key_hint: "sk-...",
        badge: "Premium",
        models: &[
            model("gpt-4.1", "GPT-4.1", "Latest Flagship"),
            model("gpt-4.1-mini", "GPT-4.1 Mini", "Fast & Smart"),
            model("gpt-4.1-nano", "GPT-4.1 Nano", "Ultra Fast"),
            model("gpt-4o", "GPT-4o", "Multimodal"),
            model("gpt-4o-mini", "GPT-4o Mini", "Budget Smart"),
            model("o4-mini", "O4 Mini", "Reasoning Latest"),
            model("o3", "O3", "Deep Reasoning"),
            model("o3-mini", "O3 Mini", "Fast Reasoning"),
            model("o1", "O1", "Advanced Reasoning"),
            model("o1-mini", "O1 Mini", "Light Reasoning"),
            model("gpt-4-turbo", "GPT-4 Turbo", "Previous Gen"),
            model("gpt-3.5-turbo", "GPT-3.5 Turbo", "Budget"),
        ],
    },
    ProviderDescriptor {
        id: "perplexity",
        name: "Perplexity AI",
        api_key_url: "https://www.perplexity.ai/settings/api",
        api_key_hint: "pplx-...",
        badge: "Search + AI",
        models: &[
            model("sonar-pro", "Sonar Pro", "Best Quality + Search"),
            model("sonar", "Sonar", "Fast + Search"),
            model("sonar-deep-research", "Sonar Deep Research", "Deep Analysis"),
            model("sonar-reasoning-pro", "Sonar Reasoning Pro", "Advanced Reasoning"),
            model("sonar-reasoning", "Sonar Reasoning", "Reasoning"),
            model("r1-1776", "R1-1776", "Offline Reasoning"),
        ],
    },
    ProviderDescriptor {
        id: "xai",
        name: "xAI Grok",
        api_key_url: "https://console.x.ai/",
        api_key_hint: "xai-...",
        badge: "Grok Models",
        models: &[
            model("grok-3", "Grok 3", "Most Powerful"),
            model("grok-3-fast", "Grok 3 Fast", "Speed Optimized"),
            model("grok-3-mini", "Grok 3 Mini", "Lightweight"),
            model("grok-3-mini-fast", "Grok 3 Mini Fast", "Ultra Fast"),
            model("grok-2", "Grok 2", "Previous Gen"),
        ],
    },
    ProviderDescriptor {
        id: "groq",
        name: "Groq",
        api_key_url: "https://console.groq.com/keys",
        api_key_hint: "gsk_...",
        badge: "Ultra Fast & Free",
        models: &[
            model("llama-3.3-70b-versatile", "Llama 3.3 70B", "Versatile"),
            model("llama-3.1-70b-versatile", "Llama 3.1 70B", "Previous Gen"),
            model("llama-3.1-8b-instant", "Llama 3.1 8B", "Instant"),
            model("llama3-70b-8192", "Llama 3 70B", "Classic"),
            model("llama3-8b-8192", "Llama 3 8B", "Light"),
            model("mixtral-8x7b-32768", "Mixtral 8x7B", "MoE"),
            model("gemma2-9b-it", "Gemma 2 9B", "Google"),
            model("qwen-qwq-32b", "Qwen QwQ 32B", "Reasoning"),
            model("deepseek-r1-distill-llama-70b", "DeepSeek R1 70B", "Reasoning"),
        ],
    },
    ProviderDescriptor {
        id: "mistral",
        name: "Mistral AI",
        api_key_url: "https://console.mistral.ai/api-keys/",
        api_key_hint: "sk-...",
        badge: "European AI",
        models: &[
            model("mistral-large-latest", "Mistral Large 2", "Most Capable"),
            model("mistral-medium-latest", "Mistral Medium", "Balanced"),
            model("mistral-small-latest", "Mistral Small 3.1", "Fast & Efficient"),
            model("codestral-latest", "Codestral", "Code Expert"),
            model("open-mistral-nemo", "Mistral Nemo", "Open 12B"),
            model("open-mixtral-8x22b", "Mixtral 8x22B", "Large MoE"),
            model("open-mixtral-8x7b", "Mixtral 8x7B", "Small MoE"),
            model("pixtral-large-latest", "Pixtral Large", "Vision Model"),
        ],
    },
    ProviderDescriptor {
        id: "together",
        name: "Together AI",
        api_key_url: "https://api.together.xyz/settings/api-keys",
        api_key_hint: "sk-...",
        badge: "Open Source Hub",
        models: &[
            model("meta-llama/Llama-3.3-70B-Instruct-Turbo", "Llama 3.3 70B Turbo", "Best Open"),
            model("meta-llama/Meta-Llama-3.1-405B-Instruct-Turbo", "Llama 3.1 405B Turbo", "Largest"),
            model("meta-llama/Meta-Llama-3.1-70B-Instruct-Turbo", "Llama 3.1 70B Turbo", "Fast"),
            model("meta-llama/Meta-Llama-3.1-8B-Instruct-Turbo", "Llama 3.1 8B Turbo", "Instant"),
            model("deepseek-ai/DeepSeek-R1", "DeepSeek R1", "Reasoning"),
            model("deepseek-ai/DeepSeek-V3", "DeepSeek V3", "Chat"),
            model("Qwen/Qwen2.5-72B-Instruct-Turbo", "Qwen 2.5 72B Turbo", "Alibaba"),
            model("mistralai/Mixtral-8x22B-Instruct-v0.1", "Mixtral 8x22B", "MoE"),
            model("google/gemma-2-27b-it", "Gemma 2 27B", "Google"),
        ],
    },
    ProviderDescriptor {
        id: "fireworks",
        name: "Fireworks AI",
        api_key_url: "https://fireworks.ai/api-keys",
        api_key_hint: "fw_...",
        badge: "Fast Inference",
        models: &[
            model("accounts/fireworks/models/llama-v3p3-70b-instruct", "Llama 3.3 70B", "Best Open"),
            model("accounts/fireworks/models/llama-v3p1-405b-instruct", "Llama 3.1 405B", "Largest"),
            model("accounts/fireworks/models/llama-v3p1-70b-instruct", "Llama 3.1 70B", "Balanced"),
            model("accounts/fireworks/models/llama-v3p1-8b-instruct", "Llama 3.1 8B", "Fast"),
            model("accounts/fireworks/models/deepseek-v3", "DeepSeek V3", "Chat"),
            model("accounts/fireworks/models/deepseek-r1", "DeepSeek R1", "Reasoning"),
            model("accounts/fireworks/models/qwen2p5-72b-instruct", "Qwen 2.5 72B", "Alibaba"),
            model("accounts/fireworks/models/mixtral-8x22b-instruct", "Mixtral 8x22B", "MoE"),
        ],
    },
    ProviderDescriptor {
        id: "cohere",
        name: "Cohere",
        api_key_url: "https://dashboard.cohere.com/api-keys",
        api_key_hint: "co-...",
        badge: "Enterprise AI",
        models: &[
            model("command-a-03-2025", "Command A", "Latest & Best"),
            model("command-r-plus-08-2024", "Command R+", "Most Capable"),
            model("command-r-08-2024", "Command R", "Balanced"),
            model("command-r7b-12-2024", "Command R7B", "Fast & Light"),
            model("command-light", "Command Light", "Budget"),
        ],
    },
    ProviderDescriptor {
        id: "openrouter",
        name: "OpenRouter",
        api_key_url: "https://openrouter.ai/keys",
        api_key_hint: "sk-or-...",
        badge: "All Models in One",
        models: &[
            // Free
            model("google/gemini-2.0-flash-exp:free", "Gemini 2.0 Flash (Free)", "Free"),
            model("google/gemini-2.5-flash-preview:free", "Gemini 2.5 Flash (Free)", "Free"),
            model("deepseek/deepseek-chat-v3-0324:free", "DeepSeek V3 (Free)", "Free"),
            model("deepseek/deepseek-r1:free", "DeepSeek R1 (Free)", "Free"),
            model("meta-llama/llama-3.3-70b-instruct:free", "Llama 3.3 70B (Free)", "Free"),
            model("qwen/qwen3-235b-a22b:free", "Qwen 3 235B (Free)", "Free"),
            model("mistralai/mistral-small-3.1-24b-instruct:free", "Mistral Small 3.1 (Free)", "Free"),
            // Paid
            model("anthropic/claude-sonnet-4", "Claude Sonnet 4", "Anthropic"),
            model("anthropic/claude-opus-4", "Claude Opus 4", "Anthropic"),
            model("anthropic/claude-3.7-sonnet", "Claude 3.7 Sonnet", "Anthropic"),
            model("anthropic/claude-3.5-sonnet", "Claude 3.5 Sonnet", "Anthropic"),
            model("anthropic/claude-3.5-haiku", "Claude 3.5 Haiku", "Anthropic"),
            model("openai/gpt-4.1", "GPT-4.1", "OpenAI"),
            model("openai/gpt-4o", "GPT-4o", "OpenAI"),
            model("openai/o3", "O3", "OpenAI"),
            model("openai/o4-mini", "O4 Mini", "OpenAI"),
            model("google/gemini-2.5-pro-preview", "Gemini 2.5 Pro", "Google"),
            model("x-ai/grok-3", "Grok 3", "xAI"),
            model("x-ai/grok-3-mini", "Grok 3 Mini", "xAI"),
            model("perplexity/sonar-pro", "Sonar Pro", "Perplexity"),
            model("perplexity/sonar", "Sonar", "Perplexity"),
        ],
    },
];

// ─────────────────────────────────────────────
// Lookup
// ─────────────────────────────────────────────

/// The descriptor used when an id is unknown (Google Gemini).
pub fn default_provider() -> &'static ProviderDescriptor {
    &PROVIDERS[0]
}

/// Find a provider descriptor by exact id.
pub fn find_by_id(id: &str) -> Option<&'static ProviderDescriptor> {
    PROVIDERS.iter().find(|p| p.id == id)
}

/// Look up a provider, falling back to the default descriptor. Never fails.
pub fn lookup(id: &str) -> &'static ProviderDescriptor {
    find_by_id(id).unwrap_or_else(default_provider)
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────
