//! Embedding provider registry: maps provider names to endpoint
//! configurations.
//!
//! Providers are static config entries; the unified
//! `OpenAiCompatibleEmbedder` uses them to connect to any endpoint.

/// How to attach auth credentials to requests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AuthStyle {
    /// `Authorization: Bearer <key>`
    Bearer,
    /// No authentication required (local servers).
    None,
}

/// Configuration for a single embedding provider.
#[derive(Debug, Clone)]
pub struct EmbeddingProviderConfig {
    /// Provider identifier.
    pub name: &'static str,
    /// Base URL for the API.
    pub base_url: &'static str,
    /// Path for the embeddings endpoint (appended to base_url).
    pub embeddings_path: &'static str,
    /// Environment variable names to try for the API key (in order).
    pub env_keys: &'static [&'static str],
    /// How to send auth credentials.
    pub auth_style: AuthStyle,
    /// Environment variable to override the base URL (e.g., OLLAMA_HOST).
    pub base_url_env: Option<&'static str>,
    /// Model used when the config does not name one.
    pub default_model: &'static str,
}

static PROVIDERS: &[EmbeddingProviderConfig] = &[
    EmbeddingProviderConfig {
        name: "openai",
        base_url: "https://api.openai.com/v1",
        embeddings_path: "/embeddings",
        env_keys: &["OPENAI_API_KEY"],
        auth_style: AuthStyle::Bearer,
        base_url_env: None,
        default_model: "text-embedding-3-small",
    },
    EmbeddingProviderConfig {
        name: "ollama",
        base_url: "http://localhost:11434/v1",
        embeddings_path: "/embeddings",
        env_keys: &[],
        auth_style: AuthStyle::None,
        base_url_env: Some("OLLAMA_HOST"),
        default_model: "nomic-embed-text",
    },
];

/// Look up a provider config by name.
pub fn get_embedding_provider(name: &str) -> Option<&'static EmbeddingProviderConfig> {
    PROVIDERS.iter().find(|p| p.name == name)
}

/// List all registered provider names.
pub fn all_provider_names() -> Vec<&'static str> {
    PROVIDERS.iter().map(|p| p.name).collect()
}
