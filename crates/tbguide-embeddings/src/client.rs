//! Unified OpenAI-compatible embedding client.
//!
//! One struct handles the `/embeddings` call for every supported
//! provider. Providers are distinguished only by endpoint URL, auth
//! style, and model name.

use async_trait::async_trait;
use serde_json::{Value, json};
use tbguide_core::config::TbGuideConfig;
use tbguide_core::error::{Result, TbGuideError};

use crate::registry::{AuthStyle, EmbeddingProviderConfig};
use crate::{Embedder, l2_normalize};

/// An embedding client for any OpenAI-compatible API.
pub struct OpenAiCompatibleEmbedder {
    name: String,
    api_key: String,
    base_url: String,
    embeddings_path: String,
    model: String,
    auth_style: AuthStyle,
    client: reqwest::Client,
}

impl OpenAiCompatibleEmbedder {
    /// Create from a known provider config + TbGuideConfig.
    ///
    /// Resolution order:
    /// - API key: `config.embedding.api_key` > env vars > empty
    /// - Base URL: `config.embedding.endpoint` > env override > registry default
    /// - Model: `config.embedding.model` > registry default
    pub fn from_registry(registry: &EmbeddingProviderConfig, config: &TbGuideConfig) -> Self {
        let api_key = if !config.embedding.api_key.is_empty() {
            config.embedding.api_key.clone()
        } else {
            registry
                .env_keys
                .iter()
                .find_map(|key| std::env::var(key).ok())
                .unwrap_or_default()
        };

        let base_url = if !config.embedding.endpoint.is_empty() {
            config.embedding.endpoint.clone()
        } else {
            registry
                .base_url_env
                .and_then(|env_key| {
                    let val = std::env::var(env_key).ok()?;
                    // For OLLAMA_HOST, append /v1 if not present
                    if val.ends_with("/v1") {
                        Some(val)
                    } else {
                        Some(format!("{}/v1", val.trim_end_matches('/')))
                    }
                })
                .unwrap_or_else(|| registry.base_url.to_string())
        };

        let model = if !config.embedding.model.is_empty() {
            config.embedding.model.clone()
        } else {
            registry.default_model.to_string()
        };

        Self {
            name: registry.name.to_string(),
            api_key,
            base_url,
            embeddings_path: registry.embeddings_path.to_string(),
            model,
            auth_style: registry.auth_style,
            client: reqwest::Client::new(),
        }
    }

    /// Create for a custom endpoint (e.g., "custom:https://my-server.com/v1").
    pub fn custom(endpoint: &str, config: &TbGuideConfig) -> Self {
        let base_url = endpoint
            .strip_prefix("custom:")
            .unwrap_or(endpoint)
            .trim_end_matches('/')
            .to_string();

        let api_key = if !config.embedding.api_key.is_empty() {
            config.embedding.api_key.clone()
        } else {
            std::env::var("CUSTOM_API_KEY").unwrap_or_default()
        };

        let auth_style = if api_key.is_empty() {
            AuthStyle::None
        } else {
            AuthStyle::Bearer
        };

        Self {
            name: "custom".to_string(),
            api_key,
            base_url,
            embeddings_path: "/embeddings".to_string(),
            model: config.embedding.model.clone(),
            auth_style,
            client: reqwest::Client::new(),
        }
    }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.auth_style {
            AuthStyle::Bearer if !self.api_key.is_empty() => {
                req.header("Authorization", format!("Bearer {}", self.api_key))
            }
            _ => req,
        }
    }
}

/// Pull the first embedding vector out of an OpenAI-format response body.
pub(crate) fn parse_embedding(json: &Value) -> Result<Vec<f32>> {
    let data = json["data"]
        .get(0)
        .ok_or_else(|| TbGuideError::Internal("No data in embedding response".into()))?;
    let values = data["embedding"]
        .as_array()
        .ok_or_else(|| TbGuideError::Internal("No embedding array in response".into()))?;
    Ok(values
        .iter()
        .filter_map(|v| v.as_f64())
        .map(|v| v as f32)
        .collect())
}

#[async_trait]
impl Embedder for OpenAiCompatibleEmbedder {
    fn name(&self) -> &str {
        &self.name
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        if self.auth_style != AuthStyle::None && self.api_key.is_empty() {
            return Err(TbGuideError::Config(format!(
                "No API key configured for embedding provider '{}'",
                self.name
            )));
        }

        let body = json!({
            "model": self.model,
            "input": [text],
        });

        let url = format!("{}{}", self.base_url, self.embeddings_path);
        let req = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .json(&body);
        let req = self.apply_auth(req);

        let resp = req.send().await.map_err(|e| {
            TbGuideError::Http(format!("{} connection failed ({}): {}", self.name, url, e))
        })?;

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            return Err(TbGuideError::UpstreamEmbedding { status, message });
        }

        let json: Value = resp
            .json()
            .await
            .map_err(|e| TbGuideError::Http(e.to_string()))?;

        let vector = parse_embedding(&json)?;
        tracing::debug!(
            "Embedded {} chars via {} ({} dims)",
            text.len(),
            self.name,
            vector.len()
        );
        Ok(l2_normalize(vector))
    }
}
