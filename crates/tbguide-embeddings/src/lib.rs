//! # TbGuide Embeddings
//!
//! Embedding clients for TbGuide. All OpenAI-compatible endpoints
//! (OpenAI, Ollama, custom servers) are handled by a single
//! `OpenAiCompatibleEmbedder`; providers differ only by endpoint URL,
//! auth style, and default model.

pub mod client;
pub mod registry;

use async_trait::async_trait;
use tbguide_core::config::TbGuideConfig;
use tbguide_core::error::{Result, TbGuideError};

pub use client::OpenAiCompatibleEmbedder;

/// Boundary that turns a text string into a normalized embedding vector.
#[async_trait]
pub trait Embedder: Send + Sync {
    fn name(&self) -> &str;

    /// Embed one text. The returned vector is L2-normalized.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}

/// Create an embedder from configuration.
pub fn create_embedder(config: &TbGuideConfig) -> Result<Box<dyn Embedder>> {
    let provider_name = config.embedding.provider.as_str();

    match provider_name {
        // Custom endpoint: "custom:https://my-server.com/v1"
        other if other.starts_with("custom:") => Ok(Box::new(
            OpenAiCompatibleEmbedder::custom(other, config),
        )),

        // All known providers
        _ => {
            let registry = registry::get_embedding_provider(provider_name).ok_or_else(|| {
                TbGuideError::Config(format!("Unknown embedding provider: {provider_name}"))
            })?;
            Ok(Box::new(OpenAiCompatibleEmbedder::from_registry(
                registry, config,
            )))
        }
    }
}

/// L2-normalize a vector in place and return it. An all-zero input (norm
/// undefined) is returned unchanged as the zero vector.
pub fn l2_normalize(mut v: Vec<f32>) -> Vec<f32> {
    let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in &mut v {
            *x /= norm;
        }
    }
    v
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_l2_normalize_unit_length() {
        let v = l2_normalize(vec![3.0, 4.0]);
        let norm: f32 = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-6);
        assert!((v[0] - 0.6).abs() < 1e-6);
        assert!((v[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_l2_normalize_zero_vector() {
        let v = l2_normalize(vec![0.0, 0.0, 0.0]);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_create_embedder_unknown_provider() {
        let mut config = TbGuideConfig::default();
        config.embedding.provider = "quantum".into();
        assert!(create_embedder(&config).is_err());
    }

    #[test]
    fn test_create_embedder_custom() {
        let mut config = TbGuideConfig::default();
        config.embedding.provider = "custom:https://embed.example.com/v1".into();
        let embedder = create_embedder(&config).unwrap();
        assert_eq!(embedder.name(), "custom");
    }
}
