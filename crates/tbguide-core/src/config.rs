//! TbGuide configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::Result;

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TbGuideConfig {
    #[serde(default)]
    pub embedding: EmbeddingConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
}

impl Default for TbGuideConfig {
    fn default() -> Self {
        Self {
            embedding: EmbeddingConfig::default(),
            corpus: CorpusConfig::default(),
            gateway: GatewayConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl TbGuideConfig {
    /// Load config from the default path (~/.tbguide/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::TbGuideError::Config(format!("Failed to read config: {e}"))
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| {
            crate::error::TbGuideError::Config(format!("Failed to parse config: {e}"))
        })?;
        Ok(config)
    }

    /// Save config to the default path.
    pub fn save(&self) -> Result<()> {
        let path = Self::default_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| crate::error::TbGuideError::Config(e.to_string()))?;
        }
        let content = toml::to_string_pretty(self).map_err(|e| {
            crate::error::TbGuideError::Config(format!("Failed to serialize config: {e}"))
        })?;
        std::fs::write(&path, content)
            .map_err(|e| crate::error::TbGuideError::Config(e.to_string()))?;
        Ok(())
    }

    /// Get the default config path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// Get the TbGuide home directory.
    pub fn home_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".tbguide")
    }
}

/// Embedding service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider name ("openai", "ollama") or "custom:<base_url>".
    #[serde(default = "default_embedding_provider")]
    pub provider: String,
    /// Model identifier; empty means the provider registry default.
    #[serde(default)]
    pub model: String,
    /// API key; empty means resolve from the provider's env vars.
    #[serde(default)]
    pub api_key: String,
    /// Endpoint override; empty means the provider registry default.
    #[serde(default)]
    pub endpoint: String,
}

fn default_embedding_provider() -> String { "openai".into() }

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: default_embedding_provider(),
            model: String::new(),
            api_key: String::new(),
            endpoint: String::new(),
        }
    }
}

/// Corpus location configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorpusConfig {
    /// Directory holding chunk/vector files and table attachments.
    #[serde(default = "default_corpus_dir")]
    pub dir: String,
    #[serde(default = "default_chunks_file")]
    pub chunks_file: String,
    #[serde(default = "default_embeddings_file")]
    pub embeddings_file: String,
}

fn default_corpus_dir() -> String { "~/.tbguide/corpus".into() }
fn default_chunks_file() -> String { "chunks.jsonl".into() }
fn default_embeddings_file() -> String { "embeddings.jsonl".into() }

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            dir: default_corpus_dir(),
            chunks_file: default_chunks_file(),
            embeddings_file: default_embeddings_file(),
        }
    }
}

/// Gateway (HTTP server) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String { "127.0.0.1".into() }
fn default_port() -> u16 { 7878 }

impl Default for GatewayConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

/// Ranking knobs. The defaults encode the shipped behavior; they exist as
/// config so a deployment can widen the channels without a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    #[serde(default = "default_top_k")]
    pub default_top_k: usize,
    /// Max prose entries surviving into the merge.
    #[serde(default = "default_prose_limit")]
    pub prose_channel_limit: usize,
    /// Max table entries surviving into the merge.
    #[serde(default = "default_table_limit")]
    pub table_channel_limit: usize,
    /// How many top prose results act as adjacency anchors.
    #[serde(default = "default_anchor_count")]
    pub anchor_count: usize,
    /// A section-adjacent table scores at least this fraction of the best
    /// prose score.
    #[serde(default = "default_adjacency_boost")]
    pub adjacency_boost: f32,
}

fn default_top_k() -> usize { 8 }
fn default_prose_limit() -> usize { 10 }
fn default_table_limit() -> usize { 5 }
fn default_anchor_count() -> usize { 10 }
fn default_adjacency_boost() -> f32 { 0.98 }

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_top_k: default_top_k(),
            prose_channel_limit: default_prose_limit(),
            table_channel_limit: default_table_limit(),
            anchor_count: default_anchor_count(),
            adjacency_boost: default_adjacency_boost(),
        }
    }
}
