//! In-memory corpus store with load-once semantics.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};

use tbguide_core::config::TbGuideConfig;
use tbguide_core::error::{Result, TbGuideError};
use tbguide_core::types::Chunk;
use tbguide_embeddings::l2_normalize;

/// Process-wide cache. Concurrent first loads may race; the first to
/// finish wins and every caller gets the same store.
static STORE: OnceLock<Arc<CorpusStore>> = OnceLock::new();

/// The full retrieval corpus: chunks and their normalized vectors,
/// positionally aligned. Read-only after construction.
#[derive(Debug)]
pub struct CorpusStore {
    chunks: Vec<Chunk>,
    embeddings: Vec<Vec<f32>>,
    dir: PathBuf,
}

/// Read-only counts over a loaded store.
#[derive(Debug, Clone)]
pub struct CorpusStats {
    pub total_chunks: usize,
    pub prose_chunks: usize,
    pub table_chunks: usize,
    pub chunks_by_doc: BTreeMap<String, usize>,
}

impl CorpusStore {
    /// Fetch the shared store, loading it on first access.
    pub fn shared(config: &TbGuideConfig) -> Result<Arc<CorpusStore>> {
        if let Some(store) = STORE.get() {
            return Ok(store.clone());
        }
        let store = Arc::new(Self::load_from_config(config)?);
        Ok(STORE.get_or_init(|| store).clone())
    }

    /// Load a store from the configured corpus directory.
    pub fn load_from_config(config: &TbGuideConfig) -> Result<Self> {
        let dir = PathBuf::from(shellexpand::tilde(&config.corpus.dir).to_string());
        Self::load(
            &dir,
            &config.corpus.chunks_file,
            &config.corpus.embeddings_file,
        )
    }

    /// Load chunks and vectors from line-delimited JSON files.
    ///
    /// Unparsable chunk lines are skipped with a warning. Unparsable
    /// vector lines become empty vectors so positional alignment with
    /// their neighbors survives. A count mismatch between the two files
    /// is a warning, not an error; the overlapping prefix is kept.
    pub fn load(dir: &Path, chunks_file: &str, embeddings_file: &str) -> Result<Self> {
        let chunks_path = dir.join(chunks_file);
        let embeddings_path = dir.join(embeddings_file);

        let chunk_text = std::fs::read_to_string(&chunks_path).map_err(|e| {
            TbGuideError::CorpusLoad(format!(
                "Failed to read {}: {e}",
                chunks_path.display()
            ))
        })?;
        let mut chunks = Vec::new();
        for (lineno, line) in chunk_text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Chunk>(line) {
                Ok(chunk) => chunks.push(chunk),
                Err(e) => {
                    tracing::warn!("Skipping bad chunk record at line {}: {e}", lineno + 1);
                }
            }
        }

        let vector_text = std::fs::read_to_string(&embeddings_path).map_err(|e| {
            TbGuideError::CorpusLoad(format!(
                "Failed to read {}: {e}",
                embeddings_path.display()
            ))
        })?;
        let mut embeddings = Vec::new();
        for (lineno, line) in vector_text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Vec<f32>>(line) {
                Ok(v) => embeddings.push(l2_normalize(v)),
                Err(e) => {
                    tracing::warn!("Bad vector record at line {}: {e}", lineno + 1);
                    embeddings.push(Vec::new());
                }
            }
        }

        if chunks.len() != embeddings.len() {
            tracing::warn!(
                "Corpus misalignment: {} chunks vs {} vectors, truncating to the shorter",
                chunks.len(),
                embeddings.len()
            );
            let n = chunks.len().min(embeddings.len());
            chunks.truncate(n);
            embeddings.truncate(n);
        }

        if chunks.is_empty() {
            return Err(TbGuideError::CorpusLoad(format!(
                "Corpus at {} is empty",
                dir.display()
            )));
        }

        tracing::info!(
            "Corpus loaded: {} chunks from {}",
            chunks.len(),
            dir.display()
        );
        Ok(Self {
            chunks,
            embeddings,
            dir: dir.to_path_buf(),
        })
    }

    /// Build a store from already-materialized records. Vectors are
    /// normalized here as well. Used by the one-shot CLI path and tests.
    pub fn from_parts(chunks: Vec<Chunk>, embeddings: Vec<Vec<f32>>, dir: PathBuf) -> Result<Self> {
        if chunks.is_empty() {
            return Err(TbGuideError::CorpusLoad("Corpus is empty".into()));
        }
        let embeddings = embeddings.into_iter().map(l2_normalize).collect();
        Ok(Self {
            chunks,
            embeddings,
            dir,
        })
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn embeddings(&self) -> &[Vec<f32>] {
        &self.embeddings
    }

    pub fn chunk(&self, index: usize) -> Option<&Chunk> {
        self.chunks.get(index)
    }

    pub fn embedding(&self, index: usize) -> Option<&[f32]> {
        self.embeddings.get(index).map(|v| v.as_slice())
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Corpus directory, used to resolve table attachment paths.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn stats(&self) -> CorpusStats {
        let mut chunks_by_doc: BTreeMap<String, usize> = BTreeMap::new();
        let mut table_chunks = 0;
        for chunk in &self.chunks {
            *chunks_by_doc.entry(chunk.doc_id.clone()).or_default() += 1;
            if chunk.is_table() {
                table_chunks += 1;
            }
        }
        CorpusStats {
            total_chunks: self.chunks.len(),
            prose_chunks: self.chunks.len() - table_chunks,
            table_chunks,
            chunks_by_doc,
        }
    }
}
