//! Error taxonomy for the retrieval pipeline.
//!
//! Each variant maps to one failure class at the HTTP boundary:
//! `Validation` is the caller's fault (400), `UpstreamEmbedding` is the
//! embedding service's fault (502), everything else is ours (500).
//! `TableRender` is special: it is recovered per-chunk and never fails a
//! whole request.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TbGuideError {
    /// Request input is missing or malformed. Caller must fix it.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The external embedding call failed or returned a non-success status.
    /// Not retried; the upstream status travels with the message.
    #[error("Embedding service error (HTTP {status}): {message}")]
    UpstreamEmbedding { status: u16, message: String },

    /// Chunk or vector data could not be read or parsed.
    #[error("Corpus load error: {0}")]
    CorpusLoad(String),

    /// One table attachment could not be read or parsed.
    #[error("Table render error: {0}")]
    TableRender(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP error: {0}")]
    Http(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for TbGuideError {
    fn from(e: std::io::Error) -> Self {
        TbGuideError::CorpusLoad(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, TbGuideError>;
