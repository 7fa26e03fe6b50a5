//! # TbGuide Corpus
//!
//! Read-only corpus storage: guideline chunks, their embedding vectors,
//! and the raw CSV tables behind tabular chunks.
//!
//! ## Design
//! - **Line-delimited files**: one JSON chunk per line, one JSON vector
//!   per line, positionally aligned
//! - **Load once**: the store is built at startup and never mutated;
//!   a process-wide cache guards the one-time load
//! - **Vectors normalized at load**: ranking is then a plain dot product
//! - **Attachments on demand**: table CSVs are read at render time, per
//!   result chunk

pub mod attachments;
pub mod store;

pub use attachments::load_table_rows;
pub use store::{CorpusStats, CorpusStore};
