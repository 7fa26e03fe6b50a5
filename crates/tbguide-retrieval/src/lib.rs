//! # TbGuide Retrieval
//!
//! The ranking engine: classifies a free-text clinical question into a
//! topical scope and document hint, narrows the corpus by those filters
//! (never to zero), and runs dual-channel similarity ranking over prose
//! and table chunks with cross-channel adjacency boosting.

pub mod classifier;
pub mod ranker;
pub mod scoring;
pub mod selector;

use tbguide_core::config::RetrievalConfig;
use tbguide_core::error::Result;
use tbguide_corpus::CorpusStore;

pub use ranker::RankedCandidate;

/// What one retrieval run resolved to: the filters actually applied and
/// the ranked candidate list.
#[derive(Debug, Clone)]
pub struct RetrievalOutcome {
    pub scope: Option<String>,
    pub document_hint: Option<String>,
    pub ranked: Vec<RankedCandidate>,
}

/// Run the full retrieval pipeline for one query.
///
/// Explicit `scope`/`document_hint` values win; inference only fills the
/// gaps the caller left open.
pub fn retrieve(
    store: &CorpusStore,
    query_vector: &[f32],
    question: &str,
    scope: Option<String>,
    document_hint: Option<String>,
    top_k: usize,
    config: &RetrievalConfig,
) -> Result<RetrievalOutcome> {
    let scope = scope
        .filter(|s| !s.trim().is_empty())
        .or_else(|| classifier::infer_scope(question).map(|s| s.as_str().to_string()));
    let document_hint = document_hint
        .filter(|h| !h.trim().is_empty())
        .or_else(|| classifier::infer_document_hint(question).map(String::from));

    let candidates =
        selector::select_candidates(store.chunks(), scope.as_deref(), document_hint.as_deref());
    let ranked = ranker::rank(store, &candidates, query_vector, top_k, config)?;

    tracing::debug!(
        "Retrieved {} of {} candidates (scope={:?}, hint={:?})",
        ranked.len(),
        candidates.len(),
        scope,
        document_hint
    );

    Ok(RetrievalOutcome {
        scope,
        document_hint,
        ranked,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use tbguide_core::types::Chunk;

    fn chunk(doc_id: &str, chunk_id: &str, section_path: &str, text: &str) -> Chunk {
        Chunk {
            doc_id: doc_id.into(),
            chunk_id: chunk_id.into(),
            section_path: section_path.into(),
            content_type: None,
            text: text.into(),
            caption: None,
            attachment_id: None,
            attachment_path: None,
            guideline_title: None,
            year: None,
            scope: None,
        }
    }

    fn sample_store() -> CorpusStore {
        let chunks = vec![
            chunk(
                "module4_treatment",
                "m4_mon",
                "4.6 | Monitoring during treatment",
                "Monthly ECG and liver function monitoring is recommended.",
            ),
            chunk("module3_diagnosis", "m3_c1", "3.1 | Xpert testing", "Run Xpert first."),
            chunk("module2_screening", "m2_c1", "2.2 | Community screening", "Screen contacts."),
        ];
        let embeddings = vec![
            vec![1.0, 0.0, 0.0],
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 1.0],
        ];
        CorpusStore::from_parts(chunks, embeddings, PathBuf::from(".")).unwrap()
    }

    #[test]
    fn test_monitoring_question_end_to_end() {
        let store = sample_store();
        let config = RetrievalConfig::default();
        let query = vec![0.9, 0.3, 0.1];
        let outcome = retrieve(
            &store,
            &query,
            "What are the recommended monitoring steps for a patient on bedaquiline?",
            None,
            None,
            8,
            &config,
        )
        .unwrap();

        assert_eq!(outcome.scope.as_deref(), Some("drug-safety"));
        assert_eq!(outcome.document_hint, None);
        let top = &outcome.ranked[0];
        assert_eq!(store.chunks()[top.index].chunk_id, "m4_mon");
    }

    #[test]
    fn test_explicit_scope_wins_over_inference() {
        let store = sample_store();
        let config = RetrievalConfig::default();
        let query = vec![0.9, 0.3, 0.1];
        let outcome = retrieve(
            &store,
            &query,
            "What are the recommended monitoring steps for a patient on bedaquiline?",
            Some("diagnosis".into()),
            None,
            8,
            &config,
        )
        .unwrap();

        assert_eq!(outcome.scope.as_deref(), Some("diagnosis"));
        // Diagnosis heuristics keep only the module3 chunk.
        assert_eq!(outcome.ranked.len(), 1);
        assert_eq!(store.chunks()[outcome.ranked[0].index].chunk_id, "m3_c1");
    }

    #[test]
    fn test_blank_explicit_values_fall_back_to_inference() {
        let store = sample_store();
        let config = RetrievalConfig::default();
        let outcome = retrieve(
            &store,
            &[1.0, 0.0, 0.0],
            "Show the module 3 diagnostic algorithm for Xpert and smear",
            Some("  ".into()),
            None,
            8,
            &config,
        )
        .unwrap();

        assert_eq!(outcome.scope.as_deref(), Some("diagnosis"));
        assert_eq!(outcome.document_hint.as_deref(), Some("module3_diagnosis"));
    }
}
