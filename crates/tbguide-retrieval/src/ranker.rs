//! Dual-channel ranking with cross-channel adjacency boosting.
//!
//! Prose and table chunks are scored separately: tables embed poorly
//! (sparse key/value text), so a table physically adjacent to a
//! top-scoring prose passage is pulled up to just under that passage's
//! score before the channels are merged.

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;
use tbguide_core::config::RetrievalConfig;
use tbguide_core::error::{Result, TbGuideError};
use tbguide_core::types::MAX_TOP_K;
use tbguide_corpus::CorpusStore;

use crate::scoring::cosine_similarity;

/// A (chunk index, similarity score) pair.
#[derive(Debug, Clone, Copy)]
pub struct RankedCandidate {
    pub index: usize,
    pub score: f32,
}

static SECTION_LABEL: OnceLock<Regex> = OnceLock::new();

fn section_label_re() -> &'static Regex {
    SECTION_LABEL.get_or_init(|| Regex::new(r"\d+(\.\d+)*").expect("static regex"))
}

/// Normalized fragments of a section breadcrumb used for adjacency
/// matching: the full path, each `|` segment, and every embedded dotted
/// numeric label ("2.5.2").
pub fn section_keys(section_path: &str) -> HashSet<String> {
    let mut keys = HashSet::new();
    let full = section_path.trim().to_lowercase();
    if !full.is_empty() {
        keys.insert(full);
    }
    for segment in section_path.split('|') {
        let segment = segment.trim().to_lowercase();
        if !segment.is_empty() {
            keys.insert(segment);
        }
    }
    for label in section_label_re().find_iter(section_path) {
        keys.insert(label.as_str().to_string());
    }
    keys
}

fn sort_descending(entries: &mut [RankedCandidate]) {
    entries.sort_by(|a, b| {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Rank the candidate set against the query vector and assemble the
/// deduplicated top-K.
pub fn rank(
    store: &CorpusStore,
    candidates: &[usize],
    query_vector: &[f32],
    top_k: usize,
    config: &RetrievalConfig,
) -> Result<Vec<RankedCandidate>> {
    if store.is_empty() {
        return Err(TbGuideError::CorpusLoad(
            "Cannot rank over an empty corpus".into(),
        ));
    }

    // 1. Partition into prose and table channels, scoring as we go.
    let mut prose: Vec<RankedCandidate> = Vec::new();
    let mut tables: Vec<RankedCandidate> = Vec::new();
    for &index in candidates {
        let Some(embedding) = store.embedding(index) else {
            continue;
        };
        let entry = RankedCandidate {
            index,
            score: cosine_similarity(query_vector, embedding),
        };
        if store.chunks()[index].is_table() {
            tables.push(entry);
        } else {
            prose.push(entry);
        }
    }
    sort_descending(&mut prose);
    sort_descending(&mut tables);

    // 2. Boost tables that sit next to a top prose anchor.
    if let Some(best_prose) = prose.first().map(|c| c.score) {
        let anchors: Vec<(&str, HashSet<String>)> = prose
            .iter()
            .take(config.anchor_count)
            .map(|c| {
                let chunk = &store.chunks()[c.index];
                (chunk.doc_id.as_str(), section_keys(&chunk.section_path))
            })
            .collect();
        let floor = config.adjacency_boost * best_prose;

        for entry in &mut tables {
            let chunk = &store.chunks()[entry.index];
            let keys = section_keys(&chunk.section_path);
            let adjacent = anchors
                .iter()
                .any(|(doc_id, anchor_keys)| {
                    *doc_id == chunk.doc_id && !anchor_keys.is_disjoint(&keys)
                });
            if adjacent && entry.score < floor {
                entry.score = floor;
            }
        }
        sort_descending(&mut tables);
    }

    // 3. Bound each channel so neither can flood the merge.
    prose.truncate(config.prose_channel_limit);
    tables.truncate(config.table_channel_limit);

    // 4. Merge, dedupe by chunk_id (first occurrence is the higher score
    //    because of the sort), truncate.
    let mut merged = prose;
    merged.extend(tables);
    sort_descending(&mut merged);

    let mut seen: HashSet<&str> = HashSet::new();
    let mut deduped = Vec::with_capacity(merged.len());
    for entry in merged {
        if seen.insert(store.chunks()[entry.index].chunk_id.as_str()) {
            deduped.push(entry);
        }
    }

    let top_k = top_k.clamp(1, MAX_TOP_K).min(store.len());
    deduped.truncate(top_k);
    Ok(deduped)
}
