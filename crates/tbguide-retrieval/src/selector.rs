//! Candidate narrowing by scope and document hint.
//!
//! Both filters are best-effort: a filter that would leave zero
//! candidates is discarded and the wider set survives, so an aggressive
//! heuristic can never empty the result set on its own.

use tbguide_core::types::{Chunk, Scope};

/// Substring heuristics applied to `doc_id` and `section_path` when a
/// chunk carries no explicit scope tag.
fn scope_patterns(scope: Scope) -> &'static [&'static str] {
    match scope {
        Scope::Prevention => &["prevent", "tpt", "prophyla"],
        Scope::Screening => &["screen", "triage"],
        Scope::Diagnosis => &["diag", "diagnos", "xpert", "cxr"],
        Scope::Treatment => &["treat", "regimen", "drug-resistant"],
        Scope::Pediatrics => &["child", "paediatric", "pediatric", "adolescent"],
        Scope::Comorbidities => &["comorbid", "hiv", "diabetes", "nutrition"],
        Scope::DrugSafety => &["safety", "adverse", "monitor", "pharmacovigilance"],
        Scope::Programmatic => &["programmatic", "operational", "handbook", "indicator"],
    }
}

fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase().replace('_', "-")
}

fn chunk_matches_scope(chunk: &Chunk, scope: Scope, requested: &str) -> bool {
    // An explicit tag on the chunk takes precedence over heuristics.
    if let Some(tag) = chunk.scope.as_deref() {
        if !tag.trim().is_empty() {
            return normalize_tag(tag) == normalize_tag(requested)
                || normalize_tag(tag) == scope.as_str();
        }
    }
    let haystack = format!("{} {}", chunk.doc_id, chunk.section_path).to_lowercase();
    scope_patterns(scope).iter().any(|p| haystack.contains(p))
}

/// Normalized token variants of a document hint, matched as substrings.
fn hint_variants(hint: &str) -> Vec<String> {
    let raw = hint.trim().to_lowercase();
    let stripped: String = raw.chars().filter(|c| !c.is_whitespace()).collect();
    let underscored = raw.split_whitespace().collect::<Vec<_>>().join("_");
    let alnum: String = raw.chars().filter(|c| c.is_alphanumeric()).collect();

    let mut variants = vec![raw, stripped, underscored, alnum];
    variants.retain(|v| !v.is_empty());
    variants.dedup();
    variants
}

fn chunk_matches_hint(chunk: &Chunk, variants: &[String]) -> bool {
    let fields = [
        Some(chunk.doc_id.as_str()),
        Some(chunk.section_path.as_str()),
        chunk.guideline_title.as_deref(),
        chunk.scope.as_deref(),
    ];
    fields.iter().flatten().any(|field| {
        let field = field.to_lowercase();
        variants.iter().any(|v| field.contains(v.as_str()))
    })
}

/// Narrow the candidate index set by scope and hint.
///
/// An unrecognized scope string matches everything: returning too much
/// is recoverable by ranking, returning nothing is not.
pub fn select_candidates(
    chunks: &[Chunk],
    scope: Option<&str>,
    document_hint: Option<&str>,
) -> Vec<usize> {
    let mut candidates: Vec<usize> = (0..chunks.len()).collect();

    if let Some(requested) = scope {
        if let Some(known) = Scope::parse(requested) {
            let narrowed: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&i| chunk_matches_scope(&chunks[i], known, requested))
                .collect();
            if narrowed.is_empty() {
                tracing::debug!("Scope filter '{requested}' matched nothing, keeping wider set");
            } else {
                candidates = narrowed;
            }
        }
    }

    if let Some(hint) = document_hint {
        let variants = hint_variants(hint);
        if !variants.is_empty() {
            let narrowed: Vec<usize> = candidates
                .iter()
                .copied()
                .filter(|&i| chunk_matches_hint(&chunks[i], &variants))
                .collect();
            if narrowed.is_empty() {
                tracing::debug!("Hint filter '{hint}' matched nothing, keeping wider set");
            } else {
                candidates = narrowed;
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(doc_id: &str, section_path: &str, scope: Option<&str>) -> Chunk {
        Chunk {
            doc_id: doc_id.into(),
            chunk_id: format!("{doc_id}_{section_path}"),
            section_path: section_path.into(),
            content_type: None,
            text: String::new(),
            caption: None,
            attachment_id: None,
            attachment_path: None,
            guideline_title: Some("WHO consolidated guidelines".into()),
            year: Some(2022),
            scope: scope.map(String::from),
        }
    }

    fn sample_chunks() -> Vec<Chunk> {
        vec![
            chunk("module3_diagnosis", "3.1 | Xpert MTB/RIF", None),
            chunk("module4_treatment", "4.2 | BPaLM regimen", None),
            chunk("module5_children", "5.1 | Dosing in children", Some("pediatrics")),
            chunk("operational_handbook", "2 | Recording and reporting", None),
        ]
    }

    #[test]
    fn test_scope_filter_by_heuristics() {
        let chunks = sample_chunks();
        let selected = select_candidates(&chunks, Some("diagnosis"), None);
        assert_eq!(selected, vec![0]);
    }

    #[test]
    fn test_scope_filter_by_explicit_tag() {
        let chunks = sample_chunks();
        let selected = select_candidates(&chunks, Some("pediatrics"), None);
        assert_eq!(selected, vec![2]);
    }

    #[test]
    fn test_explicit_tag_tolerates_case_and_underscore() {
        let mut chunks = sample_chunks();
        chunks[2].scope = Some("Drug_Safety".into());
        let selected = select_candidates(&chunks, Some("drug-safety"), None);
        assert_eq!(selected, vec![2]);
    }

    #[test]
    fn test_unknown_scope_matches_everything() {
        let chunks = sample_chunks();
        let selected = select_candidates(&chunks, Some("cardiology"), None);
        assert_eq!(selected.len(), chunks.len());
    }

    #[test]
    fn test_scope_filter_to_zero_falls_back() {
        // No chunk is prevention-flavored: the filter must be discarded.
        let chunks = sample_chunks();
        let selected = select_candidates(&chunks, Some("prevention"), None);
        assert_eq!(selected.len(), chunks.len());
    }

    #[test]
    fn test_hint_filter() {
        let chunks = sample_chunks();
        let selected = select_candidates(&chunks, None, Some("module4_treatment"));
        assert_eq!(selected, vec![1]);
    }

    #[test]
    fn test_hint_variants_bridge_spacing() {
        let chunks = sample_chunks();
        // "operational handbook" underscores to the doc_id form.
        let selected = select_candidates(&chunks, None, Some("operational handbook"));
        assert_eq!(selected, vec![3]);
    }

    #[test]
    fn test_hint_filter_to_zero_falls_back() {
        let chunks = sample_chunks();
        let selected = select_candidates(&chunks, None, Some("annex9"));
        assert_eq!(selected.len(), chunks.len());
    }

    #[test]
    fn test_scope_and_hint_compose() {
        let chunks = sample_chunks();
        let selected = select_candidates(&chunks, Some("treatment"), Some("module4"));
        assert_eq!(selected, vec![1]);
    }
}
