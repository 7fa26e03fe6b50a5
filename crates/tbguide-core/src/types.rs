//! Domain types shared across the retrieval pipeline.

use serde::{Deserialize, Serialize};

/// Hard ceiling on results per request.
pub const MAX_TOP_K: usize = 8;

/// One retrievable unit of guideline content: a prose passage or a table.
///
/// Deserialized from one JSON object per line of the corpus chunk file.
/// Immutable once loaded; `chunk_id` is the deduplication key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Chunk {
    pub doc_id: String,
    pub chunk_id: String,
    /// Hierarchical breadcrumb, possibly `|`-delimited, possibly carrying
    /// dotted numeric section labels like "2.5.2".
    #[serde(default)]
    pub section_path: String,
    /// `"table"` for tabular chunks; anything else is treated as prose.
    #[serde(default)]
    pub content_type: Option<String>,
    /// Prose excerpt; empty for pure tables.
    #[serde(default)]
    pub text: String,
    /// Table title, when the source carried one.
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub attachment_id: Option<String>,
    /// Locator for the raw table data, relative to the corpus directory.
    #[serde(default)]
    pub attachment_path: Option<String>,
    #[serde(default)]
    pub guideline_title: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    /// Explicit topical tag; most chunks rely on heuristics instead.
    #[serde(default)]
    pub scope: Option<String>,
}

impl Chunk {
    pub fn is_table(&self) -> bool {
        self.content_type.as_deref() == Some("table")
    }
}

/// Closed set of topical scopes recognized by the heuristics.
///
/// The wire format tolerates any string; only these values narrow the
/// candidate set. An unrecognized scope string matches everything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Scope {
    Prevention,
    Screening,
    Diagnosis,
    Treatment,
    Pediatrics,
    Comorbidities,
    DrugSafety,
    Programmatic,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Prevention => "prevention",
            Scope::Screening => "screening",
            Scope::Diagnosis => "diagnosis",
            Scope::Treatment => "treatment",
            Scope::Pediatrics => "pediatrics",
            Scope::Comorbidities => "comorbidities",
            Scope::DrugSafety => "drug-safety",
            Scope::Programmatic => "programmatic",
        }
    }

    pub fn parse(s: &str) -> Option<Scope> {
        match s.trim().to_lowercase().as_str() {
            "prevention" => Some(Scope::Prevention),
            "screening" => Some(Scope::Screening),
            "diagnosis" => Some(Scope::Diagnosis),
            "treatment" => Some(Scope::Treatment),
            "pediatrics" => Some(Scope::Pediatrics),
            "comorbidities" => Some(Scope::Comorbidities),
            "drug-safety" | "drug_safety" => Some(Scope::DrugSafety),
            "programmatic" => Some(Scope::Programmatic),
            _ => None,
        }
    }
}

/// One raw row of a table attachment: generic positional column names
/// ("ColumnA", "ColumnB", ...) mapped to string cells, in source column
/// order, plus the original row marker.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTableRow {
    /// Original row marker from the attachment; "1" designates the header row.
    pub row_index: String,
    /// (generic column name, cell value) pairs in source column order.
    pub cells: Vec<(String, String)>,
}

impl RawTableRow {
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value.as_str())
    }
}

/// Decoded request body for one retrieval call.
///
/// `question` is an Option so that a missing field surfaces as our own
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AskRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub top_k: Option<usize>,
    #[serde(default)]
    pub scope: Option<String>,
    #[serde(default)]
    pub document_hint: Option<String>,
}

/// Response for one retrieval call; `results` is ordered by descending score.
#[derive(Debug, Clone, Serialize)]
pub struct AskResponse {
    pub question: String,
    pub top_k: usize,
    pub scope: Option<String>,
    pub document_hint: Option<String>,
    pub results: Vec<ResultItem>,
}

/// One retrieved chunk, enriched with rendered table content when tabular.
#[derive(Debug, Clone, Serialize)]
pub struct ResultItem {
    pub doc_id: String,
    pub guideline_title: Option<String>,
    pub year: Option<i32>,
    pub chunk_id: String,
    pub section_path: String,
    pub text: String,
    pub content_type: Option<String>,
    pub attachment_id: Option<String>,
    pub attachment_path: Option<String>,
    /// Semantic table kind; absent for prose chunks and on render failure.
    pub table_subtype: Option<String>,
    /// Clinician-readable rendering of the table; absent on render failure.
    pub table_text: Option<String>,
    /// Logical rows as header->value objects; absent on render failure.
    pub table_rows: Option<Vec<serde_json::Value>>,
    pub score: f32,
}

impl ResultItem {
    /// Build the unenriched projection of a chunk. Table fields start
    /// empty and are filled in by the render pipeline when it succeeds.
    pub fn from_chunk(chunk: &Chunk, score: f32) -> Self {
        ResultItem {
            doc_id: chunk.doc_id.clone(),
            guideline_title: chunk.guideline_title.clone(),
            year: chunk.year,
            chunk_id: chunk.chunk_id.clone(),
            section_path: chunk.section_path.clone(),
            text: chunk.text.clone(),
            content_type: chunk.content_type.clone(),
            attachment_id: chunk.attachment_id.clone(),
            attachment_path: chunk.attachment_path.clone(),
            table_subtype: None,
            table_text: None,
            table_rows: None,
            score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_round_trip() {
        for s in [
            "prevention",
            "screening",
            "diagnosis",
            "treatment",
            "pediatrics",
            "comorbidities",
            "drug-safety",
            "programmatic",
        ] {
            let scope = Scope::parse(s).expect(s);
            assert_eq!(scope.as_str(), s);
        }
    }

    #[test]
    fn test_scope_parse_tolerates_case_and_underscore() {
        assert_eq!(Scope::parse("Drug_Safety"), Some(Scope::DrugSafety));
        assert_eq!(Scope::parse("  DIAGNOSIS "), Some(Scope::Diagnosis));
        assert_eq!(Scope::parse("cardiology"), None);
    }

    #[test]
    fn test_chunk_is_table() {
        let mut chunk = Chunk {
            doc_id: "module4".into(),
            chunk_id: "module4_c1".into(),
            section_path: String::new(),
            content_type: Some("table".into()),
            text: String::new(),
            caption: None,
            attachment_id: None,
            attachment_path: None,
            guideline_title: None,
            year: None,
            scope: None,
        };
        assert!(chunk.is_table());
        chunk.content_type = Some("text".into());
        assert!(!chunk.is_table());
        chunk.content_type = None;
        assert!(!chunk.is_table());
    }

    #[test]
    fn test_raw_row_get() {
        let row = RawTableRow {
            row_index: "2".into(),
            cells: vec![
                ("ColumnA".into(), "4-7 kg".into()),
                ("ColumnB".into(), "50 mg".into()),
            ],
        };
        assert_eq!(row.get("ColumnB"), Some("50 mg"));
        assert_eq!(row.get("ColumnC"), None);
    }
}
