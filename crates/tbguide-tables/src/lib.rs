//! # TbGuide Tables
//!
//! Turns raw guideline CSV tables into clinician-readable text.
//!
//! ## Pipeline
//! ```text
//! RawTableRow[] (generic columns)
//!   -> normalize: header row identified, rows re-keyed by semantic labels
//!   -> detect: semantic kind (dosing, regimen, decision, ...)
//!   -> render: kind-specific prose lines, generic fallback
//! ```
//!
//! Specialized renderers always fall back to the generic renderer when
//! their structural assumption fails, so a table with data is never
//! rendered empty.

pub mod normalize;
pub mod render;
pub mod subtype;

use tbguide_core::types::RawTableRow;

pub use normalize::{LogicalRow, NormalizedTable};
pub use render::render_table;
pub use subtype::TableSubtype;

/// The fully interpreted form of one table chunk.
#[derive(Debug, Clone)]
pub struct TableRendering {
    pub subtype: TableSubtype,
    pub text: String,
    /// Logical rows as header->value JSON objects, in source order.
    pub rows: Vec<serde_json::Value>,
}

/// Run the whole pipeline for one table.
pub fn interpret_table(
    raw_rows: &[RawTableRow],
    caption: Option<&str>,
    section_path: &str,
) -> TableRendering {
    let table = normalize::normalize(raw_rows);
    let subtype = subtype::detect(caption, section_path, &table);
    let text = render::render_table(subtype, &table, caption);
    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut obj = serde_json::Map::new();
            obj.insert("row_index".into(), row.row_index.clone().into());
            for (header, value) in &row.cells {
                obj.insert(header.clone(), value.clone().into());
            }
            serde_json::Value::Object(obj)
        })
        .collect();

    TableRendering {
        subtype,
        text,
        rows,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(row_index: &str, cells: &[(&str, &str)]) -> RawTableRow {
        RawTableRow {
            row_index: row_index.into(),
            cells: cells
                .iter()
                .map(|(c, v)| (c.to_string(), v.to_string()))
                .collect(),
        }
    }

    #[test]
    fn test_interpret_dosing_table_end_to_end() {
        let rows = vec![
            raw("1", &[("ColumnA", "Weight (kg)"), ("ColumnB", "Dose (mg)")]),
            raw("2", &[("ColumnA", "4-7 kg"), ("ColumnB", "50 mg")]),
            raw("3", &[("ColumnA", "8-11 kg"), ("ColumnB", "75 mg")]),
        ];
        let rendering = interpret_table(&rows, Some("Isoniazid dosing by weight band"), "5.2");

        assert_eq!(rendering.subtype, TableSubtype::Dosing);
        assert!(rendering.text.contains("4-7 kg"));
        assert!(rendering.text.contains("50 mg"));
        assert!(rendering.text.contains("8-11 kg"));
        assert_eq!(rendering.rows.len(), 2);
        assert_eq!(rendering.rows[0]["Weight (kg)"], "4-7 kg");
        assert_eq!(rendering.rows[0]["row_index"], "2");
    }

    #[test]
    fn test_interpret_empty_table() {
        let rendering = interpret_table(&[], None, "4.1");
        assert_eq!(rendering.subtype, TableSubtype::Generic);
        assert!(!rendering.text.is_empty());
        assert!(rendering.rows.is_empty());
    }
}
