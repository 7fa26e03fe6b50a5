//! Structural normalization: raw positional rows to logical rows.

use tbguide_core::types::RawTableRow;

/// A table row re-keyed by its semantic header labels.
#[derive(Debug, Clone, PartialEq)]
pub struct LogicalRow {
    /// Original row marker, for traceability back to the source table.
    pub row_index: String,
    /// (header label, cell value) pairs in source column order. Only
    /// populated cells under labeled columns survive normalization.
    pub cells: Vec<(String, String)>,
}

impl LogicalRow {
    /// Exact (case-insensitive) header lookup.
    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| h.eq_ignore_ascii_case(header))
            .map(|(_, v)| v.as_str())
    }
}

/// A normalized table: the semantic header labels plus logical rows.
#[derive(Debug, Clone, Default)]
pub struct NormalizedTable {
    pub headers: Vec<String>,
    pub rows: Vec<LogicalRow>,
}

/// Normalize raw rows into logical rows.
///
/// The header row is the one marked `row_index == "1"`, or the first row
/// when none is. Generic columns whose header cell is empty are dropped;
/// remaining columns are relabeled with the header cell values. An empty
/// table yields no header and no rows.
pub fn normalize(raw_rows: &[RawTableRow]) -> NormalizedTable {
    if raw_rows.is_empty() {
        return NormalizedTable::default();
    }
    let header_position = raw_rows
        .iter()
        .position(|r| r.row_index == "1")
        .unwrap_or(0);
    let header_row = &raw_rows[header_position];

    // Ordered generic columns with a non-empty header label.
    let columns: Vec<(&str, String)> = header_row
        .cells
        .iter()
        .filter(|(_, label)| !label.trim().is_empty())
        .map(|(generic, label)| (generic.as_str(), label.trim().to_string()))
        .collect();
    let headers: Vec<String> = columns.iter().map(|(_, label)| label.clone()).collect();

    let rows = raw_rows
        .iter()
        .enumerate()
        .filter(|(position, _)| *position != header_position)
        .map(|(_, raw)| {
            let cells = columns
                .iter()
                .filter_map(|(generic, label)| {
                    let value = raw.get(generic)?.trim();
                    if value.is_empty() {
                        None
                    } else {
                        Some((label.clone(), value.to_string()))
                    }
                })
                .collect();
            LogicalRow {
                row_index: raw.row_index.clone(),
                cells,
            }
        })
        .collect();

    NormalizedTable { headers, rows }
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
    fn test_normalize_relabels_by_header() {
        let rows = vec![
            raw("1", &[("ColumnA", "Weight (kg)"), ("ColumnB", "Dose (mg)")]),
            raw("2", &[("ColumnA", "4-7 kg"), ("ColumnB", "50 mg")]),
        ];
        let table = normalize(&rows);
        assert_eq!(table.headers, vec!["Weight (kg)", "Dose (mg)"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("weight (kg)"), Some("4-7 kg"));
        assert_eq!(table.rows[0].row_index, "2");
    }

    #[test]
    fn test_header_row_found_by_marker_not_position() {
        // Header arrives second; row_index "1" still designates it.
        let rows = vec![
            raw("2", &[("ColumnA", "4-7 kg"), ("ColumnB", "50 mg")]),
            raw("1", &[("ColumnA", "Weight (kg)"), ("ColumnB", "Dose (mg)")]),
        ];
        let table = normalize(&rows);
        assert_eq!(table.headers, vec!["Weight (kg)", "Dose (mg)"]);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0].get("Dose (mg)"), Some("50 mg"));
    }

    #[test]
    fn test_first_row_is_header_when_no_marker() {
        let rows = vec![
            raw("10", &[("ColumnA", "Criteria"), ("ColumnB", "Action")]),
            raw("11", &[("ColumnA", "HIV positive"), ("ColumnB", "Start TPT")]),
        ];
        let table = normalize(&rows);
        assert_eq!(table.headers, vec!["Criteria", "Action"]);
        assert_eq!(table.rows.len(), 1);
    }

    #[test]
    fn test_unlabeled_columns_are_dropped() {
        let rows = vec![
            raw("1", &[("ColumnA", "Regimen"), ("ColumnB", ""), ("ColumnC", "Duration")]),
            raw(
                "2",
                &[("ColumnA", "BPaLM"), ("ColumnB", "stray"), ("ColumnC", "6 months")],
            ),
        ];
        let table = normalize(&rows);
        assert_eq!(table.headers, vec!["Regimen", "Duration"]);
        assert_eq!(table.rows[0].cells.len(), 2);
        assert_eq!(table.rows[0].get("Duration"), Some("6 months"));
    }

    #[test]
    fn test_empty_cells_are_dropped_from_rows() {
        let rows = vec![
            raw("1", &[("ColumnA", "Drug"), ("ColumnB", "Grade")]),
            raw("2", &[("ColumnA", "Linezolid"), ("ColumnB", "  ")]),
        ];
        let table = normalize(&rows);
        assert_eq!(table.rows[0].cells.len(), 1);
        assert_eq!(table.rows[0].get("Grade"), None);
    }

    #[test]
    fn test_empty_table() {
        let table = normalize(&[]);
        assert!(table.headers.is_empty());
        assert!(table.rows.is_empty());
    }
}
