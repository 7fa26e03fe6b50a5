//! Raw table attachment reader.
//!
//! Table chunks point at CSV files whose columns carry generic positional
//! names ("ColumnA", "ColumnB", ...) plus a `row_index` column marking
//! original row order. This module turns one such file into
//! `RawTableRow`s; all semantic interpretation happens downstream.

use std::path::Path;

use tbguide_core::error::{Result, TbGuideError};
use tbguide_core::types::RawTableRow;

/// Column carrying the original row marker, excluded from cell data.
const ROW_INDEX_COLUMN: &str = "row_index";

/// Read the raw rows of one table attachment.
///
/// `attachment_path` is resolved relative to the corpus directory unless
/// absolute. Any read or parse failure maps to `TableRender`, which the
/// caller recovers from per chunk.
pub fn load_table_rows(corpus_dir: &Path, attachment_path: &str) -> Result<Vec<RawTableRow>> {
    let path = {
        let p = Path::new(attachment_path);
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            corpus_dir.join(p)
        }
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(&path)
        .map_err(|e| {
            TbGuideError::TableRender(format!("Failed to open {}: {e}", path.display()))
        })?;

    let headers = reader
        .headers()
        .map_err(|e| {
            TbGuideError::TableRender(format!("Bad header in {}: {e}", path.display()))
        })?
        .clone();

    let mut rows = Vec::new();
    for (position, record) in reader.records().enumerate() {
        let record = record.map_err(|e| {
            TbGuideError::TableRender(format!("Bad record in {}: {e}", path.display()))
        })?;

        let mut row_index = String::new();
        let mut cells = Vec::new();
        for (column, value) in headers.iter().zip(record.iter()) {
            if column == ROW_INDEX_COLUMN {
                row_index = value.trim().to_string();
            } else {
                cells.push((column.to_string(), value.to_string()));
            }
        }
        // Files without a row_index column fall back to 1-based position,
        // which makes the first data line the header row.
        if row_index.is_empty() {
            row_index = (position + 1).to_string();
        }
        rows.push(RawTableRow { row_index, cells });
    }

    Ok(rows)
}
