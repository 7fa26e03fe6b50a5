//! Kind-specific table rendering with generic fallback.
//!
//! Each specialized renderer returns `None` when its structural
//! assumption fails (no row produced a structured line); `render_table`
//! then falls back to the generic renderer so a table with data is
//! never rendered empty.

use crate::normalize::{LogicalRow, NormalizedTable};
use crate::subtype::TableSubtype;

/// Shared prioritized-candidate-key lookup: the first candidate whose
/// substring appears in a header with a populated cell wins.
pub fn first_present<'a>(row: &'a LogicalRow, candidates: &[&str]) -> Option<&'a str> {
    for candidate in candidates {
        let found = row.cells.iter().find(|(header, value)| {
            header.to_lowercase().contains(candidate) && !value.trim().is_empty()
        });
        if let Some((_, value)) = found {
            return Some(value.as_str());
        }
    }
    None
}

/// Render one table to clinician-readable text. Row order is preserved;
/// no numeric computation happens here.
pub fn render_table(
    subtype: TableSubtype,
    table: &NormalizedTable,
    caption: Option<&str>,
) -> String {
    let body = match subtype {
        TableSubtype::Dosing | TableSubtype::PedsDosing => render_dosing(table),
        TableSubtype::Regimen => render_regimen(table),
        TableSubtype::Decision => render_decision(table),
        TableSubtype::Timeline => render_timeline(table),
        TableSubtype::Interaction => render_interaction(table),
        TableSubtype::Toxicity => render_toxicity(table),
        TableSubtype::Generic => None,
    }
    .unwrap_or_else(|| render_generic(table));

    match caption {
        Some(c) if !c.trim().is_empty() => format!("{}\n{}", c.trim(), body),
        _ => body,
    }
}

/// Collect per-row lines; `None` when no row yielded one, which is the
/// fallback signal.
fn collect(lines: Vec<Option<String>>) -> Option<String> {
    let produced: Vec<String> = lines.into_iter().flatten().collect();
    if produced.is_empty() {
        None
    } else {
        Some(produced.join("\n"))
    }
}

fn render_dosing(table: &NormalizedTable) -> Option<String> {
    collect(
        table
            .rows
            .iter()
            .map(|row| {
                let band = first_present(row, &["weight band", "weight", "kg", "age"])?;
                let dose = first_present(row, &["dose", "mg", "tablet"])?;
                let drug = first_present(row, &["drug", "medicine", "formulation"]);
                Some(match drug {
                    Some(drug) => format!("{drug}, {band}: {dose}"),
                    None => format!("{band}: {dose}"),
                })
            })
            .collect(),
    )
}

fn render_regimen(table: &NormalizedTable) -> Option<String> {
    collect(
        table
            .rows
            .iter()
            .map(|row| {
                let regimen = first_present(row, &["regimen"])?;
                let drugs = first_present(row, &["drug", "component", "composition", "medicine"])?;
                let duration = first_present(row, &["duration", "month"]);
                Some(match duration {
                    Some(duration) => format!("{regimen}: {drugs} ({duration})"),
                    None => format!("{regimen}: {drugs}"),
                })
            })
            .collect(),
    )
}

fn render_decision(table: &NormalizedTable) -> Option<String> {
    collect(
        table
            .rows
            .iter()
            .map(|row| {
                let criteria =
                    first_present(row, &["criteria", "criterion", "condition", "if ", "population"])?;
                let action =
                    first_present(row, &["recommendation", "action", "then", "decision", "result"])?;
                Some(format!("If {criteria}: {action}"))
            })
            .collect(),
    )
}

fn render_timeline(table: &NormalizedTable) -> Option<String> {
    collect(
        table
            .rows
            .iter()
            .map(|row| {
                let what = first_present(
                    row,
                    &["assessment", "test", "investigation", "activity", "parameter", "monitoring"],
                )?;
                // Everything else on the row is the schedule itself.
                let schedule: Vec<String> = row
                    .cells
                    .iter()
                    .filter(|(header, value)| {
                        !value.trim().is_empty()
                            && !header.to_lowercase().contains("assessment")
                            && !header.to_lowercase().contains("test")
                            && !header.to_lowercase().contains("investigation")
                            && !header.to_lowercase().contains("activity")
                            && !header.to_lowercase().contains("parameter")
                            && !header.to_lowercase().contains("monitoring")
                    })
                    .map(|(header, value)| format!("{header}: {value}"))
                    .collect();
                if schedule.is_empty() {
                    None
                } else {
                    Some(format!("{what} - {}", schedule.join("; ")))
                }
            })
            .collect(),
    )
}

fn render_interaction(table: &NormalizedTable) -> Option<String> {
    collect(
        table
            .rows
            .iter()
            .map(|row| {
                let partner = first_present(
                    row,
                    &["interacting", "co-administered", "concomitant", "interaction"],
                )?;
                let drug = first_present(row, &["tb drug", "drug", "medicine"])?;
                let effect = first_present(row, &["effect", "management", "recommendation", "action"]);
                Some(match effect {
                    Some(effect) => format!("{drug} with {partner}: {effect}"),
                    None => format!("{drug} with {partner}"),
                })
            })
            .collect(),
    )
}

fn render_toxicity(table: &NormalizedTable) -> Option<String> {
    collect(
        table
            .rows
            .iter()
            .map(|row| {
                let event = first_present(row, &["adverse event", "event", "toxicity", "drug"])?;
                let grade = first_present(row, &["grade", "severity"])?;
                let management = first_present(row, &["management", "action", "response"]);
                Some(match management {
                    Some(management) => format!("{event} (grade {grade}): {management}"),
                    None => format!("{event} (grade {grade})"),
                })
            })
            .collect(),
    )
}

/// Generic fallback: every non-empty header:value pair of every row.
/// Zero rows still yields an explicit notice, never an empty string.
pub fn render_generic(table: &NormalizedTable) -> String {
    if table.rows.is_empty() {
        return "No table rows found.".to_string();
    }
    table
        .rows
        .iter()
        .map(|row| {
            let pairs: Vec<String> = row
                .cells
                .iter()
                .filter(|(_, value)| !value.trim().is_empty())
                .map(|(header, value)| format!("{header}: {value}"))
                .collect();
            if pairs.is_empty() {
                "(empty row)".to_string()
            } else {
                pairs.join("; ")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
