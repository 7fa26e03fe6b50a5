//! Semantic classification of normalized tables.
//!
//! Detection is ordered and first-match-wins. Dosing and other
//! safety-relevant kinds are checked first: misreading those as generic
//! loses the most clinically actionable structure. Regimen deliberately
//! requires both a regimen header and a drug/component header so a lone
//! "regimen" column in a narrative table does not misfire.

use crate::normalize::NormalizedTable;

/// The semantic kind of a guideline table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableSubtype {
    Dosing,
    PedsDosing,
    Regimen,
    Decision,
    Timeline,
    Interaction,
    Toxicity,
    Generic,
}

impl TableSubtype {
    pub fn as_str(&self) -> &'static str {
        match self {
            TableSubtype::Dosing => "dosing",
            TableSubtype::PedsDosing => "peds_dosing",
            TableSubtype::Regimen => "regimen",
            TableSubtype::Decision => "decision",
            TableSubtype::Timeline => "timeline",
            TableSubtype::Interaction => "interaction",
            TableSubtype::Toxicity => "toxicity",
            TableSubtype::Generic => "generic",
        }
    }
}

fn any_header_contains(headers: &[String], needles: &[&str]) -> bool {
    headers.iter().any(|h| {
        let h = h.to_lowercase();
        needles.iter().any(|n| h.contains(n))
    })
}

/// Classify one table from its caption, section breadcrumb, and header
/// labels.
pub fn detect(caption: Option<&str>, section_path: &str, table: &NormalizedTable) -> TableSubtype {
    let context = format!(
        "{} {}",
        caption.unwrap_or_default(),
        section_path
    )
    .to_lowercase();
    let headers = &table.headers;

    // Dosing: weight/dose/mg-per-kg cues in headers or context.
    let dosing = any_header_contains(headers, &["dose", "dosing", "mg/kg"])
        || (any_header_contains(headers, &["weight", "kg"])
            && any_header_contains(headers, &["mg", "tablet"]))
        || context.contains("dosing")
        || context.contains("dosage");
    if dosing {
        let pediatric = any_header_contains(headers, &["child", "paediatric", "pediatric", "infant", "age"])
            || context.contains("child")
            || context.contains("paediatric")
            || context.contains("pediatric")
            || context.contains("infant")
            || context.contains("adolescent");
        return if pediatric {
            TableSubtype::PedsDosing
        } else {
            TableSubtype::Dosing
        };
    }

    // Decision: criteria / if-then / recommendation shapes.
    if any_header_contains(headers, &["criteria", "criterion", "if ", "condition", "recommendation", "decision"])
        || context.contains("algorithm")
        || context.contains("decision")
    {
        return TableSubtype::Decision;
    }

    // Regimen: needs both a regimen header and a drug/component header.
    if any_header_contains(headers, &["regimen"])
        && any_header_contains(headers, &["drug", "component", "composition", "medicine"])
    {
        return TableSubtype::Regimen;
    }

    // Timeline: monitoring schedules and time-point grids.
    if any_header_contains(
        headers,
        &["month", "week", "baseline", "schedule", "frequency", "time point", "timepoint", "visit"],
    ) {
        return TableSubtype::Timeline;
    }

    // Interaction: drug-pair tables.
    if any_header_contains(
        headers,
        &["interaction", "interacting", "concomitant", "co-administered"],
    ) {
        return TableSubtype::Interaction;
    }

    // Toxicity: graded adverse event tables.
    if any_header_contains(headers, &["grade", "severity", "toxicity"]) {
        return TableSubtype::Toxicity;
    }

    TableSubtype::Generic
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(headers: &[&str]) -> NormalizedTable {
        NormalizedTable {
            headers: headers.iter().map(|h| h.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    #[test]
    fn test_dosing_from_headers() {
        let t = table(&["Weight (kg)", "Dose (mg)"]);
        assert_eq!(detect(None, "", &t), TableSubtype::Dosing);
    }

    #[test]
    fn test_peds_dosing_from_context() {
        let t = table(&["Weight band", "Dose (mg)"]);
        assert_eq!(
            detect(Some("Dosing in children under 25 kg"), "5.2", &t),
            TableSubtype::PedsDosing
        );
    }

    #[test]
    fn test_dosing_beats_decision() {
        // A dosing table whose caption mentions an algorithm still lands
        // on dosing: the checks are ordered.
        let t = table(&["Weight (kg)", "Dose (mg)"]);
        assert_eq!(
            detect(Some("Dosing algorithm"), "", &t),
            TableSubtype::Dosing
        );
    }

    #[test]
    fn test_decision_from_headers() {
        let t = table(&["Criteria", "Recommendation"]);
        assert_eq!(detect(None, "", &t), TableSubtype::Decision);
    }

    #[test]
    fn test_regimen_requires_both_headers() {
        let with_both = table(&["Regimen", "Drug composition"]);
        assert_eq!(detect(None, "", &with_both), TableSubtype::Regimen);

        // A lone regimen column is not enough.
        let lone = table(&["Regimen", "Notes"]);
        assert_eq!(detect(None, "", &lone), TableSubtype::Generic);
    }

    #[test]
    fn test_timeline_from_headers() {
        let t = table(&["Assessment", "Baseline", "Month 2", "Month 6"]);
        assert_eq!(detect(None, "", &t), TableSubtype::Timeline);
    }

    #[test]
    fn test_interaction_from_headers() {
        let t = table(&["TB drug", "Co-administered drug", "Effect"]);
        assert_eq!(detect(None, "", &t), TableSubtype::Interaction);
    }

    #[test]
    fn test_toxicity_from_headers() {
        let t = table(&["Adverse event", "Grade", "Management"]);
        assert_eq!(detect(None, "", &t), TableSubtype::Toxicity);
    }

    #[test]
    fn test_generic_fallback() {
        let t = table(&["Topic", "Summary"]);
        assert_eq!(detect(None, "", &t), TableSubtype::Generic);
    }
}
