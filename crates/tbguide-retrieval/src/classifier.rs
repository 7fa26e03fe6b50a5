//! Heuristic query classification: topical scope and document hint.
//!
//! Both classifiers are pure functions of the question text. Keyword
//! sets and alias rules are static tables evaluated by generic
//! first-match logic, so individual rules can be tested and reordered
//! without touching control flow.

use tbguide_core::types::Scope;

// Topical keyword sets. A set's count is the number of its keywords
// found as substrings of the lower-cased question.
static DIAGNOSIS_KEYWORDS: &[&str] = &[
    "diagnos",
    "xpert",
    "genexpert",
    "truenat",
    "lf-lam",
    "smear",
    "culture",
    "drug susceptibility",
    "dst",
    "cxr",
    "chest x-ray",
    "radiograph",
];

static TREATMENT_KEYWORDS: &[&str] = &[
    "treatment",
    "regimen",
    "bpalm",
    "bpal",
    "duration",
    "dose",
    "dosing",
    "bedaquiline",
    "delamanid",
    "pretomanid",
    "linezolid",
    "moxifloxacin",
    "levofloxacin",
    "rifampicin",
    "isoniazid",
    "clofazimine",
];

static SAFETY_KEYWORDS: &[&str] = &[
    "adverse",
    "side effect",
    "toxicity",
    "safety",
    "monitor",
    "qt interval",
    "qtcf",
    "ecg",
    "hepatotoxic",
    "audiometry",
    "peripheral neuropathy",
    "myelosuppression",
    "pharmacovigilance",
];

static PEDIATRIC_KEYWORDS: &[&str] = &[
    "child",
    "children",
    "paediatric",
    "pediatric",
    "infant",
    "adolescent",
    "weight band",
    "mg/kg",
];

static PROGRAMMATIC_KEYWORDS: &[&str] = &[
    "programmatic",
    "programme",
    "cascade",
    "notification",
    "recording",
    "reporting",
    "indicator",
    "coverage",
    "policy",
    "implementation",
];

/// One document-hint alias rule. The rule fires when any trigger is
/// present and, if `requires` is non-empty, at least one required
/// keyword co-occurs.
#[derive(Debug)]
pub struct HintRule {
    pub triggers: &'static [&'static str],
    pub requires: &'static [&'static str],
    pub hint: &'static str,
}

// Ordered: first matching rule wins. Module 3 precedes module 2 so that
// "module iii" never falls through to a bare "module ii" substring.
static HINT_RULES: &[HintRule] = &[
    HintRule {
        triggers: &["module 3", "module iii"],
        requires: &["diagnos", "algorithm", "cxr"],
        hint: "module3_diagnosis",
    },
    HintRule {
        triggers: &["module 2"],
        requires: &["screen"],
        hint: "module2_screening",
    },
    HintRule {
        triggers: &["module 1"],
        requires: &["prevent", "tpt"],
        hint: "module1_prevention",
    },
    HintRule {
        triggers: &["module 4", "module iv"],
        requires: &[],
        hint: "module4_treatment",
    },
    HintRule {
        triggers: &["module 5", "module v"],
        requires: &["child", "adolescent", "paediatric", "pediatric"],
        hint: "module5_children",
    },
    HintRule {
        triggers: &["operational handbook", "handbook"],
        requires: &[],
        hint: "operational_handbook",
    },
];

fn count_hits(text: &str, keywords: &[&str]) -> usize {
    keywords.iter().filter(|kw| text.contains(*kw)).count()
}

/// Infer a topical scope from the question text.
///
/// The precedence is deliberate: diagnosis and safety signals are
/// clinically higher-stakes and must not be masked by generic treatment
/// vocabulary.
pub fn infer_scope(question: &str) -> Option<Scope> {
    let q = question.to_lowercase();

    let diagnosis = count_hits(&q, DIAGNOSIS_KEYWORDS);
    let treatment = count_hits(&q, TREATMENT_KEYWORDS);
    let safety = count_hits(&q, SAFETY_KEYWORDS);
    let pediatric = count_hits(&q, PEDIATRIC_KEYWORDS);
    let programmatic = count_hits(&q, PROGRAMMATIC_KEYWORDS);

    if diagnosis >= 2 || (diagnosis >= 1 && q.contains("module 3")) {
        return Some(Scope::Diagnosis);
    }
    if pediatric >= 2 {
        return Some(Scope::Pediatrics);
    }
    if safety >= 2 || (safety >= 1 && q.contains("monitor")) {
        return Some(Scope::DrugSafety);
    }
    if programmatic >= 2 {
        return Some(Scope::Programmatic);
    }
    if treatment >= 2 {
        return Some(Scope::Treatment);
    }
    None
}

/// Infer a source-document hint from the question text. First matching
/// rule wins; no match yields no hint.
pub fn infer_document_hint(question: &str) -> Option<&'static str> {
    let q = question.to_lowercase();
    HINT_RULES
        .iter()
        .find(|rule| {
            rule.triggers.iter().any(|t| q.contains(t))
                && (rule.requires.is_empty() || rule.requires.iter().any(|r| q.contains(r)))
        })
        .map(|rule| rule.hint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monitoring_question_infers_drug_safety() {
        let scope = infer_scope(
            "What are the recommended monitoring steps for a patient on bedaquiline?",
        );
        assert_eq!(scope, Some(Scope::DrugSafety));
    }

    #[test]
    fn test_diagnosis_beats_treatment() {
        // Two diagnosis keywords plus two treatment keywords: diagnosis
        // is checked first and wins.
        let scope = infer_scope("Should Xpert or smear guide the treatment regimen choice?");
        assert_eq!(scope, Some(Scope::Diagnosis));
    }

    #[test]
    fn test_single_diagnosis_hit_needs_module_3() {
        assert_eq!(infer_scope("How is a chest x-ray read?"), None);
        assert_eq!(
            infer_scope("How does module 3 say a chest x-ray is read?"),
            Some(Scope::Diagnosis)
        );
    }

    #[test]
    fn test_pediatric_question() {
        let scope = infer_scope("What weight band applies to a child under five?");
        assert_eq!(scope, Some(Scope::Pediatrics));
    }

    #[test]
    fn test_treatment_needs_two_hits() {
        assert_eq!(infer_scope("How long is the treatment?"), None);
        assert_eq!(
            infer_scope("What is the duration of the BPaLM treatment regimen?"),
            Some(Scope::Treatment)
        );
    }

    #[test]
    fn test_programmatic_question() {
        let scope = infer_scope("Which reporting indicator covers the notification cascade?");
        assert_eq!(scope, Some(Scope::Programmatic));
    }

    #[test]
    fn test_no_scope_for_generic_question() {
        assert_eq!(infer_scope("What is tuberculosis?"), None);
    }

    #[test]
    fn test_module3_hint_with_requirement() {
        assert_eq!(
            infer_document_hint("Show the module 3 diagnostic algorithm"),
            Some("module3_diagnosis")
        );
        // Trigger present but no required co-keyword: no hint.
        assert_eq!(infer_document_hint("What changed in module 3?"), None);
    }

    #[test]
    fn test_module4_hint_has_no_requirement() {
        assert_eq!(
            infer_document_hint("What does module 4 recommend?"),
            Some("module4_treatment")
        );
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // Both module 3 (satisfied) and handbook would match; the module
        // 3 rule is earlier.
        assert_eq!(
            infer_document_hint("Does the handbook repeat the module 3 cxr algorithm?"),
            Some("module3_diagnosis")
        );
    }

    #[test]
    fn test_no_hint() {
        assert_eq!(infer_document_hint("What is the dose of rifampicin?"), None);
    }
}
