//! RTI drafter: derives a requirement profile from raw job-description text.
//!
//! Keyword presence only. No classifier and no external call; anything the text
//! does not mention falls back to the default profile.

use crate::models::role::{default_weights, Rti};

pub const DEFAULT_MUST: &[&str] = &["3y+ backend", "Python", "Korean C1"];
pub const DEFAULT_NICE: &[&str] = &["FastAPI", "AWS", "ML ops"];
pub const DEFAULT_KNOCKOUT: &[&str] = &["No work authorization"];
pub const DEFAULT_SCREEN_QUESTIONS: &[&str] = &[
    "Latest backend project?",
    "Visa status?",
    "Notice period?",
];

/// Lower-cased substring → must-have requirement it implies.
const MUST_KEYWORDS: &[(&str, &str)] = &[("python", "Python"), ("backend", "3y+ backend")];

/// Nice-to-haves recognised when mentioned anywhere in the text.
const NICE_CANDIDATES: &[&str] = &["FastAPI", "AWS", "Postgres"];

/// The full fallback profile used when nothing can be derived.
pub fn default_rti() -> Rti {
    Rti {
        must: owned(DEFAULT_MUST),
        nice: owned(DEFAULT_NICE),
        knockout: owned(DEFAULT_KNOCKOUT),
        weights: default_weights(),
        screen_questions: owned(DEFAULT_SCREEN_QUESTIONS),
        ..Rti::default()
    }
}

/// Drafts an RTI from job-description text. Never fails.
pub fn draft_rti(jd_raw: &str) -> Rti {
    let text = jd_raw.to_lowercase();

    let must: Vec<String> = MUST_KEYWORDS
        .iter()
        .filter(|(needle, _)| text.contains(needle))
        .map(|(_, requirement)| requirement.to_string())
        .collect();

    let nice: Vec<String> = NICE_CANDIDATES
        .iter()
        .filter(|skill| text.contains(&skill.to_lowercase()))
        .map(|skill| skill.to_string())
        .collect();

    let defaults = default_rti();
    Rti {
        must: dedup_preserving_order(or_default(must, defaults.must)),
        nice: dedup_preserving_order(or_default(nice, defaults.nice)),
        ..defaults
    }
}

fn or_default(derived: Vec<String>, fallback: Vec<String>) -> Vec<String> {
    if derived.is_empty() {
        fallback
    } else {
        derived
    }
}

fn dedup_preserving_order(items: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BACKEND_JD: &str = "We need a Python backend engineer, FastAPI + AWS a plus";

    #[test]
    fn test_backend_jd_derives_must_and_nice() {
        let rti = draft_rti(BACKEND_JD);
        assert_eq!(rti.must, vec!["Python", "3y+ backend"]);
        assert_eq!(rti.nice, vec!["FastAPI", "AWS"]);
    }

    #[test]
    fn test_python_any_case_is_must_have() {
        for jd in ["PYTHON developer", "pyThon", "Senior python/go engineer"] {
            assert!(draft_rti(jd).must.contains(&"Python".to_string()), "jd: {jd}");
        }
    }

    #[test]
    fn test_no_keywords_falls_back_to_default_must() {
        let rti = draft_rti("Frontend engineer with React and TypeScript");
        assert_eq!(rti.must, owned(DEFAULT_MUST));
        assert_eq!(rti.nice, owned(DEFAULT_NICE));
    }

    #[test]
    fn test_empty_text_yields_full_defaults() {
        assert_eq!(draft_rti(""), default_rti());
    }

    #[test]
    fn test_repeated_keywords_do_not_duplicate() {
        let rti = draft_rti("python python PYTHON backend backend aws AWS postgres Postgres");
        assert_eq!(rti.must, vec!["Python", "3y+ backend"]);
        assert_eq!(rti.nice, vec!["AWS", "Postgres"]);
    }

    #[test]
    fn test_knockout_weights_and_questions_never_derived() {
        let rti = draft_rti("no work authorization needed, weights irrelevant, python");
        assert_eq!(rti.knockout, owned(DEFAULT_KNOCKOUT));
        assert_eq!(rti.screen_questions, owned(DEFAULT_SCREEN_QUESTIONS));
        assert_eq!(rti.weights, default_weights());
        assert!(rti.compensation.is_empty());
    }

    #[test]
    fn test_dedup_keeps_first_occurrence() {
        let items = owned(&["b", "a", "b", "c", "a"]);
        assert_eq!(dedup_preserving_order(items), vec!["b", "a", "c"]);
    }
}
