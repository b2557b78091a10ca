//! Match scoring: a pluggable scorer that measures a candidate profile against a role's RTI.
//!
//! Default: `RuleScorer` (keyword coverage, deterministic, no external call).
//! `AppState` holds an `Arc<dyn MatchScorer>`.

use crate::models::candidate::CandidateProfile;
use crate::models::matching::MatchResult;
use crate::models::role::Rti;

pub const FLAG_EMPTY_PROFILE: &str = "KO: empty profile";
pub const FLAG_MISSING_EMAIL: &str = "Missing email";
pub const FLAG_NO_CONSENT: &str = "No consent";

/// Share of the score carried by must-have coverage.
const MUST_SHARE: f64 = 0.7;
/// Share of the score carried by nice-to-have coverage.
const NICE_SHARE: f64 = 0.3;

// ────────────────────────────────────────────────────────────────────────────
// Trait definition
// ────────────────────────────────────────────────────────────────────────────

/// Scores one submission. The returned `candidate_id` is always `None`; callers
/// attach it when persisting.
pub trait MatchScorer: Send + Sync {
    fn score(&self, rti: &Rti, profile: Option<&CandidateProfile>, consent: bool) -> MatchResult;

    /// Backend label, surfaced in logs.
    fn name(&self) -> &'static str;
}

// ────────────────────────────────────────────────────────────────────────────
// RuleScorer
// ────────────────────────────────────────────────────────────────────────────

/// Rule-based scorer.
///
/// Algorithm:
/// 1. No profile → score 0, flagged as empty.
/// 2. Each must-have is a hit if it is a case-insensitive substring of any skill;
///    one rationale line per must-have.
/// 3. Nice-to-haves use the same rule, without rationale lines.
/// 4. score = round(100 × (0.7 × must_ratio + 0.3 × nice_ratio)), each ratio over
///    max(1, list length).
/// 5. No consent forces the score to 0.
///
/// RTI weights and knockouts are not consulted.
pub struct RuleScorer;

impl MatchScorer for RuleScorer {
    fn score(&self, rti: &Rti, profile: Option<&CandidateProfile>, consent: bool) -> MatchResult {
        compute_rule_score(rti, profile, consent)
    }

    fn name(&self) -> &'static str {
        "rules"
    }
}

pub fn compute_rule_score(
    rti: &Rti,
    profile: Option<&CandidateProfile>,
    consent: bool,
) -> MatchResult {
    let Some(profile) = profile else {
        return MatchResult {
            candidate_id: None,
            score: 0,
            rationale: vec!["No profile".to_string()],
            flags: vec![FLAG_EMPTY_PROFILE.to_string()],
        };
    };

    let mut flags = Vec::new();
    if profile.email.as_deref().map_or(true, |e| e.trim().is_empty()) {
        flags.push(FLAG_MISSING_EMAIL.to_string());
    }

    let skills: Vec<String> = profile.skills.iter().map(|s| s.to_lowercase()).collect();

    let mut rationale = Vec::with_capacity(rti.must.len());
    let mut must_hits = 0usize;
    for requirement in &rti.must {
        if covers(&skills, requirement) {
            must_hits += 1;
            rationale.push(format!("+ {requirement} (must)"));
        } else {
            rationale.push(format!("- {requirement} (missing)"));
        }
    }
    let must_ratio = ratio(must_hits, rti.must.len());

    let nice_hits = rti.nice.iter().filter(|n| covers(&skills, n)).count();
    let nice_ratio = ratio(nice_hits, rti.nice.len());

    let mut score = (100.0 * (MUST_SHARE * must_ratio + NICE_SHARE * nice_ratio))
        .round_ties_even()
        .clamp(0.0, 100.0) as i32;

    if !consent {
        flags.push(FLAG_NO_CONSENT.to_string());
        score = 0;
    }

    MatchResult {
        candidate_id: None,
        score,
        rationale,
        flags,
    }
}

/// True if `requirement` appears inside any (already lower-cased) skill.
fn covers(skills_lower: &[String], requirement: &str) -> bool {
    let needle = requirement.to_lowercase();
    skills_lower.iter().any(|s| s.contains(&needle))
}

fn ratio(hits: usize, total: usize) -> f64 {
    hits as f64 / total.max(1) as f64
}
