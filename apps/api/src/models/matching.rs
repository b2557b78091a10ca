use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Scorer output for a single profile. `candidate_id` is attached by the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    pub candidate_id: Option<Uuid>,
    #[serde(rename = "score_int")]
    pub score: i32,
    #[serde(default)]
    pub rationale: Vec<String>,
    #[serde(default)]
    pub flags: Vec<String>,
}

/// A persisted scoring outcome. Every scoring run appends new records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct MatchRecord {
    pub id: Uuid,
    pub role_id: Uuid,
    pub candidate_id: Uuid,
    #[serde(rename = "score_int")]
    pub score: i32,
    pub rationale: Vec<String>,
    pub flags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl MatchRecord {
    pub fn from_result(role_id: Uuid, candidate_id: Uuid, result: MatchResult) -> Self {
        Self {
            id: Uuid::new_v4(),
            role_id,
            candidate_id,
            score: result.score,
            rationale: result.rationale,
            flags: result.flags,
            created_at: Utc::now(),
        }
    }

    pub fn to_result(&self) -> MatchResult {
        MatchResult {
            candidate_id: Some(self.candidate_id),
            score: self.score,
            rationale: self.rationale.clone(),
            flags: self.flags.clone(),
        }
    }
}
