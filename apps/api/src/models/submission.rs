use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::candidate::CandidateProfile;

/// One application against a role. Holds its own copy of the profile so later
/// edits to the candidate row do not change what was scored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub id: Uuid,
    pub role_id: Uuid,
    pub candidate_id: Uuid,
    pub resume_url: Option<String>,
    #[serde(rename = "profile_json")]
    pub profile: Option<CandidateProfile>,
    #[serde(rename = "consent_bool")]
    pub consent: bool,
    pub created_at: DateTime<Utc>,
}
