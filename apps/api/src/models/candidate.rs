use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;
use validator::Validate;

/// Self-reported candidate data captured at application time.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub name: Option<String>,
    pub email: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    pub years_exp: Option<f64>,
    pub latest_project: Option<String>,
    pub visa_status: Option<String>,
    pub notice_period: Option<String>,
    pub location: Option<String>,
    pub expected_comp: Option<String>,
}

/// Body of `POST /apply/:share_token`.
#[derive(Debug, Clone, Deserialize)]
pub struct CandidateIntake {
    pub profile: CandidateProfile,
    pub resume_url: Option<String>,
    #[serde(rename = "consent_bool", default = "default_consent")]
    pub consent: bool,
}

fn default_consent() -> bool {
    true
}

/// A row of the `candidates` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Candidate {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Candidate {
    pub fn from_profile(profile: &CandidateProfile) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: profile.name.clone(),
            email: profile.email.clone(),
            created_at: Utc::now(),
        }
    }
}

/// Body of `POST /candidates`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewCandidate {
    #[validate(length(min = 1, message = "name cannot be empty"))]
    pub name: String,
    #[validate(email(message = "not a valid email address"))]
    pub email: Option<String>,
}

impl NewCandidate {
    /// Trims both fields. A blank email counts as absent.
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self
                .email
                .map(|e| e.trim().to_string())
                .filter(|e| !e.is_empty()),
        }
    }
}
