use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Requirements-To-Interview: the structured hiring criteria attached to a role.
///
/// `weights` and `knockout` are stored and returned but not consulted by the
/// rule scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rti {
    #[serde(default)]
    pub must: Vec<String>,
    #[serde(default)]
    pub nice: Vec<String>,
    #[serde(default)]
    pub knockout: Vec<String>,
    #[serde(default = "default_weights")]
    pub weights: BTreeMap<String, f64>,
    #[serde(default)]
    pub compensation: BTreeMap<String, String>,
    #[serde(default)]
    pub screen_questions: Vec<String>,
}

pub fn default_weights() -> BTreeMap<String, f64> {
    BTreeMap::from([
        ("must".to_string(), 0.6),
        ("nice".to_string(), 0.3),
        ("bonus".to_string(), 0.1),
    ])
}

impl Default for Rti {
    fn default() -> Self {
        Self {
            must: Vec::new(),
            nice: Vec::new(),
            knockout: Vec::new(),
            weights: default_weights(),
            compensation: BTreeMap::new(),
            screen_questions: Vec::new(),
        }
    }
}

/// Body of `POST /roles`.
#[derive(Debug, Clone, Deserialize)]
pub struct RoleCreate {
    pub project_id: Option<String>,
    pub title: String,
    pub level: Option<String>,
    pub location: Option<String>,
    pub jd_raw: String,
}

/// Body of `PUT /roles/:id/rti`. Replaces the RTI wholesale.
#[derive(Debug, Clone, Deserialize)]
pub struct RtiUpdate {
    pub rti_json: Rti,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: Uuid,
    pub project_id: Option<String>,
    pub title: String,
    pub level: Option<String>,
    pub location: Option<String>,
    pub jd_raw: String,
    #[serde(rename = "rti_json")]
    pub rti: Rti,
    pub share_token: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Role {
    pub fn new(input: RoleCreate, rti: Rti) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id: input.project_id,
            title: input.title,
            level: input.level,
            location: input.location,
            jd_raw: input.jd_raw,
            rti,
            share_token: None,
            created_at: Utc::now(),
        }
    }
}
