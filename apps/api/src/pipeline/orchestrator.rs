//! Pipeline orchestration: role creation → share link → applications → scoring → shortlist.
//!
//! Stages are informal. Scoring may be re-run at any time and applications stay
//! open after scoring.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidateIntake};
use crate::models::matching::{MatchRecord, MatchResult};
use crate::models::role::{Role, RoleCreate, Rti};
use crate::models::submission::Submission;
use crate::pipeline::drafter::draft_rti;
use crate::pipeline::scoring::MatchScorer;
use crate::store::PipelineStore;

const SHARE_TOKEN_LEN: usize = 12;

fn role_not_found(role_id: Uuid) -> AppError {
    AppError::NotFound(format!("Role {role_id} not found"))
}

/// Validates the title, drafts an RTI from the JD text and persists the role.
/// Empty JD text is allowed and yields the default RTI.
pub async fn create_role(store: &dyn PipelineStore, input: RoleCreate) -> Result<Role, AppError> {
    if input.title.trim().is_empty() {
        return Err(AppError::Validation("title cannot be empty".to_string()));
    }

    let rti = draft_rti(&input.jd_raw);
    let role = Role::new(input, rti);
    store.insert_role(&role).await?;

    info!(
        role_id = %role.id,
        must = role.rti.must.len(),
        nice = role.rti.nice.len(),
        "Role created"
    );
    Ok(role)
}

/// Replaces a role's RTI. No merge with the previous one.
pub async fn update_rti(
    store: &dyn PipelineStore,
    role_id: Uuid,
    rti: Rti,
) -> Result<Role, AppError> {
    let role = store
        .replace_rti(role_id, &rti)
        .await?
        .ok_or_else(|| role_not_found(role_id))?;
    info!(role_id = %role_id, "RTI replaced");
    Ok(role)
}

/// Returns the role's share token, minting it on first use.
pub async fn share_link(store: &dyn PipelineStore, role_id: Uuid) -> Result<String, AppError> {
    store
        .ensure_share_token(role_id, &mint_share_token())
        .await?
        .ok_or_else(|| role_not_found(role_id))
}

fn mint_share_token() -> String {
    let mut token = Uuid::new_v4().simple().to_string();
    token.truncate(SHARE_TOKEN_LEN);
    token
}

/// Records a fresh candidate and a submission for the role behind `share_token`.
/// Candidates are not deduplicated by email.
pub async fn apply(
    store: &dyn PipelineStore,
    share_token: &str,
    intake: CandidateIntake,
) -> Result<Uuid, AppError> {
    let role = store
        .find_role_by_token(share_token)
        .await?
        .ok_or_else(|| AppError::NotFound("Role share token is invalid".to_string()))?;

    let candidate = Candidate::from_profile(&intake.profile);
    let submission = Submission {
        id: Uuid::new_v4(),
        role_id: role.id,
        candidate_id: candidate.id,
        resume_url: intake.resume_url,
        profile: Some(intake.profile),
        consent: intake.consent,
        created_at: Utc::now(),
    };
    store.record_application(&candidate, &submission).await?;

    info!(role_id = %role.id, candidate_id = %candidate.id, "Application received");
    Ok(candidate.id)
}

/// Scores every submission for the role and appends one match record per
/// submission. Returns the number scored.
pub async fn score_role(
    store: &dyn PipelineStore,
    scorer: &dyn MatchScorer,
    role_id: Uuid,
) -> Result<usize, AppError> {
    let role = store
        .get_role(role_id)
        .await?
        .ok_or_else(|| role_not_found(role_id))?;

    let submissions = store.list_submissions(role_id).await?;
    let matches: Vec<MatchRecord> = submissions
        .iter()
        .map(|s| {
            let result = scorer.score(&role.rti, s.profile.as_ref(), s.consent);
            MatchRecord::from_result(role_id, s.candidate_id, result)
        })
        .collect();

    store.insert_matches(&matches).await?;

    info!(role_id = %role_id, scored = matches.len(), scorer = scorer.name(), "Role scored");
    Ok(matches.len())
}

/// Match records for the role with `score >= min_score`, highest score first.
/// Equal scores keep their stored order.
pub async fn shortlist(
    store: &dyn PipelineStore,
    role_id: Uuid,
    min_score: i32,
) -> Result<Vec<MatchResult>, AppError> {
    let mut rows = store.list_matches(role_id, min_score).await?;
    rows.sort_by(|a, b| b.score.cmp(&a.score));
    Ok(rows.iter().map(MatchRecord::to_result).collect())
}
