//! Axum route handlers for the recruiting pipeline.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppJson};
use crate::models::candidate::CandidateIntake;
use crate::models::matching::MatchResult;
use crate::models::role::{Role, RoleCreate, RtiUpdate};
use crate::pipeline::orchestrator;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub share_token: String,
}

#[derive(Debug, Serialize)]
pub struct ApplyResponse {
    pub candidate_id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct ScoreResponse {
    pub scored: usize,
}

#[derive(Debug, Deserialize)]
pub struct ShortlistQuery {
    #[serde(default)]
    pub min_score: i32,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /roles
///
/// Creates a role and drafts its RTI from `jd_raw`.
pub async fn handle_create_role(
    State(state): State<AppState>,
    AppJson(request): AppJson<RoleCreate>,
) -> Result<Json<Role>, AppError> {
    let role = orchestrator::create_role(state.store.as_ref(), request).await?;
    Ok(Json(role))
}

/// PUT /roles/:id/rti
pub async fn handle_update_rti(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
    AppJson(request): AppJson<RtiUpdate>,
) -> Result<Json<Role>, AppError> {
    let role = orchestrator::update_rti(state.store.as_ref(), role_id, request.rti_json).await?;
    Ok(Json(role))
}

/// GET /roles/:id/share
///
/// Mints the share token on first call; later calls return the same token.
pub async fn handle_share(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
) -> Result<Json<ShareResponse>, AppError> {
    let share_token = orchestrator::share_link(state.store.as_ref(), role_id).await?;
    Ok(Json(ShareResponse { share_token }))
}

/// POST /apply/:share_token
pub async fn handle_apply(
    State(state): State<AppState>,
    Path(share_token): Path<String>,
    AppJson(request): AppJson<CandidateIntake>,
) -> Result<Json<ApplyResponse>, AppError> {
    let candidate_id = orchestrator::apply(state.store.as_ref(), &share_token, request).await?;
    Ok(Json(ApplyResponse { candidate_id }))
}

/// POST /match/:id
///
/// Scores every submission for the role. Re-running appends new match records.
pub async fn handle_match(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
) -> Result<Json<ScoreResponse>, AppError> {
    let scored =
        orchestrator::score_role(state.store.as_ref(), state.scorer.as_ref(), role_id).await?;
    Ok(Json(ScoreResponse { scored }))
}

/// GET /shortlist/:id?min_score=
pub async fn handle_shortlist(
    State(state): State<AppState>,
    Path(role_id): Path<Uuid>,
    Query(params): Query<ShortlistQuery>,
) -> Result<Json<Vec<MatchResult>>, AppError> {
    let rows = orchestrator::shortlist(state.store.as_ref(), role_id, params.min_score).await?;
    Ok(Json(rows))
}
