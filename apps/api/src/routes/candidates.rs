//! Plain CRUD over the `candidates` table. Independent of the scoring pipeline,
//! although applications add rows to the same table.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppJson};
use crate::models::candidate::{Candidate, NewCandidate};
use crate::state::AppState;

const LIST_LIMIT: usize = 100;

fn candidate_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Candidate {id} not found"))
}

/// GET /candidates
/// Newest first, capped at 100 rows.
pub async fn handle_list_candidates(
    State(state): State<AppState>,
) -> Result<Json<Vec<Candidate>>, AppError> {
    Ok(Json(state.store.list_candidates(LIST_LIMIT).await?))
}

/// POST /candidates
pub async fn handle_create_candidate(
    State(state): State<AppState>,
    AppJson(request): AppJson<NewCandidate>,
) -> Result<(StatusCode, Json<Candidate>), AppError> {
    let request = request.trimmed();
    request.validate()?;

    let candidate = Candidate {
        id: Uuid::new_v4(),
        name: Some(request.name),
        email: request.email,
        created_at: chrono::Utc::now(),
    };
    let created = state.store.create_candidate(&candidate).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /candidates/:id
pub async fn handle_get_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Candidate>, AppError> {
    state
        .store
        .get_candidate(id)
        .await?
        .map(Json)
        .ok_or_else(|| candidate_not_found(id))
}

/// DELETE /candidates/:id
pub async fn handle_delete_candidate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.store.delete_candidate(id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(candidate_not_found(id))
    }
}
