//! PostgreSQL-backed `PipelineStore`. Tables are described in `db/migrations/`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::{Candidate, CandidateProfile};
use crate::models::matching::MatchRecord;
use crate::models::role::{Role, Rti};
use crate::models::submission::Submission;
use crate::store::PipelineStore;

const ROLE_COLUMNS: &str =
    "id, project_id, title, level, location, jd_raw, rti, share_token, created_at";
const SUBMISSION_COLUMNS: &str =
    "id, role_id, candidate_id, resume_url, profile, consent, created_at";
const MATCH_COLUMNS: &str = "id, role_id, candidate_id, score, rationale, flags, created_at";
const CANDIDATE_COLUMNS: &str = "id, name, email, created_at";

#[derive(Debug, FromRow)]
struct RoleRow {
    id: Uuid,
    project_id: Option<String>,
    title: String,
    level: Option<String>,
    location: Option<String>,
    jd_raw: String,
    rti: Json<Rti>,
    share_token: Option<String>,
    created_at: DateTime<Utc>,
}

impl From<RoleRow> for Role {
    fn from(row: RoleRow) -> Self {
        Role {
            id: row.id,
            project_id: row.project_id,
            title: row.title,
            level: row.level,
            location: row.location,
            jd_raw: row.jd_raw,
            rti: row.rti.0,
            share_token: row.share_token,
            created_at: row.created_at,
        }
    }
}

#[derive(Debug, FromRow)]
struct SubmissionRow {
    id: Uuid,
    role_id: Uuid,
    candidate_id: Uuid,
    resume_url: Option<String>,
    profile: Option<Json<CandidateProfile>>,
    consent: bool,
    created_at: DateTime<Utc>,
}

impl From<SubmissionRow> for Submission {
    fn from(row: SubmissionRow) -> Self {
        Submission {
            id: row.id,
            role_id: row.role_id,
            candidate_id: row.candidate_id,
            resume_url: row.resume_url,
            profile: row.profile.map(|p| p.0),
            consent: row.consent,
            created_at: row.created_at,
        }
    }
}

pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PipelineStore for PgStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn insert_role(&self, role: &Role) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO roles
                (id, project_id, title, level, location, jd_raw, rti, share_token, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(role.id)
        .bind(&role.project_id)
        .bind(&role.title)
        .bind(&role.level)
        .bind(&role.location)
        .bind(&role.jd_raw)
        .bind(Json(&role.rti))
        .bind(&role.share_token)
        .bind(role.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_role(&self, id: Uuid) -> Result<Option<Role>, AppError> {
        let query = format!("SELECT {ROLE_COLUMNS} FROM roles WHERE id = $1");
        let row = sqlx::query_as::<_, RoleRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Role::from))
    }

    async fn replace_rti(&self, id: Uuid, rti: &Rti) -> Result<Option<Role>, AppError> {
        let query = format!("UPDATE roles SET rti = $2 WHERE id = $1 RETURNING {ROLE_COLUMNS}");
        let row = sqlx::query_as::<_, RoleRow>(&query)
            .bind(id)
            .bind(Json(rti))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Role::from))
    }

    async fn ensure_share_token(
        &self,
        id: Uuid,
        proposed: &str,
    ) -> Result<Option<String>, AppError> {
        // COALESCE keeps the first token even when two first calls race.
        let token: Option<Option<String>> = sqlx::query_scalar(
            "UPDATE roles SET share_token = COALESCE(share_token, $2) WHERE id = $1 RETURNING share_token",
        )
        .bind(id)
        .bind(proposed)
        .fetch_optional(&self.pool)
        .await?;
        Ok(token.flatten())
    }

    async fn find_role_by_token(&self, token: &str) -> Result<Option<Role>, AppError> {
        let query = format!("SELECT {ROLE_COLUMNS} FROM roles WHERE share_token = $1");
        let row = sqlx::query_as::<_, RoleRow>(&query)
            .bind(token)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Role::from))
    }

    async fn record_application(
        &self,
        candidate: &Candidate,
        submission: &Submission,
    ) -> Result<(), AppError> {
        // Dropping the transaction on an early return rolls it back.
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            "INSERT INTO candidates (id, name, email, profile, created_at) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(candidate.id)
        .bind(&candidate.name)
        .bind(&candidate.email)
        .bind(submission.profile.as_ref().map(Json))
        .bind(candidate.created_at)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO submissions
                (id, role_id, candidate_id, resume_url, profile, consent, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(submission.id)
        .bind(submission.role_id)
        .bind(submission.candidate_id)
        .bind(&submission.resume_url)
        .bind(submission.profile.as_ref().map(Json))
        .bind(submission.consent)
        .bind(submission.created_at)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        debug!(submission_id = %submission.id, "Application recorded");
        Ok(())
    }

    async fn list_submissions(&self, role_id: Uuid) -> Result<Vec<Submission>, AppError> {
        let query = format!(
            "SELECT {SUBMISSION_COLUMNS} FROM submissions WHERE role_id = $1 ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, SubmissionRow>(&query)
            .bind(role_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(Submission::from).collect())
    }

    async fn insert_matches(&self, matches: &[MatchRecord]) -> Result<(), AppError> {
        if matches.is_empty() {
            return Ok(());
        }
        let mut tx = self.pool.begin().await?;
        for m in matches {
            sqlx::query(
                r#"
                INSERT INTO matches (id, role_id, candidate_id, score, rationale, flags, created_at)
                VALUES ($1, $2, $3, $4, $5, $6, $7)
                "#,
            )
            .bind(m.id)
            .bind(m.role_id)
            .bind(m.candidate_id)
            .bind(m.score)
            .bind(&m.rationale)
            .bind(&m.flags)
            .bind(m.created_at)
            .execute(&mut *tx)
            .await?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn list_matches(
        &self,
        role_id: Uuid,
        min_score: i32,
    ) -> Result<Vec<MatchRecord>, AppError> {
        let query = format!(
            "SELECT {MATCH_COLUMNS} FROM matches WHERE role_id = $1 AND score >= $2 ORDER BY created_at, id"
        );
        let rows = sqlx::query_as::<_, MatchRecord>(&query)
            .bind(role_id)
            .bind(min_score)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_candidates(&self, limit: usize) -> Result<Vec<Candidate>, AppError> {
        let query = format!(
            "SELECT {CANDIDATE_COLUMNS} FROM candidates ORDER BY created_at DESC LIMIT $1"
        );
        let rows = sqlx::query_as::<_, Candidate>(&query)
            .bind(i64::try_from(limit).unwrap_or(i64::MAX))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn create_candidate(&self, candidate: &Candidate) -> Result<Candidate, AppError> {
        let query = format!(
            "INSERT INTO candidates (id, name, email, created_at) VALUES ($1, $2, $3, $4) RETURNING {CANDIDATE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, Candidate>(&query)
            .bind(candidate.id)
            .bind(&candidate.name)
            .bind(&candidate.email)
            .bind(candidate.created_at)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>, AppError> {
        let query = format!("SELECT {CANDIDATE_COLUMNS} FROM candidates WHERE id = $1");
        let row = sqlx::query_as::<_, Candidate>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_candidate(&self, id: Uuid) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM candidates WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
