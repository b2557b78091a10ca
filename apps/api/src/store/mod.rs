//! Storage seam for the recruiting pipeline.
//!
//! Handlers and the orchestrator only see `PipelineStore`; `AppState` holds an
//! `Arc<dyn PipelineStore>` chosen at startup from `SCOUT_STORE`.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::models::matching::MatchRecord;
use crate::models::role::{Role, Rti};
use crate::models::submission::Submission;

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[async_trait]
pub trait PipelineStore: Send + Sync {
    /// Backend label, e.g. "memory" or "postgres".
    fn backend(&self) -> &'static str;

    async fn insert_role(&self, role: &Role) -> Result<(), AppError>;

    async fn get_role(&self, id: Uuid) -> Result<Option<Role>, AppError>;

    /// Replaces the RTI wholesale. `None` if the role does not exist.
    async fn replace_rti(&self, id: Uuid, rti: &Rti) -> Result<Option<Role>, AppError>;

    /// Stores `proposed` only if the role has no token yet, then returns the
    /// role's token. `None` if the role does not exist.
    async fn ensure_share_token(&self, id: Uuid, proposed: &str)
        -> Result<Option<String>, AppError>;

    async fn find_role_by_token(&self, token: &str) -> Result<Option<Role>, AppError>;

    /// Writes the candidate row and its submission together.
    async fn record_application(
        &self,
        candidate: &Candidate,
        submission: &Submission,
    ) -> Result<(), AppError>;

    /// Submissions for a role, oldest first.
    async fn list_submissions(&self, role_id: Uuid) -> Result<Vec<Submission>, AppError>;

    /// Appends match records. Existing records are never replaced.
    async fn insert_matches(&self, matches: &[MatchRecord]) -> Result<(), AppError>;

    /// Match records for a role with `score >= min_score`, in insertion order.
    async fn list_matches(&self, role_id: Uuid, min_score: i32)
        -> Result<Vec<MatchRecord>, AppError>;

    /// Newest first.
    async fn list_candidates(&self, limit: usize) -> Result<Vec<Candidate>, AppError>;

    async fn create_candidate(&self, candidate: &Candidate) -> Result<Candidate, AppError>;

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>, AppError>;

    /// Returns `false` if no such candidate existed.
    async fn delete_candidate(&self, id: Uuid) -> Result<bool, AppError>;
}
