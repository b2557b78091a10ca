use std::sync::Arc;

use sqlx::PgPool;

use crate::config::Config;
use crate::pipeline::scoring::MatchScorer;
use crate::store::PipelineStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Role / candidate / submission / match storage. Memory or PostgreSQL.
    pub store: Arc<dyn PipelineStore>,
    /// Present only with the PostgreSQL backend. Diagnostics check out a
    /// per-request connection from it via `DbConn`.
    pub db: Option<PgPool>,
    /// Pluggable scorer. Default: RuleScorer.
    pub scorer: Arc<dyn MatchScorer>,
    pub config: Arc<Config>,
}
