use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::Candidate;
use crate::models::matching::MatchRecord;
use crate::models::role::{Role, Rti};
use crate::models::submission::Submission;
use crate::store::PipelineStore;

#[derive(Default)]
struct Tables {
    roles: HashMap<Uuid, Role>,
    candidates: HashMap<Uuid, Candidate>,
    submissions: Vec<Submission>,
    matches: Vec<MatchRecord>,
}

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PipelineStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn insert_role(&self, role: &Role) -> Result<(), AppError> {
        self.tables.write().await.roles.insert(role.id, role.clone());
        Ok(())
    }

    async fn get_role(&self, id: Uuid) -> Result<Option<Role>, AppError> {
        Ok(self.tables.read().await.roles.get(&id).cloned())
    }

    async fn replace_rti(&self, id: Uuid, rti: &Rti) -> Result<Option<Role>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.roles.get_mut(&id).map(|role| {
            role.rti = rti.clone();
            role.clone()
        }))
    }

    async fn ensure_share_token(
        &self,
        id: Uuid,
        proposed: &str,
    ) -> Result<Option<String>, AppError> {
        let mut tables = self.tables.write().await;
        Ok(tables.roles.get_mut(&id).map(|role| {
            role.share_token
                .get_or_insert_with(|| proposed.to_string())
                .clone()
        }))
    }

    async fn find_role_by_token(&self, token: &str) -> Result<Option<Role>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .roles
            .values()
            .find(|r| r.share_token.as_deref() == Some(token))
            .cloned())
    }

    async fn record_application(
        &self,
        candidate: &Candidate,
        submission: &Submission,
    ) -> Result<(), AppError> {
        let mut tables = self.tables.write().await;
        tables.candidates.insert(candidate.id, candidate.clone());
        tables.submissions.push(submission.clone());
        Ok(())
    }

    async fn list_submissions(&self, role_id: Uuid) -> Result<Vec<Submission>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .submissions
            .iter()
            .filter(|s| s.role_id == role_id)
            .cloned()
            .collect())
    }

    async fn insert_matches(&self, matches: &[MatchRecord]) -> Result<(), AppError> {
        self.tables.write().await.matches.extend_from_slice(matches);
        Ok(())
    }

    async fn list_matches(
        &self,
        role_id: Uuid,
        min_score: i32,
    ) -> Result<Vec<MatchRecord>, AppError> {
        let tables = self.tables.read().await;
        Ok(tables
            .matches
            .iter()
            .filter(|m| m.role_id == role_id && m.score >= min_score)
            .cloned()
            .collect())
    }

    async fn list_candidates(&self, limit: usize) -> Result<Vec<Candidate>, AppError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Candidate> = tables.candidates.values().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn create_candidate(&self, candidate: &Candidate) -> Result<Candidate, AppError> {
        self.tables
            .write()
            .await
            .candidates
            .insert(candidate.id, candidate.clone());
        Ok(candidate.clone())
    }

    async fn get_candidate(&self, id: Uuid) -> Result<Option<Candidate>, AppError> {
        Ok(self.tables.read().await.candidates.get(&id).cloned())
    }

    async fn delete_candidate(&self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.tables.write().await.candidates.remove(&id).is_some())
    }
}
