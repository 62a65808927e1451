//! Sync repository implementation: idempotent upserts for tracked
//! repositories and commits.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use atrium_core::error::{AppError, ErrorKind};
use atrium_core::result::AppResult;
use atrium_entity::repo::{NewTrackedCommit, NewTrackedRepository, TrackedRepository};
use atrium_sync::store::SyncStore;

/// Repository for sync-owned tables.
#[derive(Debug, Clone)]
pub struct SyncRepository {
    pool: PgPool,
}

impl SyncRepository {
    /// Create a new sync repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SyncStore for SyncRepository {
    async fn upsert_repository(&self, repo: &NewTrackedRepository) -> AppResult<TrackedRepository> {
        sqlx::query_as::<_, TrackedRepository>(
            "INSERT INTO repositories (id, user_id, full_name, name, description, default_branch, synced_at) \
             VALUES ($1, $2, $3, $4, $5, $6, NOW()) \
             ON CONFLICT (full_name, user_id) DO UPDATE SET \
                 name = EXCLUDED.name, \
                 description = EXCLUDED.description, \
                 default_branch = EXCLUDED.default_branch, \
                 synced_at = NOW() \
             RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(repo.user_id)
        .bind(&repo.full_name)
        .bind(&repo.name)
        .bind(&repo.description)
        .bind(&repo.default_branch)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert repository", e))
    }

    async fn upsert_commit(&self, commit: &NewTrackedCommit) -> AppResult<()> {
        sqlx::query(
            "INSERT INTO commits (id, repository_id, sha, message, author_name, committed_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             ON CONFLICT (repository_id, sha) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(commit.repository_id)
        .bind(&commit.sha)
        .bind(&commit.message)
        .bind(&commit.author_name)
        .bind(commit.committed_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to upsert commit", e))?;

        Ok(())
    }

    async fn find_repository(
        &self,
        user_id: Uuid,
        full_name: &str,
    ) -> AppResult<Option<TrackedRepository>> {
        sqlx::query_as::<_, TrackedRepository>(
            "SELECT * FROM repositories WHERE user_id = $1 AND full_name = $2",
        )
        .bind(user_id)
        .bind(full_name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find repository", e))
    }
}
