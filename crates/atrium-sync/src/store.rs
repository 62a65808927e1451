//! Store trait for sync upserts, implemented by `atrium-database`.

use async_trait::async_trait;
use uuid::Uuid;

use atrium_core::result::AppResult;
use atrium_entity::repo::{NewTrackedCommit, NewTrackedRepository, TrackedRepository};

/// Idempotent write access to the tracked repository and commit tables.
#[async_trait]
pub trait SyncStore: Send + Sync {
    /// Upsert a repository keyed on `(full_name, user_id)` and return the
    /// stored row.
    async fn upsert_repository(&self, repo: &NewTrackedRepository) -> AppResult<TrackedRepository>;

    /// Upsert a commit keyed on `(repository_id, sha)`.
    async fn upsert_commit(&self, commit: &NewTrackedCommit) -> AppResult<()>;

    /// Find a tracked repository by caller and full name.
    async fn find_repository(
        &self,
        user_id: Uuid,
        full_name: &str,
    ) -> AppResult<Option<TrackedRepository>>;
}
