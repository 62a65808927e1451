//! Store traits consumed by the feed reconciler.
//!
//! Defined here, beside their consumer, and implemented by the concrete
//! sqlx repositories in `atrium-database`. The realtime core only reads
//! through these seams; it never writes to the activity log or profiles.

use std::collections::HashMap;

use async_trait::async_trait;
use uuid::Uuid;

use atrium_core::result::AppResult;
use atrium_entity::activity::ActivityEntry;

/// Read access to the append-only activity log.
#[async_trait]
pub trait ActivityStore: Send + Sync {
    /// Return the most recent entries, ordered `created_at` descending and
    /// bounded to `limit`. When `user_filter` is given, only entries by
    /// those users are returned.
    async fn recent(
        &self,
        limit: usize,
        user_filter: Option<&[Uuid]>,
    ) -> AppResult<Vec<ActivityEntry>>;
}

/// Point lookups against the user profile store.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Resolve display names for a set of user ids in one batched query.
    /// Users without a profile (or without a name) are absent from the map.
    async fn names_by_ids(&self, ids: &[Uuid]) -> AppResult<HashMap<Uuid, String>>;

    /// Resolve the member ids of a department.
    async fn ids_by_department(&self, department: &str) -> AppResult<Vec<Uuid>>;
}
