//! Activity log repository implementation.
//!
//! The realtime core only reads from the log; writes come from the
//! original event producers elsewhere in the portal.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use atrium_core::error::{AppError, ErrorKind};
use atrium_core::result::AppResult;
use atrium_entity::activity::ActivityEntry;
use atrium_realtime::store::ActivityStore;

/// Repository for activity log entries.
#[derive(Debug, Clone)]
pub struct ActivityLogRepository {
    pool: PgPool,
}

impl ActivityLogRepository {
    /// Create a new activity log repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ActivityStore for ActivityLogRepository {
    async fn recent(
        &self,
        limit: usize,
        user_filter: Option<&[Uuid]>,
    ) -> AppResult<Vec<ActivityEntry>> {
        let entries = match user_filter {
            Some(user_ids) => {
                sqlx::query_as::<_, ActivityEntry>(
                    "SELECT * FROM activity_log WHERE user_id = ANY($1) \
                     ORDER BY created_at DESC LIMIT $2",
                )
                .bind(user_ids)
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, ActivityEntry>(
                    "SELECT * FROM activity_log ORDER BY created_at DESC LIMIT $1",
                )
                .bind(limit as i64)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to query activity log", e)
        })?;

        Ok(entries)
    }
}
