//! Tracked repository and commit entity models.
//!
//! Rows are written exclusively by the GitHub sync collaborator via
//! idempotent upserts; the realtime core never touches them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A GitHub repository tracked for a portal user.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrackedRepository {
    /// Unique row identifier.
    pub id: Uuid,
    /// The portal user who linked this repository.
    pub user_id: Uuid,
    /// Full name in `owner/name` form. Upsert key together with `user_id`.
    pub full_name: String,
    /// Short repository name.
    pub name: String,
    /// Repository description.
    pub description: Option<String>,
    /// Default branch name.
    pub default_branch: Option<String>,
    /// When the row was last synced.
    pub synced_at: DateTime<Utc>,
}

/// Data required to upsert a tracked repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrackedRepository {
    /// The portal user who linked this repository.
    pub user_id: Uuid,
    /// Full name in `owner/name` form.
    pub full_name: String,
    /// Short repository name.
    pub name: String,
    /// Repository description.
    pub description: Option<String>,
    /// Default branch name.
    pub default_branch: Option<String>,
}

/// A commit synced from a tracked repository.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TrackedCommit {
    /// Unique row identifier.
    pub id: Uuid,
    /// The tracked repository this commit belongs to.
    pub repository_id: Uuid,
    /// Commit SHA. Upsert key together with `repository_id`.
    pub sha: String,
    /// Commit message (first line).
    pub message: String,
    /// Commit author display name.
    pub author_name: Option<String>,
    /// When the commit was authored.
    pub committed_at: DateTime<Utc>,
}

/// Data required to upsert a tracked commit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTrackedCommit {
    /// The tracked repository this commit belongs to.
    pub repository_id: Uuid,
    /// Commit SHA.
    pub sha: String,
    /// Commit message (first line).
    pub message: String,
    /// Commit author display name.
    pub author_name: Option<String>,
    /// When the commit was authored.
    pub committed_at: DateTime<Utc>,
}
