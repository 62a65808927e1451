//! Activity log entry entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::kind::ActivityKind;

/// An immutable activity log entry recording a user action.
///
/// The log is append-only; this subsystem never mutates or deletes
/// entries. Display ordering is `created_at` descending.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ActivityEntry {
    /// Unique entry identifier.
    pub id: Uuid,
    /// The user who performed the action.
    pub user_id: Uuid,
    /// The kind of action.
    pub activity_type: ActivityKind,
    /// Human-readable description of the action.
    pub description: String,
    /// Optional scoping attribute (e.g. department or project name).
    pub department: Option<String>,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}

/// An activity entry joined with display-only derived fields.
///
/// Computed at read time during feed reconciliation; never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedActivity {
    /// Unique entry identifier.
    pub id: Uuid,
    /// The user who performed the action.
    pub user_id: Uuid,
    /// The kind of action.
    pub activity_type: ActivityKind,
    /// Human-readable description of the action.
    pub description: String,
    /// Resolved display name (sentinel if the profile lookup failed).
    pub full_name: String,
    /// Derived initials, at most two characters.
    pub initials: String,
    /// Relative time label against wall-clock now ("just now", "5m ago", ...).
    pub time_ago: String,
    /// When the action occurred.
    pub created_at: DateTime<Utc>,
}
