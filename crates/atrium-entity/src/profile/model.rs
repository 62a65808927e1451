//! User profile entity model.
//!
//! Profiles are owned by a separate collaborator; this subsystem only
//! performs point lookups against them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A portal user's profile.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct UserProfile {
    /// Unique profile identifier (same as the auth user id).
    pub id: Uuid,
    /// Display name.
    pub full_name: Option<String>,
    /// Department the user belongs to (e.g. `"design"`, `"engineering"`).
    pub department: Option<String>,
    /// Role within the agency.
    pub role: Option<String>,
    /// When the profile was created.
    pub created_at: DateTime<Utc>,
}
