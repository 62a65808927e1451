//! Presence record value object.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single connection's ephemeral presence payload.
///
/// One record exists per active connection (browser tab), so a user with
/// two tabs contributes two records under two presence keys. Presence is
/// broadcast state only; it is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceRecord {
    /// The user this connection belongs to.
    pub user_id: Uuid,
    /// When this connection announced itself.
    pub online_at: DateTime<Utc>,
}

impl PresenceRecord {
    /// Create a record for a user announcing presence now.
    pub fn now(user_id: Uuid) -> Self {
        Self {
            user_id,
            online_at: Utc::now(),
        }
    }
}
