//! Display-only enrichment helpers.
//!
//! None of these values are stored; they are recomputed against wall-clock
//! now on every reconciliation pass.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use atrium_entity::activity::{ActivityEntry, EnrichedActivity};

/// Derive up to two uppercased initials from a display name.
///
/// One initial per whitespace-separated token: `"Ada Lovelace"` → `"AL"`,
/// `"Madonna"` → `"M"`.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|token| token.chars().next())
        .take(2)
        .flat_map(|c| c.to_uppercase())
        .collect()
}

/// Relative time label for a timestamp against `now`.
///
/// Thresholds: under a minute "just now", under an hour "Nm ago", under a
/// day "Nh ago", otherwise "Nd ago". No week/month/year units.
pub fn time_ago(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - created_at).num_seconds().max(0);
    if seconds < 60 {
        "just now".to_string()
    } else if seconds < 3600 {
        format!("{}m ago", seconds / 60)
    } else if seconds < 86_400 {
        format!("{}h ago", seconds / 3600)
    } else {
        format!("{}d ago", seconds / 86_400)
    }
}

/// Join a raw entry with its resolved display name and derived fields.
///
/// A user absent from `names` gets the scope's sentinel name; initials are
/// then computed from the sentinel itself.
pub fn enrich(
    entry: ActivityEntry,
    names: &HashMap<Uuid, String>,
    sentinel: &str,
    now: DateTime<Utc>,
) -> EnrichedActivity {
    let full_name = names
        .get(&entry.user_id)
        .cloned()
        .unwrap_or_else(|| sentinel.to_string());

    EnrichedActivity {
        id: entry.id,
        user_id: entry.user_id,
        activity_type: entry.activity_type,
        description: entry.description,
        initials: initials(&full_name),
        time_ago: time_ago(entry.created_at, now),
        full_name,
        created_at: entry.created_at,
    }
}
