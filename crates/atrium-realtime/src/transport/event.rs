//! Transport event and filter types.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use atrium_core::types::id::SubscriptionId;
use atrium_entity::presence::PresenceRecord;

/// Full presence membership view: presence key → records tracked under it.
///
/// Each key corresponds to one connection, so a user with two tabs appears
/// under two keys.
pub type PresenceState = HashMap<SubscriptionId, Vec<PresenceRecord>>;

/// Events delivered to channel subscribers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum TransportEvent {
    /// Full membership snapshot. Replaces any derived presence state.
    PresenceSync {
        /// The channel's complete current membership view.
        state: PresenceState,
    },
    /// Presence records that were added since the last event.
    PresenceJoin {
        /// The delta of added records only.
        joins: Vec<PresenceRecord>,
    },
    /// Presence records that were removed since the last event.
    ///
    /// The transport aggregates across keys: a record appears here only
    /// when its user has no remaining record under any other key.
    PresenceLeave {
        /// The delta of removed records only.
        leaves: Vec<PresenceRecord>,
    },
    /// A row was inserted into a watched table.
    Insert {
        /// The table the insert occurred on.
        table: String,
    },
}

/// Per-subscription event filters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventFilter {
    /// Row-insert notifications scoped to a table.
    Insert {
        /// The table to watch.
        table: String,
    },
    /// Full presence membership snapshots.
    PresenceSync,
    /// Presence join deltas.
    PresenceJoin,
    /// Presence leave deltas.
    PresenceLeave,
}

impl EventFilter {
    /// Whether this filter admits the given event.
    pub fn matches(&self, event: &TransportEvent) -> bool {
        match (self, event) {
            (EventFilter::Insert { table }, TransportEvent::Insert { table: t }) => table == t,
            (EventFilter::PresenceSync, TransportEvent::PresenceSync { .. }) => true,
            (EventFilter::PresenceJoin, TransportEvent::PresenceJoin { .. }) => true,
            (EventFilter::PresenceLeave, TransportEvent::PresenceLeave { .. }) => true,
            _ => false,
        }
    }

    /// The standard filter set for a presence tracker subscription.
    pub fn presence() -> Vec<EventFilter> {
        vec![
            EventFilter::PresenceSync,
            EventFilter::PresenceJoin,
            EventFilter::PresenceLeave,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_filter_matches_table() {
        let filter = EventFilter::Insert {
            table: "activity_log".to_string(),
        };
        assert!(filter.matches(&TransportEvent::Insert {
            table: "activity_log".to_string(),
        }));
        assert!(!filter.matches(&TransportEvent::Insert {
            table: "profiles".to_string(),
        }));
    }

    #[test]
    fn test_presence_filters_ignore_inserts() {
        for filter in EventFilter::presence() {
            assert!(!filter.matches(&TransportEvent::Insert {
                table: "activity_log".to_string(),
            }));
        }
    }
}
