//! Realtime transport and presence configuration.

use serde::{Deserialize, Serialize};

/// Realtime transport configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeConfig {
    /// Name of the shared presence channel.
    #[serde(default = "default_presence_channel")]
    pub presence_channel: String,
    /// Name of the channel carrying row-change notifications.
    #[serde(default = "default_changes_channel")]
    pub changes_channel: String,
    /// Internal per-subscriber event buffer size.
    #[serde(default = "default_event_buffer")]
    pub event_buffer_size: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self {
        Self {
            presence_channel: default_presence_channel(),
            changes_channel: default_changes_channel(),
            event_buffer_size: default_event_buffer(),
        }
    }
}

fn default_presence_channel() -> String {
    "online-users".to_string()
}

fn default_changes_channel() -> String {
    "db-changes".to_string()
}

fn default_event_buffer() -> usize {
    256
}
