//! Activity feed configuration.

use serde::{Deserialize, Serialize};

/// Activity feed window sizes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Window size for the global (agency-wide) feed.
    #[serde(default = "default_global_limit")]
    pub global_limit: usize,
    /// Window size for department-scoped feeds.
    #[serde(default = "default_department_limit")]
    pub department_limit: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            global_limit: default_global_limit(),
            department_limit: default_department_limit(),
        }
    }
}

fn default_global_limit() -> usize {
    10
}

fn default_department_limit() -> usize {
    15
}
