//! GitHub batch-sync configuration.

use serde::{Deserialize, Serialize};

/// GitHub sync collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GithubSyncConfig {
    /// Base URL of the GitHub REST API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Page size for paginated fetches.
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Upstream request timeout in seconds.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for GithubSyncConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            page_size: default_page_size(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_api_base() -> String {
    "https://api.github.com".to_string()
}

fn default_page_size() -> usize {
    100
}

fn default_request_timeout() -> u64 {
    30
}
