//! Sync request/response contract types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use atrium_core::AppError;

/// The actions the sync collaborator accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncAction {
    /// Fetch and upsert the caller's repositories.
    FetchRepos,
    /// Fetch and upsert commits for one tracked repository.
    FetchCommits,
}

impl SyncAction {
    /// Return the action in its wire form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FetchRepos => "fetchRepos",
            Self::FetchCommits => "fetchCommits",
        }
    }
}

impl fmt::Display for SyncAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SyncAction {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fetchRepos" => Ok(Self::FetchRepos),
            "fetchCommits" => Ok(Self::FetchCommits),
            _ => Err(AppError::validation(format!("Unrecognized action: '{s}'"))),
        }
    }
}

/// An incoming sync request.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    /// The requested action (`"fetchRepos"` or `"fetchCommits"`).
    pub action: String,
    /// Repository full name, required for `fetchCommits`.
    #[serde(default)]
    pub repo_full_name: Option<String>,
    /// The caller's GitHub access token.
    #[serde(default)]
    pub github_token: Option<String>,
}

/// A successful sync result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncOutcome {
    /// Always `true`; failures surface as errors instead.
    pub success: bool,
    /// Number of rows upserted.
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_wire_round_trip() {
        for action in [SyncAction::FetchRepos, SyncAction::FetchCommits] {
            assert_eq!(action.as_str().parse::<SyncAction>().unwrap(), action);
        }
    }

    #[test]
    fn test_unrecognized_action() {
        assert!("deleteRepos".parse::<SyncAction>().is_err());
    }
}
