//! Activity kind enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The kind of action an activity log entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "activity_kind", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// A message was sent.
    Message,
    /// A project was created or updated.
    Project,
    /// A document was uploaded or edited.
    Document,
    /// A transaction was recorded.
    Transaction,
    /// A design asset was added.
    Design,
    /// A commit was synced from GitHub.
    Commit,
    /// A proposal was submitted.
    Proposal,
    /// A meeting was scheduled.
    Meeting,
    /// Anything not covered by the other kinds.
    Other,
}

impl ActivityKind {
    /// Return the kind as a lowercase string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Message => "message",
            Self::Project => "project",
            Self::Document => "document",
            Self::Transaction => "transaction",
            Self::Design => "design",
            Self::Commit => "commit",
            Self::Proposal => "proposal",
            Self::Meeting => "meeting",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ActivityKind {
    type Err = atrium_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "message" => Ok(Self::Message),
            "project" => Ok(Self::Project),
            "document" => Ok(Self::Document),
            "transaction" => Ok(Self::Transaction),
            "design" => Ok(Self::Design),
            "commit" => Ok(Self::Commit),
            "proposal" => Ok(Self::Proposal),
            "meeting" => Ok(Self::Meeting),
            "other" => Ok(Self::Other),
            _ => Err(atrium_core::AppError::validation(format!(
                "Invalid activity kind: '{s}'"
            ))),
        }
    }
}
