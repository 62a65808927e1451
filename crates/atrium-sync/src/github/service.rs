//! The sync service: request validation, fetch, and idempotent upserts.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use atrium_core::error::AppError;
use atrium_core::result::AppResult;
use atrium_entity::repo::{NewTrackedCommit, NewTrackedRepository};

use crate::store::SyncStore;

use super::client::GithubClient;
use super::types::{SyncAction, SyncOutcome, SyncRequest};

/// Handles sync requests on behalf of authenticated portal users.
pub struct GithubSyncService {
    client: GithubClient,
    store: Arc<dyn SyncStore>,
}

impl GithubSyncService {
    /// Create a new sync service.
    pub fn new(client: GithubClient, store: Arc<dyn SyncStore>) -> Self {
        Self { client, store }
    }

    /// Validate and execute a sync request.
    ///
    /// Every failure is returned as an error; the HTTP boundary maps them
    /// to a client-error status with an `{error}` body.
    pub async fn handle(&self, caller: Option<Uuid>, request: SyncRequest) -> AppResult<SyncOutcome> {
        let caller = caller.ok_or_else(|| AppError::authentication("Unauthorized"))?;

        let token = request
            .github_token
            .as_deref()
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::validation("GitHub token is required"))?;

        let action: SyncAction = request.action.parse()?;

        match action {
            SyncAction::FetchRepos => self.fetch_repos(caller, token).await,
            SyncAction::FetchCommits => {
                let full_name = request
                    .repo_full_name
                    .as_deref()
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| {
                        AppError::validation("repoFullName is required for fetchCommits")
                    })?;
                self.fetch_commits(caller, token, full_name).await
            }
        }
    }

    async fn fetch_repos(&self, caller: Uuid, token: &str) -> AppResult<SyncOutcome> {
        let repos = self.client.fetch_repos(token).await?;
        let mut count = 0;

        for repo in repos {
            self.store
                .upsert_repository(&NewTrackedRepository {
                    user_id: caller,
                    full_name: repo.full_name,
                    name: repo.name,
                    description: repo.description,
                    default_branch: repo.default_branch,
                })
                .await?;
            count += 1;
        }

        tracing::info!(%caller, count, "repository sync complete");
        Ok(SyncOutcome {
            success: true,
            count,
        })
    }

    async fn fetch_commits(
        &self,
        caller: Uuid,
        token: &str,
        full_name: &str,
    ) -> AppResult<SyncOutcome> {
        let repository = self
            .store
            .find_repository(caller, full_name)
            .await?
            .ok_or_else(|| {
                AppError::not_found(format!("Repository '{full_name}' is not tracked"))
            })?;

        let commits = self.client.fetch_commits(token, full_name).await?;
        let mut count = 0;

        for commit in commits {
            let author = commit.commit.author.as_ref();
            self.store
                .upsert_commit(&NewTrackedCommit {
                    repository_id: repository.id,
                    sha: commit.sha,
                    message: first_line(&commit.commit.message),
                    author_name: author.and_then(|a| a.name.clone()),
                    committed_at: author.and_then(|a| a.date).unwrap_or_else(Utc::now),
                })
                .await?;
            count += 1;
        }

        tracing::info!(%caller, repository = full_name, count, "commit sync complete");
        Ok(SyncOutcome {
            success: true,
            count,
        })
    }
}

/// First line of a commit message.
fn first_line(message: &str) -> String {
    message.lines().next().unwrap_or_default().to_string()
}
