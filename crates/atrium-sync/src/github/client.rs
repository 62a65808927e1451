//! Thin GitHub REST API client with pagination.

use serde::Deserialize;

use atrium_core::config::github::GithubSyncConfig;
use atrium_core::error::{AppError, ErrorKind};
use atrium_core::result::AppResult;

/// A repository as returned by `GET /user/repos`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteRepo {
    /// Full name in `owner/name` form.
    pub full_name: String,
    /// Short repository name.
    pub name: String,
    /// Repository description.
    pub description: Option<String>,
    /// Default branch name.
    pub default_branch: Option<String>,
}

/// A commit as returned by `GET /repos/{owner}/{repo}/commits`.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCommit {
    /// Commit SHA.
    pub sha: String,
    /// Nested commit detail.
    pub commit: RemoteCommitDetail,
}

/// Nested commit payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCommitDetail {
    /// Full commit message.
    pub message: String,
    /// Author information.
    pub author: Option<RemoteCommitAuthor>,
}

/// Commit author payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteCommitAuthor {
    /// Author display name.
    pub name: Option<String>,
    /// When the commit was authored.
    pub date: Option<chrono::DateTime<chrono::Utc>>,
}

/// Paginating client for the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GithubClient {
    http: reqwest::Client,
    api_base: String,
    page_size: usize,
}

impl GithubClient {
    /// Build a client from configuration.
    pub fn new(config: &GithubSyncConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
            .user_agent("atrium-portal")
            .build()
            .map_err(|e| {
                AppError::with_source(ErrorKind::Internal, "Failed to build HTTP client", e)
            })?;

        Ok(Self {
            http,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    /// Fetch all repositories visible to the token's user.
    pub async fn fetch_repos(&self, token: &str) -> AppResult<Vec<RemoteRepo>> {
        self.fetch_paginated(&format!("{}/user/repos", self.api_base), token)
            .await
    }

    /// Fetch all commits of a repository's default branch.
    pub async fn fetch_commits(&self, token: &str, full_name: &str) -> AppResult<Vec<RemoteCommit>> {
        self.fetch_paginated(&format!("{}/repos/{}/commits", self.api_base, full_name), token)
            .await
    }

    /// Follow pages until a short page signals the end.
    async fn fetch_paginated<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        token: &str,
    ) -> AppResult<Vec<T>> {
        let mut results = Vec::new();
        let mut page = 1usize;

        loop {
            let response = self
                .http
                .get(url)
                .query(&[("per_page", self.page_size), ("page", page)])
                .bearer_auth(token)
                .header("Accept", "application/vnd.github+json")
                .send()
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::ExternalService,
                        format!("GitHub request failed: {e}"),
                        e,
                    )
                })?;

            if !response.status().is_success() {
                let status = response.status();
                return Err(AppError::external_service(format!(
                    "GitHub API returned {status} for {url}"
                )));
            }

            let batch: Vec<T> = response.json().await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::ExternalService,
                    format!("Failed to decode GitHub response: {e}"),
                    e,
                )
            })?;

            let len = batch.len();
            results.extend(batch);
            if len < self.page_size {
                break;
            }
            page += 1;
        }

        tracing::debug!(url, pages = page, count = results.len(), "GitHub fetch complete");
        Ok(results)
    }
}
