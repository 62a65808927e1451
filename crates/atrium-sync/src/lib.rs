//! # atrium-sync
//!
//! GitHub batch-sync collaborator. Accepts fetch-repos / fetch-commits
//! requests from an authenticated caller, performs paginated fetches
//! against the GitHub REST API, and idempotently upserts the results
//! into the tracked repository and commit tables.
//!
//! This crate sits outside the realtime core; the feed treats its writes
//! like any other external event producer.

pub mod github;
pub mod store;

pub use github::service::GithubSyncService;
pub use github::types::{SyncAction, SyncOutcome, SyncRequest};
pub use store::SyncStore;
