//! GitHub API client and sync service.

pub mod client;
pub mod service;
pub mod types;
