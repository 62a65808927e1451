//! # atrium-entity
//!
//! Domain entity models for Atrium Portal: activity log entries, presence
//! records, user profiles, and tracked GitHub repositories/commits.

pub mod activity;
pub mod presence;
pub mod profile;
pub mod repo;
