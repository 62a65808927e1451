//! Tracked GitHub repository and commit entities.

pub mod model;

pub use model::{NewTrackedCommit, NewTrackedRepository, TrackedCommit, TrackedRepository};
