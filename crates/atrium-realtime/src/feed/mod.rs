//! Activity feed reconciliation.

pub mod enrich;
pub mod reconciler;

pub use reconciler::{ActivityFeed, FeedScope};
