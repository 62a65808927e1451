//! # atrium-realtime
//!
//! Realtime engine for Atrium Portal. Provides:
//!
//! - A pub/sub transport abstraction with row-change notifications and
//!   ephemeral presence broadcast (join/leave/sync semantics)
//! - An in-process transport implementation for wiring and tests
//! - Presence tracking deriving the set of currently online users
//! - Activity feed reconciliation joining log entries with profile data

pub mod feed;
pub mod presence;
pub mod store;
pub mod transport;

pub use feed::{ActivityFeed, FeedScope};
pub use presence::PresenceTracker;
pub use store::{ActivityStore, ProfileStore};
pub use transport::{LocalTransport, RealtimeTransport, Subscription, TransportEvent};
