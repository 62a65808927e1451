//! The transport trait consumed by presence and feed components.

use async_trait::async_trait;

use atrium_core::result::AppResult;
use atrium_core::types::id::SubscriptionId;
use atrium_entity::presence::PresenceRecord;

use super::event::EventFilter;
use super::subscription::Subscription;

/// A publish/subscribe channel transport.
///
/// Supports row-change notifications scoped to a table and ephemeral
/// per-connection presence broadcast with join/leave/sync semantics.
/// Injected into consumers explicitly; there is no ambient singleton.
#[async_trait]
pub trait RealtimeTransport: Send + Sync {
    /// Join a channel. The returned handle's receipt of events constitutes
    /// the subscription acknowledgment; subscribers with a presence-sync
    /// filter receive an initial membership snapshot immediately.
    async fn subscribe(
        &self,
        channel: &str,
        filters: Vec<EventFilter>,
    ) -> AppResult<Subscription>;

    /// Announce this connection's presence payload under its subscription
    /// key. Replaces any records previously tracked under the same key.
    async fn track(
        &self,
        channel: &str,
        key: SubscriptionId,
        record: PresenceRecord,
    ) -> AppResult<()>;

    /// Release a subscription and drop its presence records. Idempotent;
    /// unsubscribing an unknown key is a no-op.
    async fn unsubscribe(&self, channel: &str, key: SubscriptionId) -> AppResult<()>;

    /// Producer-side hook: deliver a row-insert notification to every
    /// subscriber on the channel filtered to `table`.
    async fn publish_insert(&self, channel: &str, table: &str) -> AppResult<()>;
}
