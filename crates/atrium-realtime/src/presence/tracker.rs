//! Presence tracker — derives the set of currently online users.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, RwLock};

use uuid::Uuid;

use atrium_core::result::AppResult;
use atrium_core::types::id::SubscriptionId;
use atrium_entity::presence::PresenceRecord;

use crate::transport::{EventFilter, RealtimeTransport, TransportEvent};

/// Tracker lifecycle states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No subscription yet (or the last subscribe attempt failed).
    Unsubscribed,
    /// Subscribe issued, acknowledgment pending.
    Subscribing,
    /// Subscribed and self-presence announced.
    Tracking,
    /// Torn down; the subscription has been released.
    Terminated,
}

/// Maintains the derived online set from a shared presence channel.
///
/// The set is rebuilt wholesale on every sync event and adjusted
/// incrementally on join/leave deltas. It is never cleared on transport
/// failure: stale-but-safe, a reconnect re-delivers a sync snapshot.
pub struct PresenceTracker {
    transport: Arc<dyn RealtimeTransport>,
    channel: String,
    online: RwLock<HashSet<Uuid>>,
    state: RwLock<TrackerState>,
    subscription_key: Mutex<Option<SubscriptionId>>,
}

impl PresenceTracker {
    /// Create a tracker bound to the shared presence channel.
    pub fn new(transport: Arc<dyn RealtimeTransport>, channel: impl Into<String>) -> Self {
        Self {
            transport,
            channel: channel.into(),
            online: RwLock::new(HashSet::new()),
            state: RwLock::new(TrackerState::Unsubscribed),
            subscription_key: Mutex::new(None),
        }
    }

    /// Activate for an authenticated identity: join the presence channel,
    /// announce self-presence exactly once, and start the event loop.
    pub async fn start(self: Arc<Self>, user_id: Uuid) -> AppResult<()> {
        *self.state.write().unwrap() = TrackerState::Subscribing;

        let mut subscription = match self
            .transport
            .subscribe(&self.channel, EventFilter::presence())
            .await
        {
            Ok(sub) => sub,
            Err(e) => {
                tracing::warn!(error = %e, channel = %self.channel, "presence subscribe failed");
                *self.state.write().unwrap() = TrackerState::Unsubscribed;
                return Err(e);
            }
        };

        // The tracker only reports Tracking once self-presence is
        // actually announced; a failed announce rolls the subscription
        // back instead of leaving a half-started tracker.
        if let Err(e) = self
            .transport
            .track(
                &self.channel,
                subscription.id(),
                PresenceRecord::now(user_id),
            )
            .await
        {
            tracing::warn!(error = %e, channel = %self.channel, "presence announce failed");
            let _ = self
                .transport
                .unsubscribe(&self.channel, subscription.id())
                .await;
            *self.state.write().unwrap() = TrackerState::Unsubscribed;
            return Err(e);
        }

        *self.subscription_key.lock().unwrap() = Some(subscription.id());
        *self.state.write().unwrap() = TrackerState::Tracking;

        let tracker = Arc::clone(&self);
        tokio::spawn(async move {
            while let Some(event) = subscription.recv().await {
                tracker.apply(&event);
            }
            // Stream closed. The online set is intentionally left as-is;
            // a reconnect re-issues sync and self-announces again.
            tracing::debug!(channel = %tracker.channel, "presence event stream closed");
        });

        Ok(())
    }

    /// Apply a single transport event to the online set.
    pub fn apply(&self, event: &TransportEvent) {
        match event {
            TransportEvent::PresenceSync { state } => {
                let flattened: HashSet<Uuid> = state
                    .values()
                    .flat_map(|records| records.iter().map(|r| r.user_id))
                    .collect();
                *self.online.write().unwrap() = flattened;
            }
            TransportEvent::PresenceJoin { joins } => {
                let mut online = self.online.write().unwrap();
                online.extend(joins.iter().map(|r| r.user_id));
            }
            TransportEvent::PresenceLeave { leaves } => {
                let mut online = self.online.write().unwrap();
                for record in leaves {
                    online.remove(&record.user_id);
                }
            }
            TransportEvent::Insert { .. } => {}
        }
    }

    /// Whether at least one connection for the user is currently present.
    pub fn is_online(&self, user_id: Uuid) -> bool {
        self.online.read().unwrap().contains(&user_id)
    }

    /// Snapshot of all online user ids.
    pub fn online_users(&self) -> HashSet<Uuid> {
        self.online.read().unwrap().clone()
    }

    /// Number of distinct online users.
    pub fn online_count(&self) -> usize {
        self.online.read().unwrap().len()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> TrackerState {
        *self.state.read().unwrap()
    }

    /// Tear down: release the subscription (idempotent) and terminate.
    pub async fn stop(&self) {
        let key = self.subscription_key.lock().unwrap().take();
        if let Some(key) = key {
            if let Err(e) = self.transport.unsubscribe(&self.channel, key).await {
                tracing::warn!(error = %e, channel = %self.channel, "presence unsubscribe failed");
            }
        }
        *self.state.write().unwrap() = TrackerState::Terminated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::{LocalTransport, PresenceState};

    fn tracker() -> PresenceTracker {
        PresenceTracker::new(Arc::new(LocalTransport::new(16)), "online-users")
    }

    fn record(user_id: Uuid) -> PresenceRecord {
        PresenceRecord::now(user_id)
    }

    fn sync_event(lists: Vec<Vec<Uuid>>) -> TransportEvent {
        let state: PresenceState = lists
            .into_iter()
            .map(|users| {
                (
                    SubscriptionId::new(),
                    users.into_iter().map(record).collect(),
                )
            })
            .collect();
        TransportEvent::PresenceSync { state }
    }

    #[test]
    fn test_sync_replaces_wholesale() {
        let tracker = tracker();
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        tracker.apply(&sync_event(vec![vec![a], vec![b]]));
        assert!(tracker.is_online(a));
        assert!(tracker.is_online(b));

        // A later sync without `a` must not accumulate.
        tracker.apply(&sync_event(vec![vec![b, c]]));
        assert!(!tracker.is_online(a));
        assert!(tracker.is_online(b));
        assert!(tracker.is_online(c));
        assert_eq!(tracker.online_count(), 2);
    }

    #[test]
    fn test_sync_flattens_multiple_records_per_user() {
        let tracker = tracker();
        let a = Uuid::new_v4();

        // Two tabs, two keys, one user.
        tracker.apply(&sync_event(vec![vec![a], vec![a]]));
        assert!(tracker.is_online(a));
        assert_eq!(tracker.online_count(), 1);
    }

    #[test]
    fn test_join_is_idempotent_union() {
        let tracker = tracker();
        let a = Uuid::new_v4();

        tracker.apply(&TransportEvent::PresenceJoin {
            joins: vec![record(a)],
        });
        tracker.apply(&TransportEvent::PresenceJoin {
            joins: vec![record(a)],
        });
        assert!(tracker.is_online(a));
        assert_eq!(tracker.online_count(), 1);
    }

    #[test]
    fn test_leave_of_non_member_is_noop() {
        let tracker = tracker();
        let (a, stranger) = (Uuid::new_v4(), Uuid::new_v4());

        tracker.apply(&TransportEvent::PresenceJoin {
            joins: vec![record(a)],
        });
        tracker.apply(&TransportEvent::PresenceLeave {
            leaves: vec![record(stranger)],
        });
        assert!(tracker.is_online(a));
        assert_eq!(tracker.online_count(), 1);
    }

    #[test]
    fn test_leave_removes_member() {
        let tracker = tracker();
        let a = Uuid::new_v4();

        tracker.apply(&TransportEvent::PresenceJoin {
            joins: vec![record(a)],
        });
        tracker.apply(&TransportEvent::PresenceLeave {
            leaves: vec![record(a)],
        });
        assert!(!tracker.is_online(a));
    }

    struct RejectingAnnounce {
        inner: LocalTransport,
    }

    #[async_trait::async_trait]
    impl RealtimeTransport for RejectingAnnounce {
        async fn subscribe(
            &self,
            channel: &str,
            filters: Vec<EventFilter>,
        ) -> AppResult<crate::transport::Subscription> {
            self.inner.subscribe(channel, filters).await
        }

        async fn track(
            &self,
            _channel: &str,
            _key: SubscriptionId,
            _record: PresenceRecord,
        ) -> AppResult<()> {
            Err(atrium_core::AppError::transport("announce rejected"))
        }

        async fn unsubscribe(&self, channel: &str, key: SubscriptionId) -> AppResult<()> {
            self.inner.unsubscribe(channel, key).await
        }

        async fn publish_insert(&self, channel: &str, table: &str) -> AppResult<()> {
            self.inner.publish_insert(channel, table).await
        }
    }

    #[tokio::test]
    async fn test_failed_announce_rolls_back_to_unsubscribed() {
        let transport = Arc::new(RejectingAnnounce {
            inner: LocalTransport::new(16),
        });
        let tracker = Arc::new(PresenceTracker::new(
            Arc::clone(&transport) as Arc<dyn RealtimeTransport>,
            "online-users",
        ));

        assert!(Arc::clone(&tracker).start(Uuid::new_v4()).await.is_err());
        assert_eq!(tracker.state(), TrackerState::Unsubscribed);
        assert_eq!(tracker.online_count(), 0);
        // The rollback released the subscription too.
        assert_eq!(transport.inner.channel_count(), 0);
    }

    #[tokio::test]
    async fn test_start_announces_self() {
        let transport = Arc::new(LocalTransport::new(16));
        let tracker = Arc::new(PresenceTracker::new(
            Arc::clone(&transport) as Arc<dyn RealtimeTransport>,
            "online-users",
        ));
        let me = Uuid::new_v4();

        Arc::clone(&tracker).start(me).await.unwrap();
        assert_eq!(tracker.state(), TrackerState::Tracking);

        // The self-announce round-trips through the transport.
        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(tracker.is_online(me));

        tracker.stop().await;
        assert_eq!(tracker.state(), TrackerState::Terminated);
    }
}
