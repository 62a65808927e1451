//! In-process transport implementation.
//!
//! Backs the server wiring and the test suite. Channels are created on
//! first subscribe and removed once their last subscriber leaves.

use std::collections::HashMap;

use async_trait::async_trait;
use dashmap::DashMap;
use tokio::sync::mpsc;

use atrium_core::error::AppError;
use atrium_core::result::AppResult;
use atrium_core::types::id::SubscriptionId;
use atrium_entity::presence::PresenceRecord;

use super::event::{EventFilter, PresenceState, TransportEvent};
use super::subscription::Subscription;
use super::transport::RealtimeTransport;

/// One subscriber's delivery state.
#[derive(Debug)]
struct Subscriber {
    filters: Vec<EventFilter>,
    sender: mpsc::Sender<TransportEvent>,
}

/// A single channel: subscribers plus the per-key presence map.
#[derive(Debug, Default)]
struct ChannelState {
    subscribers: HashMap<SubscriptionId, Subscriber>,
    presence: HashMap<SubscriptionId, Vec<PresenceRecord>>,
}

impl ChannelState {
    /// Whether any key other than `except` still holds a record for `user_id`.
    fn user_present_elsewhere(&self, user_id: uuid::Uuid, except: SubscriptionId) -> bool {
        self.presence
            .iter()
            .filter(|(key, _)| **key != except)
            .any(|(_, records)| records.iter().any(|r| r.user_id == user_id))
    }
}

/// In-process pub/sub transport.
///
/// Event delivery is best-effort: a subscriber whose buffer is full loses
/// the event (a later presence sync restores consistency), and one whose
/// receiver was dropped is pruned on the next fanout.
#[derive(Debug)]
pub struct LocalTransport {
    channels: DashMap<String, ChannelState>,
    buffer_size: usize,
}

impl LocalTransport {
    /// Creates a transport with the given per-subscriber event buffer.
    pub fn new(buffer_size: usize) -> Self {
        Self {
            channels: DashMap::new(),
            buffer_size,
        }
    }

    /// Returns the number of active channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Delivers an event to every matching subscriber on the channel.
    fn fanout(&self, channel: &str, event: TransportEvent) {
        let targets: Vec<(SubscriptionId, mpsc::Sender<TransportEvent>)> =
            match self.channels.get(channel) {
                Some(state) => state
                    .subscribers
                    .iter()
                    .filter(|(_, s)| s.filters.iter().any(|f| f.matches(&event)))
                    .map(|(id, s)| (*id, s.sender.clone()))
                    .collect(),
                None => return,
            };

        let mut dead = Vec::new();
        for (id, sender) in targets {
            match sender.try_send(event.clone()) {
                Ok(()) => {}
                Err(mpsc::error::TrySendError::Full(_)) => {
                    tracing::trace!(%id, channel, "subscriber buffer full, dropping event");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => dead.push(id),
            }
        }

        if !dead.is_empty() {
            if let Some(mut state) = self.channels.get_mut(channel) {
                for id in dead {
                    state.subscribers.remove(&id);
                }
            }
        }
    }
}

#[async_trait]
impl RealtimeTransport for LocalTransport {
    async fn subscribe(
        &self,
        channel: &str,
        filters: Vec<EventFilter>,
    ) -> AppResult<Subscription> {
        let id = SubscriptionId::new();
        let (sender, receiver) = mpsc::channel(self.buffer_size);

        let wants_sync = filters.contains(&EventFilter::PresenceSync);
        let snapshot: PresenceState = {
            let mut state = self.channels.entry(channel.to_string()).or_default();
            state.subscribers.insert(id, Subscriber { filters, sender });
            state.presence.clone()
        };

        // Subscription acknowledgment: a fresh subscriber sees the current
        // membership view without waiting for the next diff.
        if wants_sync {
            self.fanout_to(channel, id, TransportEvent::PresenceSync { state: snapshot });
        }

        tracing::debug!(%id, channel, "subscribed");
        Ok(Subscription::new(id, channel.to_string(), receiver))
    }

    async fn track(
        &self,
        channel: &str,
        key: SubscriptionId,
        record: PresenceRecord,
    ) -> AppResult<()> {
        let snapshot: PresenceState = {
            let mut state = self
                .channels
                .get_mut(channel)
                .ok_or_else(|| AppError::transport(format!("unknown channel '{channel}'")))?;
            state.presence.insert(key, vec![record.clone()]);
            state.presence.clone()
        };

        self.fanout(
            channel,
            TransportEvent::PresenceJoin {
                joins: vec![record],
            },
        );
        self.fanout(channel, TransportEvent::PresenceSync { state: snapshot });
        Ok(())
    }

    async fn unsubscribe(&self, channel: &str, key: SubscriptionId) -> AppResult<()> {
        let (leaves, snapshot, channel_empty) = {
            let mut state = match self.channels.get_mut(channel) {
                Some(state) => state,
                None => return Ok(()),
            };
            state.subscribers.remove(&key);
            let removed = state.presence.remove(&key).unwrap_or_default();

            // Multi-key aggregation: only report a leave for users whose
            // last record just vanished. A user with another live tab is
            // not reported.
            let leaves: Vec<PresenceRecord> = removed
                .into_iter()
                .filter(|r| !state.user_present_elsewhere(r.user_id, key))
                .collect();

            (
                leaves,
                state.presence.clone(),
                state.subscribers.is_empty(),
            )
        };

        if channel_empty {
            self.channels.remove(channel);
        } else {
            if !leaves.is_empty() {
                self.fanout(channel, TransportEvent::PresenceLeave { leaves });
            }
            self.fanout(channel, TransportEvent::PresenceSync { state: snapshot });
        }

        tracing::debug!(%key, channel, "unsubscribed");
        Ok(())
    }

    async fn publish_insert(&self, channel: &str, table: &str) -> AppResult<()> {
        self.fanout(
            channel,
            TransportEvent::Insert {
                table: table.to_string(),
            },
        );
        Ok(())
    }
}

impl LocalTransport {
    /// Delivers an event to a single subscriber.
    fn fanout_to(&self, channel: &str, id: SubscriptionId, event: TransportEvent) {
        let sender = self
            .channels
            .get(channel)
            .and_then(|state| state.subscribers.get(&id).map(|s| s.sender.clone()));
        if let Some(sender) = sender {
            let _ = sender.try_send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(user_id: uuid::Uuid) -> PresenceRecord {
        PresenceRecord::now(user_id)
    }

    #[tokio::test]
    async fn test_subscriber_receives_initial_sync() {
        let transport = LocalTransport::new(16);
        let mut sub = transport
            .subscribe("online-users", EventFilter::presence())
            .await
            .unwrap();

        match sub.recv().await {
            Some(TransportEvent::PresenceSync { state }) => assert!(state.is_empty()),
            other => panic!("expected initial sync, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_leave_suppressed_while_other_tab_remains() {
        let transport = LocalTransport::new(16);
        let user = uuid::Uuid::new_v4();

        let mut observer = transport
            .subscribe("online-users", EventFilter::presence())
            .await
            .unwrap();
        let tab_a = transport
            .subscribe("online-users", EventFilter::presence())
            .await
            .unwrap();
        let tab_b = transport
            .subscribe("online-users", EventFilter::presence())
            .await
            .unwrap();

        transport
            .track("online-users", tab_a.id(), record(user))
            .await
            .unwrap();
        transport
            .track("online-users", tab_b.id(), record(user))
            .await
            .unwrap();

        // Closing one tab must not produce a leave for the user.
        transport
            .unsubscribe("online-users", tab_a.id())
            .await
            .unwrap();

        let mut saw_leave_after_first_close = false;
        let mut events_seen = 0;
        while let Ok(Some(event)) =
            tokio::time::timeout(std::time::Duration::from_millis(50), observer.recv()).await
        {
            events_seen += 1;
            if let TransportEvent::PresenceLeave { leaves } = &event {
                if leaves.iter().any(|r| r.user_id == user) {
                    saw_leave_after_first_close = true;
                }
            }
            if events_seen >= 10 {
                break;
            }
        }
        assert!(!saw_leave_after_first_close);

        // Closing the last tab does.
        transport
            .unsubscribe("online-users", tab_b.id())
            .await
            .unwrap();

        let mut saw_leave = false;
        while let Ok(Some(event)) =
            tokio::time::timeout(std::time::Duration::from_millis(50), observer.recv()).await
        {
            if let TransportEvent::PresenceLeave { leaves } = &event {
                if leaves.iter().any(|r| r.user_id == user) {
                    saw_leave = true;
                    break;
                }
            }
        }
        assert!(saw_leave);
    }

    #[tokio::test]
    async fn test_insert_delivered_only_to_matching_filter() {
        let transport = LocalTransport::new(16);
        let mut watching = transport
            .subscribe(
                "db-changes",
                vec![EventFilter::Insert {
                    table: "activity_log".to_string(),
                }],
            )
            .await
            .unwrap();
        let mut other = transport
            .subscribe(
                "db-changes",
                vec![EventFilter::Insert {
                    table: "profiles".to_string(),
                }],
            )
            .await
            .unwrap();

        transport
            .publish_insert("db-changes", "activity_log")
            .await
            .unwrap();

        match watching.recv().await {
            Some(TransportEvent::Insert { table }) => assert_eq!(table, "activity_log"),
            other => panic!("expected insert, got {other:?}"),
        }
        assert!(
            tokio::time::timeout(std::time::Duration::from_millis(50), other.recv())
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn test_unsubscribe_is_idempotent() {
        let transport = LocalTransport::new(16);
        let sub = transport
            .subscribe("online-users", EventFilter::presence())
            .await
            .unwrap();

        transport
            .unsubscribe("online-users", sub.id())
            .await
            .unwrap();
        transport
            .unsubscribe("online-users", sub.id())
            .await
            .unwrap();
        assert_eq!(transport.channel_count(), 0);
    }
}
