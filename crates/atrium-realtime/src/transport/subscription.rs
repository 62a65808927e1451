//! Subscription handle returned by a transport.

use tokio::sync::mpsc;

use atrium_core::types::id::SubscriptionId;

use super::event::TransportEvent;

/// A live channel subscription.
///
/// Owns the receiving half of the event stream. The subscription id also
/// serves as this connection's presence key. Dropping the handle closes
/// the stream but does not release transport-side resources; call
/// [`RealtimeTransport::unsubscribe`](super::RealtimeTransport::unsubscribe)
/// for that.
#[derive(Debug)]
pub struct Subscription {
    id: SubscriptionId,
    channel: String,
    events: mpsc::Receiver<TransportEvent>,
}

impl Subscription {
    /// Creates a subscription handle around an event receiver.
    pub fn new(
        id: SubscriptionId,
        channel: String,
        events: mpsc::Receiver<TransportEvent>,
    ) -> Self {
        Self {
            id,
            channel,
            events,
        }
    }

    /// The subscription identifier (doubles as the presence key).
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// The channel this subscription is attached to.
    pub fn channel(&self) -> &str {
        &self.channel
    }

    /// Receive the next event; `None` once the transport side is gone.
    pub async fn recv(&mut self) -> Option<TransportEvent> {
        self.events.recv().await
    }
}
