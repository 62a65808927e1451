//! Realtime transport abstraction and in-process implementation.

pub mod event;
pub mod local;
pub mod subscription;
pub mod transport;

pub use event::{EventFilter, PresenceState, TransportEvent};
pub use local::LocalTransport;
pub use subscription::Subscription;
pub use transport::RealtimeTransport;
