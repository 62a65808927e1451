//! Ephemeral presence entities.

pub mod model;

pub use model::PresenceRecord;
