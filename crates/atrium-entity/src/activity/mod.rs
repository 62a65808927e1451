//! Activity log entities.

pub mod kind;
pub mod model;

pub use kind::ActivityKind;
pub use model::{ActivityEntry, EnrichedActivity};
