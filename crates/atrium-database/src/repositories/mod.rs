//! Concrete repository implementations.

pub mod activity;
pub mod profile;
pub mod sync;

pub use activity::ActivityLogRepository;
pub use profile::ProfileRepository;
pub use sync::SyncRepository;
