//! # atrium-database
//!
//! PostgreSQL database connection management and concrete repository
//! implementations for the Atrium Portal store seams.

pub mod connection;
pub mod repositories;

pub use connection::DatabasePool;
