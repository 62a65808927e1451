//! Shared domain-neutral types.

pub mod id;
