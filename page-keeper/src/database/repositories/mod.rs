//! Repository layer for database access.

pub mod record_store;

pub use record_store::*;
