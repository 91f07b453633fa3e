//! Database models for page-keeper.
//!
//! These models map directly to the database schema. Timestamps are stored as
//! epoch milliseconds and converted at the domain boundary.

pub mod principal;
pub mod resource;

pub use principal::*;
pub use resource::*;
