//! Authority implementations.

pub mod graph;

pub use graph::GraphAuthority;
