//! REST API server module.
//!
//! Provides HTTP endpoints for login, resource sync and renewal, deletion and sweeps.

pub mod error;
pub mod models;
pub mod routes;
pub mod server;

pub use server::{ApiServer, ApiServerConfig, AppState};
