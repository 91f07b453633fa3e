//! page-keeper library crate.
//!
//! Keeps a principal's page access tokens in sync with the Graph API, tracks
//! their expiry and serves the result over a small JSON API.

pub mod api;
pub mod config;
pub mod credentials;
pub mod database;
pub mod error;
pub mod logging;

pub use error::{Error, Result};
