//! Graph API client.
//!
//! Wraps the handful of Graph endpoints needed to follow a user's pages and
//! their access tokens:
//!
//! - [`GraphClient::me`]: profile behind a user access token
//! - [`GraphClient::token_info`]: remaining lifetime of any access token
//! - [`GraphClient::accounts`]: pages administered by a user, with page tokens

mod client;
mod error;
mod models;

pub use client::{DEFAULT_BASE_URL, DEFAULT_MAX_PAGES, GraphClient, install_rustls_provider};
pub use error::GraphError;
pub use models::{PageAccount, TokenInfo, UserProfile};
