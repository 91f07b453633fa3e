use std::sync::OnceLock;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

use crate::error::GraphError;
use crate::models::{AccountsPage, ErrorEnvelope, PageAccount, TokenInfo, UserProfile};

pub const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v18.0";

/// Upper bound on `paging.next` hops when listing accounts.
pub const DEFAULT_MAX_PAGES: usize = 50;

const USER_AGENT: &str = concat!("graph-client/", env!("CARGO_PKG_VERSION"));

pub fn install_rustls_provider() {
    static PROVIDER_INSTALLED: OnceLock<()> = OnceLock::new();
    PROVIDER_INSTALLED.get_or_init(|| {
        if let Err(e) = rustls::crypto::aws_lc_rs::default_provider().install_default() {
            // Another crate got there first.
            debug!(existing_provider = ?e, "rustls CryptoProvider already installed");
        }
    });
}

/// Client for the Graph API.
///
/// Access tokens travel as the `access_token` query parameter and are never logged.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: Client,
    base_url: Url,
    max_pages: usize,
}

impl GraphClient {
    /// Build a client with its own HTTP connection pool and a per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, GraphError> {
        install_rustls_provider();

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(GraphError::transport)?;

        Self::with_client(http, base_url)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: Client, base_url: &str) -> Result<Self, GraphError> {
        let base_url =
            Url::parse(base_url).map_err(|e| GraphError::InvalidUrl(format!("{base_url}: {e}")))?;
        if base_url.cannot_be_a_base() {
            return Err(GraphError::InvalidUrl(base_url.to_string()));
        }

        Ok(Self {
            http,
            base_url,
            max_pages: DEFAULT_MAX_PAGES,
        })
    }

    /// Override the `paging.next` hop limit used by [`accounts`](Self::accounts).
    pub fn with_max_pages(mut self, max_pages: usize) -> Self {
        self.max_pages = max_pages.max(1);
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the profile of the user owning `access_token`.
    #[instrument(skip_all)]
    pub async fn me(&self, access_token: &str) -> Result<UserProfile, GraphError> {
        let mut url = self.endpoint("me")?;
        url.query_pairs_mut().append_pair("fields", "id,name,email");
        self.get_with_token(url, access_token).await
    }

    /// Inspect an access token and report its remaining lifetime.
    #[instrument(skip_all)]
    pub async fn token_info(&self, access_token: &str) -> Result<TokenInfo, GraphError> {
        let url = self.endpoint("oauth/access_token_info")?;
        self.get_with_token(url, access_token).await
    }

    /// List every page administered by the user owning `access_token`.
    ///
    /// Follows `paging.next` links until the last page or the hop limit.
    #[instrument(skip_all)]
    pub async fn accounts(&self, access_token: &str) -> Result<Vec<PageAccount>, GraphError> {
        let url = self.endpoint("me/accounts")?;
        let mut page: AccountsPage = self.get_with_token(url, access_token).await?;
        let mut accounts = std::mem::take(&mut page.data);
        let mut hops = 1;

        while let Some(next) = page.paging.and_then(|p| p.next) {
            if hops >= self.max_pages {
                warn!(
                    max_pages = self.max_pages,
                    fetched = accounts.len(),
                    "Account listing truncated at page limit"
                );
                break;
            }

            // `next` already carries the access token.
            let next_url =
                Url::parse(&next).map_err(|e| GraphError::InvalidUrl(format!("{e}")))?;
            let response = self
                .http
                .get(next_url)
                .send()
                .await
                .map_err(GraphError::transport)?;
            page = Self::decode(response).await?;
            accounts.append(&mut page.data);
            hops += 1;
        }

        debug!(count = accounts.len(), pages = hops, "Fetched page accounts");
        Ok(accounts)
    }

    fn endpoint(&self, path: &str) -> Result<Url, GraphError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GraphError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(path.split('/'));
        Ok(url)
    }

    async fn get_with_token<T: DeserializeOwned>(
        &self,
        url: Url,
        access_token: &str,
    ) -> Result<T, GraphError> {
        let response = self
            .http
            .get(url)
            .query(&[("access_token", access_token)])
            .send()
            .await
            .map_err(GraphError::transport)?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GraphError> {
        let status = response.status();
        let body = response.bytes().await.map_err(GraphError::transport)?;

        if !status.is_success() {
            let (code, message) = match serde_json::from_slice::<ErrorEnvelope>(&body) {
                Ok(envelope) => (
                    envelope.error.code,
                    envelope
                        .error
                        .message
                        .unwrap_or_else(|| status.to_string()),
                ),
                Err(_) => (
                    None,
                    String::from_utf8_lossy(&body).chars().take(200).collect(),
                ),
            };
            return Err(GraphError::Api {
                status,
                code,
                message,
            });
        }

        serde_json::from_slice(&body).map_err(|e| GraphError::Parse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> GraphClient {
        install_rustls_provider();
        GraphClient::with_client(Client::new(), base).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_version_segment() {
        let c = client("https://graph.facebook.com/v18.0");
        let url = c.endpoint("me/accounts").unwrap();
        assert_eq!(url.as_str(), "https://graph.facebook.com/v18.0/me/accounts");
    }

    #[test]
    fn test_endpoint_with_trailing_slash() {
        let c = client("http://127.0.0.1:8080/");
        let url = c.endpoint("oauth/access_token_info").unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8080/oauth/access_token_info");
    }

    #[test]
    fn test_rejects_non_base_url() {
        install_rustls_provider();
        let err = GraphClient::with_client(Client::new(), "mailto:someone@example.com").unwrap_err();
        assert!(matches!(err, GraphError::InvalidUrl(_)));
    }

    #[test]
    fn test_max_pages_is_at_least_one() {
        let c = client(DEFAULT_BASE_URL).with_max_pages(0);
        assert_eq!(c.max_pages, 1);
    }
}
