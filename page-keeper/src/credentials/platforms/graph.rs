//! Graph API authority.
//!
//! Delegates to the graph-client crate for the HTTP work:
//! - proof exchange: profile via `me`, lifetime via `token_info`
//! - resource listing: `me/accounts`
//! - lifetime inspection: `oauth/access_token_info`

use std::time::Duration;

use async_trait::async_trait;
use graph_client::{GraphClient, GraphError};
use tracing::{debug, instrument, warn};

use crate::credentials::authority::{
    ExchangeResult, ExchangedIdentity, ExternalAuthority, LifetimeResult, ListResult,
    OwnedResource,
};
use crate::credentials::error::{AuthorityError, AuthorityUnavailable};
use crate::error::Error;

/// [`ExternalAuthority`] backed by the Graph API.
#[derive(Clone)]
pub struct GraphAuthority {
    client: GraphClient,
}

/// During proof exchange a rejection means the proof is bad.
fn map_exchange_error(err: GraphError) -> AuthorityError {
    if err.is_rejection() {
        AuthorityError::InvalidProof(err.to_string())
    } else {
        AuthorityError::Unavailable(err.to_string())
    }
}

/// Outside the exchange every failure, rejections included, means the
/// authority could not answer for that credential.
fn map_error(err: GraphError) -> AuthorityUnavailable {
    AuthorityUnavailable(err.to_string())
}

impl GraphAuthority {
    pub fn new(client: GraphClient) -> Self {
        Self { client }
    }

    /// Build a client for `base_url`. An unusable URL is a configuration error.
    pub fn from_config(base_url: &str, timeout: Duration) -> crate::Result<Self> {
        let client = GraphClient::new(base_url, timeout)
            .map_err(|e| Error::config(format!("GRAPH_API_BASE_URL: {e}")))?;
        Ok(Self::new(client))
    }

    async fn lifetime(&self, credential: &str) -> Result<u64, GraphError> {
        let info = self.client.token_info(credential).await?;
        info.expires_in
            .ok_or_else(|| GraphError::Parse("token info carries no expires_in".to_string()))
    }
}

#[async_trait]
impl ExternalAuthority for GraphAuthority {
    #[instrument(skip_all)]
    async fn exchange_proof(&self, proof: &str) -> ExchangeResult {
        let profile = self.client.me(proof).await.map_err(|e| {
            warn!(error = %e, "Proof exchange failed");
            map_exchange_error(e)
        })?;

        let lifetime_secs = match self.lifetime(proof).await {
            Ok(secs) => secs,
            Err(GraphError::Parse(msg)) => return Err(AuthorityError::Unavailable(msg)),
            Err(e) => return Err(map_exchange_error(e)),
        };

        debug!(external_id = %profile.id, lifetime_secs, "Proof exchanged");

        Ok(ExchangedIdentity {
            external_id: profile.id,
            display_name: profile.name,
            contact: profile.email,
            credential: proof.to_string(),
            lifetime_secs,
        })
    }

    #[instrument(skip_all)]
    async fn list_owned_resources(&self, principal_credential: &str) -> ListResult {
        let accounts = self
            .client
            .accounts(principal_credential)
            .await
            .map_err(map_error)?;

        Ok(accounts
            .into_iter()
            .map(|account| OwnedResource {
                resource_id: account.id,
                display_name: account.name,
                credential: account.access_token,
            })
            .collect())
    }

    #[instrument(skip_all)]
    async fn inspect_lifetime(&self, credential: &str) -> LifetimeResult {
        self.lifetime(credential).await.map_err(map_error)
    }
}
