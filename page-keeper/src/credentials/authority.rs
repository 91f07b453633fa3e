//! External authority abstraction.
//!
//! The authority issues and inspects credentials. Every call returns a tagged
//! result; retry decisions are left to the caller.

use async_trait::async_trait;

use super::error::{AuthorityError, AuthorityUnavailable};

/// Identity and credential obtained by exchanging a login proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangedIdentity {
    pub external_id: String,
    pub display_name: String,
    pub contact: Option<String>,
    pub credential: String,
    pub lifetime_secs: u64,
}

/// A resource listed under a principal's credential.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OwnedResource {
    pub resource_id: String,
    pub display_name: String,
    pub credential: String,
}

pub type ExchangeResult = Result<ExchangedIdentity, AuthorityError>;
pub type ListResult = Result<Vec<OwnedResource>, AuthorityUnavailable>;
pub type LifetimeResult = Result<u64, AuthorityUnavailable>;

#[async_trait]
pub trait ExternalAuthority: Send + Sync {
    /// Exchange a login proof for the principal's identity and credential.
    async fn exchange_proof(&self, proof: &str) -> ExchangeResult;

    /// List resources administered under a principal credential, in authority order.
    async fn list_owned_resources(&self, principal_credential: &str) -> ListResult;

    /// Remaining lifetime of a credential, in seconds.
    async fn inspect_lifetime(&self, credential: &str) -> LifetimeResult;
}
