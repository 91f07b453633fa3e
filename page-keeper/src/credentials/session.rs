//! Login flow.

use tracing::{info, instrument, warn};

use super::context::SyncContext;
use super::error::SyncError;
use super::expiry::expiry_from_lifetime;
use super::locks::principal_key;
use super::types::{Principal, PrincipalFields};

/// A login attempt: the proof handed over by the client, and optionally the
/// external identity the client believes it belongs to.
#[derive(Clone)]
pub struct AuthSession {
    proof: String,
    claimed_external_id: Option<String>,
}

impl AuthSession {
    pub fn new(proof: impl Into<String>) -> Self {
        Self {
            proof: proof.into(),
            claimed_external_id: None,
        }
    }

    pub fn with_claimed_id(mut self, external_id: impl Into<String>) -> Self {
        self.claimed_external_id = Some(external_id.into());
        self
    }

    pub fn claimed_external_id(&self) -> Option<&str> {
        self.claimed_external_id.as_deref()
    }
}

impl std::fmt::Debug for AuthSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthSession")
            .field("proof", &"<redacted>")
            .field("claimed_external_id", &self.claimed_external_id)
            .finish()
    }
}

/// Exchanges proofs and keeps the principal record current.
#[derive(Clone)]
pub struct Authenticator {
    ctx: SyncContext,
}

impl Authenticator {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    /// Exchange the session's proof and upsert the principal.
    #[instrument(skip_all, fields(claimed = ?session.claimed_external_id()))]
    pub async fn login(&self, session: &AuthSession) -> Result<Principal, SyncError> {
        let identity = self.ctx.authority.exchange_proof(&session.proof).await?;

        if let Some(claimed) = session.claimed_external_id()
            && claimed != identity.external_id
        {
            warn!(
                claimed,
                actual = %identity.external_id,
                "Proof belongs to a different principal"
            );
            return Err(SyncError::InvalidProof(
                "proof does not belong to the claimed principal".to_string(),
            ));
        }

        let _guard = self
            .ctx
            .locks
            .lock(&principal_key(&identity.external_id))
            .await;

        let now = self.ctx.clock.now();
        let fields = PrincipalFields {
            display_name: identity.display_name,
            contact: identity.contact,
            credential: identity.credential,
            credential_expiry: expiry_from_lifetime(now, identity.lifetime_secs),
            observed_at: now,
        };
        let principal = self
            .ctx
            .store
            .upsert_principal(&identity.external_id, fields)
            .await?;

        info!(
            principal_id = %principal.id,
            external_id = %principal.external_id,
            "Principal logged in"
        );
        Ok(principal)
    }
}
