//! Credential lifecycle service.
//!
//! Single entry point for login, sync, renewal, deletion and sweep.

use std::sync::Arc;

use tracing::{info, instrument};

use super::authority::ExternalAuthority;
use super::clock::Clock;
use super::context::SyncContext;
use super::error::SyncError;
use super::locks::resource_key;
use super::renewal::RenewalCoordinator;
use super::session::{AuthSession, Authenticator};
use super::store::RecordStore;
use super::sweeper::Sweeper;
use super::synchronizer::{DEFAULT_SYNC_CONCURRENCY, Synchronizer};
use super::types::{Principal, ResourceView};

/// Options for [`CredentialService`].
#[derive(Debug, Clone)]
pub struct ServiceOptions {
    /// Per-resource parallelism inside one sync.
    pub sync_concurrency: usize,
}

impl Default for ServiceOptions {
    fn default() -> Self {
        Self {
            sync_concurrency: DEFAULT_SYNC_CONCURRENCY,
        }
    }
}

#[derive(Clone)]
pub struct CredentialService {
    ctx: SyncContext,
    authenticator: Authenticator,
    synchronizer: Synchronizer,
    renewal: RenewalCoordinator,
    sweeper: Sweeper,
}

impl CredentialService {
    pub fn new(
        store: Arc<dyn RecordStore>,
        authority: Arc<dyn ExternalAuthority>,
        clock: Arc<dyn Clock>,
        options: ServiceOptions,
    ) -> Self {
        let ctx = SyncContext::new(store, authority, clock);
        Self {
            authenticator: Authenticator::new(ctx.clone()),
            synchronizer: Synchronizer::new(ctx.clone(), options.sync_concurrency),
            renewal: RenewalCoordinator::new(ctx.clone()),
            sweeper: Sweeper::new(ctx.clone()),
            ctx,
        }
    }

    pub async fn login(&self, session: &AuthSession) -> Result<Principal, SyncError> {
        self.authenticator.login(session).await
    }

    pub async fn sync_resources(&self, principal_id: &str) -> Result<Vec<ResourceView>, SyncError> {
        self.synchronizer.sync_resources(principal_id).await
    }

    pub async fn renew(
        &self,
        resource_id: &str,
        principal_id: &str,
    ) -> Result<ResourceView, SyncError> {
        self.renewal.renew(resource_id, principal_id).await
    }

    /// Remove a resource record. Succeeds whether or not it existed.
    #[instrument(skip(self))]
    pub async fn delete(&self, resource_id: &str) -> Result<(), SyncError> {
        let _guard = self.ctx.locks.lock(&resource_key(resource_id)).await;
        let removed = self.ctx.store.delete_resource(resource_id).await?;
        info!(removed, "Resource deleted");
        Ok(())
    }

    pub async fn sweep(&self) -> Result<u64, SyncError> {
        self.sweeper.sweep().await
    }

    /// Handle for the background scheduler.
    pub fn sweeper(&self) -> Sweeper {
        self.sweeper.clone()
    }

    pub fn context(&self) -> &SyncContext {
        &self.ctx
    }
}
