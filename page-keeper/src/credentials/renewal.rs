//! Single-resource renewal.

use tracing::{info, instrument, warn};

use super::context::SyncContext;
use super::error::SyncError;
use super::locks::resource_key;
use super::types::ResourceView;

/// Renews one resource's credential, serialized per resource.
#[derive(Clone)]
pub struct RenewalCoordinator {
    ctx: SyncContext,
}

impl RenewalCoordinator {
    pub fn new(ctx: SyncContext) -> Self {
        Self { ctx }
    }

    /// Fetch a fresh credential for `resource_id` and store it with its new expiry.
    ///
    /// The list call, the lifetime query and the upsert all run inside the
    /// resource's critical section.
    #[instrument(skip(self))]
    pub async fn renew(
        &self,
        resource_id: &str,
        principal_id: &str,
    ) -> Result<ResourceView, SyncError> {
        let principal = self.ctx.load_principal(principal_id).await?;

        let _guard = self.ctx.locks.lock(&resource_key(resource_id)).await;

        let listed = self
            .ctx
            .authority
            .list_owned_resources(&principal.credential)
            .await?;

        let Some(entry) = listed.into_iter().find(|r| r.resource_id == resource_id) else {
            warn!("Resource no longer listed by the authority");
            return Err(SyncError::ResourceNotFoundRemotely(resource_id.to_string()));
        };

        let resource = self.ctx.reconcile(&principal.id, &entry).await?;

        info!(expiry = %resource.credential_expiry, "Resource renewed");
        Ok(ResourceView::from_resource(&resource, self.ctx.clock.now()))
    }
}
