//! Resource synchronization.

use futures::{StreamExt, TryStreamExt, stream};
use tracing::{info, instrument, warn};

use super::authority::OwnedResource;
use super::context::SyncContext;
use super::error::SyncError;
use super::locks::resource_key;
use super::types::{Resource, ResourceView};

/// Default number of resources reconciled in parallel within one sync.
pub const DEFAULT_SYNC_CONCURRENCY: usize = 4;

/// Reconciles a principal's resources against the authority.
#[derive(Clone)]
pub struct Synchronizer {
    ctx: SyncContext,
    concurrency: usize,
}

impl Synchronizer {
    pub fn new(ctx: SyncContext, concurrency: usize) -> Self {
        Self {
            ctx,
            concurrency: concurrency.max(1),
        }
    }

    /// List the principal's resources and upsert each with a fresh expiry.
    ///
    /// A failing list call fails the whole operation before anything is written.
    /// A failing lifetime query skips only that resource and leaves its stored
    /// record untouched. Results keep the authority's listing order.
    #[instrument(skip(self))]
    pub async fn sync_resources(&self, principal_id: &str) -> Result<Vec<ResourceView>, SyncError> {
        let principal = self.ctx.load_principal(principal_id).await?;

        let listed = self
            .ctx
            .authority
            .list_owned_resources(&principal.credential)
            .await
            .inspect_err(|e| warn!(error = %e, "Listing resources failed"))?;
        let listed_count = listed.len();

        let reconciled: Vec<Option<Resource>> = stream::iter(listed)
            .map(|entry| {
                let this = self.clone();
                let owner = principal.id.clone();
                async move { this.reconcile_listed(&owner, entry).await }
            })
            .buffered(self.concurrency)
            .try_collect()
            .await?;

        let now = self.ctx.clock.now();
        let views: Vec<ResourceView> = reconciled
            .iter()
            .flatten()
            .map(|resource| ResourceView::from_resource(resource, now))
            .collect();

        info!(
            listed = listed_count,
            synced = views.len(),
            "Resources synchronized"
        );
        Ok(views)
    }

    /// Reconcile one listed resource under its lock.
    ///
    /// `Ok(None)` when the authority could not report the credential's lifetime.
    async fn reconcile_listed(
        &self,
        owner: &str,
        entry: OwnedResource,
    ) -> Result<Option<Resource>, SyncError> {
        let _guard = self.ctx.locks.lock(&resource_key(&entry.resource_id)).await;
        match self.ctx.reconcile(owner, &entry).await {
            Ok(resource) => Ok(Some(resource)),
            Err(SyncError::AuthorityUnavailable(reason)) => {
                warn!(
                    resource_id = %entry.resource_id,
                    %reason,
                    "Skipping resource, lifetime unavailable"
                );
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
