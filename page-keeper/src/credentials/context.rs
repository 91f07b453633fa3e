//! Shared dependencies of the credential operations, and the per-resource
//! reconcile step used by both sync and renewal.

use std::sync::Arc;

use tracing::debug;

use super::authority::{ExternalAuthority, OwnedResource};
use super::clock::Clock;
use super::error::SyncError;
use super::expiry::{expiry_from_lifetime, is_expired};
use super::locks::KeyedLocks;
use super::store::RecordStore;
use super::types::{Principal, Resource, ResourceFields};

#[derive(Clone)]
pub struct SyncContext {
    pub(crate) store: Arc<dyn RecordStore>,
    pub(crate) authority: Arc<dyn ExternalAuthority>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) locks: Arc<KeyedLocks>,
}

impl SyncContext {
    pub fn new(
        store: Arc<dyn RecordStore>,
        authority: Arc<dyn ExternalAuthority>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            store,
            authority,
            clock,
            locks: Arc::new(KeyedLocks::new()),
        }
    }

    pub fn locks(&self) -> &KeyedLocks {
        &self.locks
    }

    pub(crate) async fn load_principal(&self, principal_id: &str) -> Result<Principal, SyncError> {
        self.store
            .find_principal(principal_id)
            .await?
            .ok_or_else(|| SyncError::PrincipalNotFound(principal_id.to_string()))
    }

    /// Inspect the listed credential and upsert the resource.
    ///
    /// Callers hold the resource's lock.
    pub(crate) async fn reconcile(
        &self,
        principal_id: &str,
        listed: &OwnedResource,
    ) -> Result<Resource, SyncError> {
        let lifetime_secs = self.authority.inspect_lifetime(&listed.credential).await?;

        let now = self.clock.now();
        let expiry = expiry_from_lifetime(now, lifetime_secs);
        let fields = ResourceFields {
            principal_id: principal_id.to_string(),
            display_name: listed.display_name.clone(),
            credential: listed.credential.clone(),
            credential_expiry: expiry,
            active: !is_expired(expiry, now),
            observed_at: now,
        };

        let resource = self
            .store
            .upsert_resource(&listed.resource_id, fields)
            .await?;

        debug!(
            resource_id = %resource.resource_id,
            expiry = %resource.credential_expiry,
            "Resource reconciled"
        );
        Ok(resource)
    }
}
