//! Credential persistence abstraction.
//!
//! The concrete SQL implementation lives in the database repository layer.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::types::{Principal, PrincipalFields, Resource, ResourceFields};
use crate::Result;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Insert or update the principal keyed by its external identifier.
    async fn upsert_principal(&self, external_id: &str, fields: PrincipalFields)
    -> Result<Principal>;

    /// Insert or update the resource keyed by its resource identifier.
    ///
    /// Token and expiry are written together in one statement.
    async fn upsert_resource(&self, resource_id: &str, fields: ResourceFields) -> Result<Resource>;

    async fn find_principal(&self, id: &str) -> Result<Option<Principal>>;

    async fn find_resource(&self, resource_id: &str) -> Result<Option<Resource>>;

    async fn list_resources(&self) -> Result<Vec<Resource>>;

    /// Remove a resource. Returns `true` when a row was removed.
    async fn delete_resource(&self, resource_id: &str) -> Result<bool>;

    /// Set the `active` flag, but only while the stored expiry still equals
    /// `expected_expiry`. Returns `true` when the row was updated.
    async fn update_resource_active(
        &self,
        resource_id: &str,
        expected_expiry: DateTime<Utc>,
        active: bool,
        observed_at: DateTime<Utc>,
    ) -> Result<bool>;
}
