//! Resource database model.

use sqlx::FromRow;

use crate::credentials::Resource;
use crate::database::time::ms_to_datetime;

/// Row of the `resources` table.
#[derive(Debug, Clone, FromRow)]
pub struct ResourceDbModel {
    /// Local identifier (UUID)
    pub id: String,
    /// Graph page id, unique
    pub resource_id: String,
    /// Local id of the owning principal
    pub principal_id: String,
    pub display_name: String,
    /// Page access token
    pub credential: String,
    /// Unix epoch milliseconds (UTC)
    pub credential_expiry: i64,
    pub active: bool,
    /// Unix epoch milliseconds (UTC)
    pub created_at: i64,
    /// Unix epoch milliseconds (UTC)
    pub updated_at: i64,
}

impl From<ResourceDbModel> for Resource {
    fn from(model: ResourceDbModel) -> Self {
        Self {
            id: model.id,
            resource_id: model.resource_id,
            principal_id: model.principal_id,
            display_name: model.display_name,
            credential: model.credential,
            credential_expiry: ms_to_datetime(model.credential_expiry),
            active: model.active,
            created_at: ms_to_datetime(model.created_at),
            updated_at: ms_to_datetime(model.updated_at),
        }
    }
}
