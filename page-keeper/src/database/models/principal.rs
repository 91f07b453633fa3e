//! Principal database model.

use sqlx::FromRow;

use crate::credentials::Principal;
use crate::database::time::ms_to_datetime;

/// Row of the `principals` table.
#[derive(Debug, Clone, FromRow)]
pub struct PrincipalDbModel {
    /// Local identifier (UUID)
    pub id: String,
    /// Graph user id, unique
    pub external_id: String,
    pub display_name: String,
    pub contact: Option<String>,
    /// User access token
    pub credential: String,
    /// Unix epoch milliseconds (UTC)
    pub credential_expiry: i64,
    /// Unix epoch milliseconds (UTC)
    pub created_at: i64,
    /// Unix epoch milliseconds (UTC)
    pub updated_at: i64,
}

impl From<PrincipalDbModel> for Principal {
    fn from(model: PrincipalDbModel) -> Self {
        Self {
            id: model.id,
            external_id: model.external_id,
            display_name: model.display_name,
            contact: model.contact,
            credential: model.credential,
            credential_expiry: ms_to_datetime(model.credential_expiry),
            created_at: ms_to_datetime(model.created_at),
            updated_at: ms_to_datetime(model.updated_at),
        }
    }
}
