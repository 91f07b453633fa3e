//! SQLite-backed credential record store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use crate::Result;
use crate::credentials::{
    Principal, PrincipalFields, RecordStore, Resource, ResourceFields,
};
use crate::database::models::{PrincipalDbModel, ResourceDbModel};
use crate::database::retry::retry_on_sqlite_busy;
use crate::database::time::datetime_to_ms;

/// SQLx implementation of [`RecordStore`].
#[derive(Clone)]
pub struct SqlxRecordStore {
    pool: SqlitePool,
}

impl SqlxRecordStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore for SqlxRecordStore {
    async fn upsert_principal(
        &self,
        external_id: &str,
        fields: PrincipalFields,
    ) -> Result<Principal> {
        // Only used on first insert; ON CONFLICT keeps the stored id.
        let new_id = uuid::Uuid::new_v4().to_string();
        let expiry_ms = datetime_to_ms(fields.credential_expiry);
        let observed_ms = datetime_to_ms(fields.observed_at);

        let model = retry_on_sqlite_busy("upsert_principal", || async {
            let model = sqlx::query_as::<_, PrincipalDbModel>(
                r#"
                INSERT INTO principals (
                    id, external_id, display_name, contact, credential,
                    credential_expiry, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(external_id) DO UPDATE SET
                    display_name = excluded.display_name,
                    contact = excluded.contact,
                    credential = excluded.credential,
                    credential_expiry = excluded.credential_expiry,
                    updated_at = excluded.updated_at
                RETURNING *
                "#,
            )
            .bind(&new_id)
            .bind(external_id)
            .bind(&fields.display_name)
            .bind(&fields.contact)
            .bind(&fields.credential)
            .bind(expiry_ms)
            .bind(observed_ms)
            .bind(observed_ms)
            .fetch_one(&self.pool)
            .await?;
            Ok(model)
        })
        .await?;

        Ok(model.into())
    }

    async fn upsert_resource(&self, resource_id: &str, fields: ResourceFields) -> Result<Resource> {
        let new_id = uuid::Uuid::new_v4().to_string();
        let expiry_ms = datetime_to_ms(fields.credential_expiry);
        let observed_ms = datetime_to_ms(fields.observed_at);

        let model = retry_on_sqlite_busy("upsert_resource", || async {
            let model = sqlx::query_as::<_, ResourceDbModel>(
                r#"
                INSERT INTO resources (
                    id, resource_id, principal_id, display_name, credential,
                    credential_expiry, active, created_at, updated_at
                ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
                ON CONFLICT(resource_id) DO UPDATE SET
                    principal_id = excluded.principal_id,
                    display_name = excluded.display_name,
                    credential = excluded.credential,
                    credential_expiry = excluded.credential_expiry,
                    active = excluded.active,
                    updated_at = excluded.updated_at
                RETURNING *
                "#,
            )
            .bind(&new_id)
            .bind(resource_id)
            .bind(&fields.principal_id)
            .bind(&fields.display_name)
            .bind(&fields.credential)
            .bind(expiry_ms)
            .bind(fields.active)
            .bind(observed_ms)
            .bind(observed_ms)
            .fetch_one(&self.pool)
            .await?;
            Ok(model)
        })
        .await?;

        Ok(model.into())
    }

    async fn find_principal(&self, id: &str) -> Result<Option<Principal>> {
        let model =
            sqlx::query_as::<_, PrincipalDbModel>("SELECT * FROM principals WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(model.map(Into::into))
    }

    async fn find_resource(&self, resource_id: &str) -> Result<Option<Resource>> {
        let model =
            sqlx::query_as::<_, ResourceDbModel>("SELECT * FROM resources WHERE resource_id = ?")
                .bind(resource_id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(model.map(Into::into))
    }

    async fn list_resources(&self) -> Result<Vec<Resource>> {
        let models = sqlx::query_as::<_, ResourceDbModel>(
            "SELECT * FROM resources ORDER BY created_at, resource_id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn delete_resource(&self, resource_id: &str) -> Result<bool> {
        retry_on_sqlite_busy("delete_resource", || async {
            let result = sqlx::query("DELETE FROM resources WHERE resource_id = ?")
                .bind(resource_id)
                .execute(&self.pool)
                .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }

    async fn update_resource_active(
        &self,
        resource_id: &str,
        expected_expiry: DateTime<Utc>,
        active: bool,
        observed_at: DateTime<Utc>,
    ) -> Result<bool> {
        let expected_ms = datetime_to_ms(expected_expiry);
        let observed_ms = datetime_to_ms(observed_at);

        retry_on_sqlite_busy("update_resource_active", || async {
            let result = sqlx::query(
                r#"
                UPDATE resources
                SET active = ?, updated_at = ?
                WHERE resource_id = ? AND credential_expiry = ? AND active != ?
                "#,
            )
            .bind(active)
            .bind(observed_ms)
            .bind(resource_id)
            .bind(expected_ms)
            .bind(active)
            .execute(&self.pool)
            .await?;
            Ok(result.rows_affected() > 0)
        })
        .await
    }
}
