//! Core credential types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::expiry::is_expired;

/// An authenticated user of the Graph API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Local identity (UUID), stable across upserts.
    pub id: String,
    /// Graph user id; the upsert key.
    pub external_id: String,
    pub display_name: String,
    pub contact: Option<String>,
    /// User access token.
    pub credential: String,
    pub credential_expiry: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values written by a principal upsert.
#[derive(Debug, Clone)]
pub struct PrincipalFields {
    pub display_name: String,
    pub contact: Option<String>,
    pub credential: String,
    pub credential_expiry: DateTime<Utc>,
    /// Becomes `updated_at`, and `created_at` on first insert.
    pub observed_at: DateTime<Utc>,
}

/// A page administered by a principal, with its own access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// Local identity (UUID), stable across upserts.
    pub id: String,
    /// Graph page id; the upsert key.
    pub resource_id: String,
    /// Local id of the principal that last synced this page.
    pub principal_id: String,
    pub display_name: String,
    /// Page access token.
    pub credential: String,
    pub credential_expiry: DateTime<Utc>,
    /// `!is_expired(credential_expiry)` as of the last write or sweep.
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Values written by a resource upsert.
#[derive(Debug, Clone)]
pub struct ResourceFields {
    pub principal_id: String,
    pub display_name: String,
    pub credential: String,
    pub credential_expiry: DateTime<Utc>,
    pub active: bool,
    /// Becomes `updated_at`, and `created_at` on first insert.
    pub observed_at: DateTime<Utc>,
}

/// Outward view of a resource. The token itself is never exposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceView {
    pub id: String,
    pub resource_id: String,
    pub display_name: String,
    pub credential_expiry: DateTime<Utc>,
    pub active: bool,
    /// Recomputed against `now` when the view is built, never read from storage.
    pub is_expired: bool,
}

impl ResourceView {
    pub fn from_resource(resource: &Resource, now: DateTime<Utc>) -> Self {
        Self {
            id: resource.id.clone(),
            resource_id: resource.resource_id.clone(),
            display_name: resource.display_name.clone(),
            credential_expiry: resource.credential_expiry,
            active: resource.active,
            is_expired: is_expired(resource.credential_expiry, now),
        }
    }
}

/// Outward view of a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrincipalView {
    pub id: String,
    pub external_id: String,
    pub display_name: String,
    pub contact: Option<String>,
    pub credential_expiry: DateTime<Utc>,
}

impl From<&Principal> for PrincipalView {
    fn from(principal: &Principal) -> Self {
        Self {
            id: principal.id.clone(),
            external_id: principal.external_id.clone(),
            display_name: principal.display_name.clone(),
            contact: principal.contact.clone(),
            credential_expiry: principal.credential_expiry,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn resource(expiry: DateTime<Utc>, active: bool) -> Resource {
        let t0 = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap();
        Resource {
            id: "local-1".to_string(),
            resource_id: "page-1".to_string(),
            principal_id: "principal-1".to_string(),
            display_name: "Bakery".to_string(),
            credential: "secret-token".to_string(),
            credential_expiry: expiry,
            active,
            created_at: t0,
            updated_at: t0,
        }
    }

    #[test]
    fn test_view_recomputes_expiry() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();

        // Stored flag is stale; the view must not trust it.
        let view = ResourceView::from_resource(&resource(now - Duration::seconds(1), true), now);
        assert!(view.is_expired);
        assert!(view.active);

        let view = ResourceView::from_resource(&resource(now + Duration::hours(1), true), now);
        assert!(!view.is_expired);
    }

    #[test]
    fn test_view_serialization_hides_token() {
        let now = Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap();
        let view = ResourceView::from_resource(&resource(now, true), now);
        let json = serde_json::to_value(&view).unwrap();

        assert_eq!(json["resource_id"], "page-1");
        assert_eq!(json["credential_expiry"], "2026-01-02T00:00:00Z");
        assert_eq!(json["is_expired"], false);
        assert!(!json.to_string().contains("secret-token"));
    }
}
