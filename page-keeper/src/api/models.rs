//! API request and response DTOs.

use serde::{Deserialize, Serialize};

use crate::credentials::{PrincipalView, ResourceView};

/// Request body for `POST /api/auth`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    /// Login proof (user access token) from the client SDK
    pub proof: String,
    /// External identity the client expects the proof to belong to
    #[serde(default)]
    pub external_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub principal: PrincipalView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceListResponse {
    pub resources: Vec<ResourceView>,
}

/// Request body for `POST /api/resources/{resource_id}/renew`.
#[derive(Debug, Clone, Deserialize)]
pub struct RenewRequest {
    pub principal_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenewResponse {
    pub success: bool,
    pub resource: ResourceView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepResponse {
    pub success: bool,
    pub updated_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_login_request_external_id_is_optional() {
        let req: LoginRequest = serde_json::from_str(r#"{"proof":"abc"}"#).unwrap();
        assert_eq!(req.proof, "abc");
        assert!(req.external_id.is_none());

        let req: LoginRequest =
            serde_json::from_str(r#"{"proof":"abc","external_id":"42"}"#).unwrap();
        assert_eq!(req.external_id.as_deref(), Some("42"));
    }
}
