//! Resource routes.
//!
//! | Method | Path | Action |
//! |--------|------|--------|
//! | GET | `/api/resources/{principal_id}` | sync and list a principal's resources |
//! | POST | `/api/resources/{resource_id}/renew` | renew one resource |
//! | DELETE | `/api/resources/{resource_id}` | forget one resource |

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, post},
};

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{RenewRequest, RenewResponse, ResourceListResponse, SuccessResponse};
use crate::api::server::AppState;

/// Create the resources router.
///
/// Both paths share the `{id}` segment name; its meaning depends on the route.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(sync_resources).delete(delete_resource))
        .route("/{id}/renew", post(renew_resource))
}

async fn sync_resources(
    State(state): State<AppState>,
    Path(principal_id): Path<String>,
) -> ApiResult<Json<ResourceListResponse>> {
    let resources = state
        .credential_service
        .sync_resources(&principal_id)
        .await?;
    Ok(Json(ResourceListResponse { resources }))
}

async fn renew_resource(
    State(state): State<AppState>,
    Path(resource_id): Path<String>,
    payload: Result<Json<RenewRequest>, JsonRejection>,
) -> ApiResult<Json<RenewResponse>> {
    let Json(request) = payload?;
    if request.principal_id.trim().is_empty() {
        return Err(ApiError::validation("principal_id must not be empty"));
    }

    let resource = state
        .credential_service
        .renew(&resource_id, &request.principal_id)
        .await?;
    Ok(Json(RenewResponse {
        success: true,
        resource,
    }))
}

async fn delete_resource(
    State(state): State<AppState>,
    Path(resource_id): Path<String>,
) -> ApiResult<Json<SuccessResponse>> {
    state.credential_service.delete(&resource_id).await?;
    Ok(Json(SuccessResponse { success: true }))
}
