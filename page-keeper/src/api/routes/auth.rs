//! Authentication routes.
//!
//! Exchanges a client-side login proof for a stored principal.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    routing::post,
};

use crate::api::error::{ApiError, ApiResult};
use crate::api::models::{LoginRequest, LoginResponse};
use crate::api::server::AppState;
use crate::credentials::{AuthSession, PrincipalView};

/// Create the auth router.
pub fn router() -> Router<AppState> {
    Router::new().route("/", post(login))
}

/// Login with a proof issued to the client by the authority.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(request) = payload?;

    if request.proof.trim().is_empty() {
        return Err(ApiError::validation("proof must not be empty"));
    }

    let mut session = AuthSession::new(request.proof);
    if let Some(external_id) = request.external_id.filter(|id| !id.trim().is_empty()) {
        session = session.with_claimed_id(external_id);
    }

    let principal = state.credential_service.login(&session).await?;

    Ok(Json(LoginResponse {
        success: true,
        principal: PrincipalView::from(&principal),
    }))
}
