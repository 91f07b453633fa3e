//! Sweep route, for external schedulers.

use axum::{Json, Router, extract::State, routing::post};

use crate::api::error::ApiResult;
use crate::api::models::SweepResponse;
use crate::api::server::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", post(run_sweep))
}

async fn run_sweep(State(state): State<AppState>) -> ApiResult<Json<SweepResponse>> {
    let updated_count = state.credential_service.sweep().await?;
    Ok(Json(SweepResponse {
        success: true,
        updated_count,
    }))
}
