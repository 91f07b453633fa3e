//! API error handling.
//!
//! Every failure leaves the API as `{"success": false, "code": ..., "message": ...}`.

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

use crate::credentials::SyncError;

/// API error response body.
#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
}

/// API error type that can be converted to HTTP responses.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            code: code.into(),
            message: message.into(),
        }
    }

    /// Create a 400 Bad Request error.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
    }

    /// Create a 422 Unprocessable Entity error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR", message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ApiErrorResponse {
            success: false,
            code: self.code,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<SyncError> for ApiError {
    fn from(err: SyncError) -> Self {
        let code = err.kind();
        match err {
            SyncError::InvalidProof(_) => {
                ApiError::new(StatusCode::UNAUTHORIZED, code, err.to_string())
            }
            SyncError::PrincipalNotFound(_) | SyncError::ResourceNotFoundRemotely(_) => {
                ApiError::new(StatusCode::NOT_FOUND, code, err.to_string())
            }
            SyncError::AuthorityUnavailable(_) => {
                ApiError::new(StatusCode::BAD_GATEWAY, code, err.to_string())
            }
            SyncError::Store(e) => {
                tracing::error!("Store error: {}", e);
                ApiError::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    code,
                    "Database error occurred",
                )
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = Result<T, ApiError>;
