use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use devpulse_github::GithubError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error type
///
/// Only total computation failures reach this type: per-repository fetch
/// failures and calendar fallbacks are recovered before a handler returns.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("GitHub error: {0}")]
    Github(#[from] GithubError),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Error response JSON structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match &self {
            ApiError::Github(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "github_error",
                e.to_string(),
            ),
            ApiError::InvalidPayload(msg) => (StatusCode::BAD_REQUEST, "invalid_payload", msg.clone()),
            ApiError::InvalidSignature(msg) => {
                (StatusCode::UNAUTHORIZED, "invalid_signature", msg.clone())
            }
            ApiError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                msg.clone(),
            ),
        };

        let error_response = ErrorResponse {
            error: error_type.to_string(),
            message,
        };

        (status, Json(error_response)).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        ApiError::InvalidPayload(e.to_string())
    }
}
