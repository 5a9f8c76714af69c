use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use parish_auth::AuthError;
use parish_db::StoreError;

/// Error taxonomy for the HTTP boundary. The Display string is the
/// response body; internal causes are logged and never leak.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Duplicate(String),
    #[error("Invalid email or password")]
    Authentication,
    #[error("Unauthorized")]
    Authorization,
    #[error("{0}")]
    NotFound(String),
    #[error("Internal server error")]
    Internal(#[source] anyhow::Error),
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Validation(msg.into())
    }

    pub fn duplicate(msg: impl Into<String>) -> Self {
        ApiError::Duplicate(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        ApiError::NotFound(msg.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Duplicate(_) => StatusCode::CONFLICT,
            ApiError::Authentication | ApiError::Authorization => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(cause) => {
                error!("Internal error: {:#}", cause);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate => ApiError::duplicate("Duplicate entry"),
            StoreError::NotFound => ApiError::not_found("Not found"),
            other => ApiError::Internal(other.into()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::DuplicateEmail => {
                ApiError::duplicate("User with this email already exists")
            }
            other => ApiError::Internal(other.into()),
        }
    }
}
