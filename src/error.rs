use axum::{
    extract::rejection::{JsonRejection, PathRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

/// Error response type
#[derive(Serialize, Deserialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

/// Error type for API endpoints
///
/// Every failure a handler can produce ends up here, and `into_response` is
/// the only place a failure kind is turned into an HTTP status.
#[derive(Debug)]
pub enum ApiError {
    /// Store call failed or timed out
    OperationFailed(anyhow::Error),
    /// Request body was not valid JSON for the expected shape
    InvalidBody(String),
    /// A required body field was absent or null
    MissingField(&'static str),
    /// Path parameter could not be decoded
    InvalidPath(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            ApiError::OperationFailed(err) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("{:#}", err),
            ),
            ApiError::InvalidBody(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid request body: {}", msg),
            ),
            ApiError::MissingField(field) => (
                StatusCode::BAD_REQUEST,
                format!("{} is required", field),
            ),
            ApiError::InvalidPath(msg) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid path: {}", msg),
            ),
        };

        let body = Json(ErrorResponse {
            error: error_message,
        });

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::OperationFailed(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidPath(rejection.body_text())
    }
}
