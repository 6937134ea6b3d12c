//! API Error Types
//!
//! Error types for the dataset server and their conversion to HTTP
//! responses with appropriate status codes.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    /// Name is not a bare `*.json` file name
    #[error("Invalid dataset name: {0:?}")]
    InvalidName(String),

    #[error("Dataset not found: {0}")]
    NotFound(String),

    /// File exists but does not parse as JSON
    #[error("Dataset {name} is not valid JSON: {reason}")]
    InvalidContent { name: String, reason: String },

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
    pub request_id: String,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn status(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::InvalidName(_) => (StatusCode::BAD_REQUEST, "INVALID_NAME"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApiError::InvalidContent { .. } => (StatusCode::BAD_REQUEST, "INVALID_CONTENT"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            ApiError::Io(_) => (StatusCode::INTERNAL_SERVER_ERROR, "IO_ERROR"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();
        let request_id = uuid::Uuid::new_v4().to_string();

        if status.is_server_error() {
            tracing::error!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "API error occurred"
            );
        } else {
            tracing::debug!(
                request_id = %request_id,
                error_code = %code,
                error_message = %self,
                "Request rejected"
            );
        }

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
            request_id,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(ApiError::InvalidName("..".into()).status().0, StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("a.json".into()).status().0, StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::InvalidContent {
                name: "a.json".into(),
                reason: "eof".into()
            }
            .status()
            .1,
            "INVALID_CONTENT"
        );
    }
}
