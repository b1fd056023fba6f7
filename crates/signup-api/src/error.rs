//! Interface error types.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use signup_config::ConfigError;
use signup_relay::{RelayError, ValidationError};

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
    pub error: String,
}

/// Request-level failures, rendered as [`ErrorResponse`].
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing fields or malformed email.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Body is not a JSON signup object.
    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    /// The relay reported a failed submission.
    #[error("{0}")]
    SubmissionFailed(String),

    /// Anything else.
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::SubmissionFailed(_) | ApiError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn body(&self) -> ErrorResponse {
        let (message, error) = match self {
            ApiError::Validation(e) => (e.to_string(), "Validation Error".to_string()),
            ApiError::InvalidBody(detail) => {
                ("Invalid request body".to_string(), detail.clone())
            }
            ApiError::SubmissionFailed(message) => {
                (message.clone(), "Form submission failed".to_string())
            }
            ApiError::Internal(detail) => ("Internal server error".to_string(), detail.clone()),
        };
        ErrorResponse {
            success: false,
            message,
            error,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}

/// Failures while building the application.
#[derive(Debug, Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Relay(#[from] RelayError),

    #[error("Server error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid listen address: {0}")]
    Addr(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let err = ApiError::from(ValidationError::InvalidEmail);
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        let body = err.body();
        assert!(!body.success);
        assert_eq!(body.message, "Invalid email format");
        assert_eq!(body.error, "Validation Error");
    }

    #[test]
    fn test_submission_failure_maps_to_500() {
        let err = ApiError::SubmissionFailed("Form submission may have failed".to_string());
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = err.body();
        assert_eq!(body.message, "Form submission may have failed");
        assert_eq!(body.error, "Form submission failed");
    }

    #[test]
    fn test_internal_error_body() {
        let body = ApiError::Internal("boom".to_string()).body();
        assert_eq!(body.message, "Internal server error");
        assert_eq!(body.error, "boom");
    }

    #[test]
    fn test_invalid_body_is_bad_request() {
        let err = ApiError::InvalidBody("expected value".to_string());
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(err.body().message, "Invalid request body");
    }
}
