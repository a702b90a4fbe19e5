//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service.

use crate::config::ConfigError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use interview_coach_core::{SessionError, ValidationError};
use serde_json::json;
use uuid::Uuid;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// A rejected or impossible interview event.
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    /// A malformed request (bad multipart body, unknown field).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::Session(SessionError::Validation(e))
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Session(SessionError::Validation(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_ERROR")
            }
            ApiError::Session(SessionError::NoQuestionsGenerated) => {
                (StatusCode::SERVICE_UNAVAILABLE, "NO_QUESTIONS_GENERATED")
            }
            ApiError::Session(SessionError::UnknownQuestion(_)) => {
                (StatusCode::NOT_FOUND, "UNKNOWN_QUESTION")
            }
            ApiError::Session(_) => (StatusCode::CONFLICT, "INVALID_SESSION_STATE"),
            ApiError::SessionNotFound(_) => (StatusCode::NOT_FOUND, "SESSION_NOT_FOUND"),
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            ApiError::Config(_) | ApiError::Io(_) | ApiError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = if status.is_server_error() && status != StatusCode::SERVICE_UNAVAILABLE {
            tracing::error!("Internal error: {self:?}");
            "An internal server error occurred".to_string()
        } else {
            match &self {
                ApiError::Session(e) => e.to_string(),
                other => other.to_string(),
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message,
                "retryable": matches!(self, ApiError::Session(ref e) if e.is_retryable()),
            }
        }));

        (status, body).into_response()
    }
}
