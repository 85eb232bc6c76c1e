//! Error types for the HTTP API.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use onboarding::OnboardingError;
use thiserror::Error;
use tracing::{error, warn};

/// Errors returned by route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or wrong bearer token.
    #[error("Unauthorized")]
    Unauthorized,

    /// Malformed or incomplete request.
    #[error("{0}")]
    Validation(String),

    /// Path does not name a known record.
    #[error("{0}")]
    NotFound(String),

    /// Error from the onboarding service.
    #[error(transparent)]
    Service(#[from] OnboardingError),
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    /// Status code and `kind` label for this error.
    fn classify(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
            ApiError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            ApiError::Service(err) => match err {
                OnboardingError::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
                OnboardingError::EmptySource(_) => (StatusCode::BAD_REQUEST, "empty_source"),
                OnboardingError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
                OnboardingError::Generation(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "generation_failed")
                }
                OnboardingError::Persistence(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "persistence")
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind) = self.classify();

        let message = if status.is_server_error() {
            error!(kind, error = %self, "Request failed");
            match kind {
                "generation_failed" => "Failed to generate response".to_string(),
                "persistence" => "Database error".to_string(),
                _ => "Internal server error".to_string(),
            }
        } else {
            if matches!(self, ApiError::Unauthorized) {
                warn!("Unauthorized request");
            }
            self.to_string()
        };

        let body = serde_json::json!({
            "error": message,
            "kind": kind,
        });

        (status, Json(body)).into_response()
    }
}

/// Result type for route handlers.
pub type Result<T> = std::result::Result<T, ApiError>;
