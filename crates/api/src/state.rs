//! Application state shared across handlers.

use axum::http::HeaderMap;
use onboarding::Onboarding;

use crate::error::ApiError;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Onboarding services.
    pub service: Onboarding,
    /// Bearer token required on mutating endpoints.
    pub api_token: Option<String>,
}

impl AppState {
    /// Create new application state.
    pub fn new(service: Onboarding, api_token: Option<String>) -> Self {
        Self { service, api_token }
    }

    /// Check the bearer token when one is configured.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<(), ApiError> {
        let Some(expected) = self.api_token.as_deref() else {
            return Ok(());
        };

        let Some(value) = headers.get(axum::http::header::AUTHORIZATION) else {
            return Err(ApiError::Unauthorized);
        };

        let Ok(value) = value.to_str() else {
            return Err(ApiError::Unauthorized);
        };

        let token = value.strip_prefix("Bearer ").unwrap_or(value);
        if token != expected {
            return Err(ApiError::Unauthorized);
        }

        Ok(())
    }
}
