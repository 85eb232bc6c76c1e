//! Error types for onboarding services.

use database::DatabaseError;
use generation_core::GenerationError;
use thiserror::Error;

/// Errors that can occur while serving onboarding requests.
#[derive(Debug, Error)]
pub enum OnboardingError {
    /// Request input was missing or out of range.
    #[error("{0}")]
    Validation(String),

    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// The source for a derived artifact has nothing in it.
    #[error("{0}")]
    EmptySource(String),

    /// The generator failed, timed out, or produced nothing usable.
    #[error("generation failed: {0}")]
    Generation(#[from] GenerationError),

    /// The store rejected a read or write.
    #[error("persistence error: {0}")]
    Persistence(DatabaseError),
}

impl OnboardingError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        OnboardingError::Validation(message.into())
    }

    /// Returns true if this is an [`OnboardingError::NotFound`].
    pub fn is_not_found(&self) -> bool {
        matches!(self, OnboardingError::NotFound { .. })
    }
}

impl From<DatabaseError> for OnboardingError {
    fn from(err: DatabaseError) -> Self {
        match err {
            DatabaseError::NotFound { entity, id } => OnboardingError::NotFound { entity, id },
            other => OnboardingError::Persistence(other),
        }
    }
}

/// Result type for onboarding operations.
pub type Result<T> = std::result::Result<T, OnboardingError>;
