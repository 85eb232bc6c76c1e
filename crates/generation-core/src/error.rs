//! Error types for generation backends.

use thiserror::Error;

/// Errors that can occur while generating text.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The generator is misconfigured (missing key, bad URL, ...).
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The request could not reach the backend.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with an error or an unusable payload.
    #[error("processing failed: {0}")]
    ProcessingFailed(String),

    /// The generator is temporarily unavailable.
    #[error("generator unavailable: {0}")]
    Unavailable(String),

    /// The backend did not answer within the allotted time.
    #[error("generation timed out after {0:?}")]
    Timeout(std::time::Duration),
}
