//! The Generator trait definition.

use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;

use crate::error::GenerationError;
use crate::structured::StructuredOutput;

/// A backend that turns prompts into text.
///
/// This trait is object-safe and can be used with `Arc<dyn Generator>`.
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate free-form text for a prompt.
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Generate output for a prompt that asks for JSON.
    ///
    /// The result is untrusted: callers extract the payload with
    /// [`StructuredOutput::array`] or [`StructuredOutput::object`] and must
    /// handle it being absent. The default implementation forwards to
    /// [`Generator::generate_text`].
    async fn generate_structured(&self, prompt: &str) -> Result<StructuredOutput, GenerationError> {
        let raw = self.generate_text(prompt).await?;
        Ok(StructuredOutput::new(raw))
    }

    /// Get a human-readable name for this generator.
    fn name(&self) -> &str;

    /// Check if the generator is ready to accept prompts.
    ///
    /// Default implementation always returns true.
    async fn is_ready(&self) -> bool {
        true
    }
}

/// Run a generation future, failing with [`GenerationError::Timeout`] if it
/// does not finish within `limit`.
pub async fn with_timeout<T, F>(limit: Duration, future: F) -> Result<T, GenerationError>
where
    F: Future<Output = Result<T, GenerationError>>,
{
    match tokio::time::timeout(limit, future).await {
        Ok(result) => result,
        Err(_) => Err(GenerationError::Timeout(limit)),
    }
}
