//! Echo generator implementation - echoes prompts back.

use generation_core::{async_trait, GenerationError, Generator};

/// A generator that answers every prompt with the prompt itself.
///
/// Useful for asserting on the prompt a service built.
#[derive(Debug, Clone, Default)]
pub struct EchoGenerator {
    /// Optional prefix to add before the echo.
    prefix: Option<String>,
}

impl EchoGenerator {
    /// Create a new EchoGenerator with no prefix.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a new EchoGenerator with a custom prefix.
    ///
    /// # Example
    ///
    /// ```rust
    /// use mock_generator::EchoGenerator;
    ///
    /// let generator = EchoGenerator::with_prefix("Echo: ");
    /// // Will respond with "Echo: <prompt>"
    /// ```
    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
        }
    }
}

#[async_trait]
impl Generator for EchoGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        Ok(match &self.prefix {
            Some(prefix) => format!("{}{}", prefix, prompt),
            None => prompt.to_string(),
        })
    }

    fn name(&self) -> &str {
        "EchoGenerator"
    }
}
