//! Delayed generator implementation - wraps another generator with artificial delay.

use std::time::Duration;

use generation_core::{async_trait, GenerationError, Generator, StructuredOutput};
use tokio::time::sleep;

/// A generator that wraps another generator and adds artificial delay.
///
/// Useful for testing timeout handling and simulating slow backends.
pub struct DelayedGenerator<G: Generator> {
    inner: G,
    delay: Duration,
}

impl<G: Generator> DelayedGenerator<G> {
    /// Create a new DelayedGenerator wrapping the given generator with the specified delay.
    pub fn new(inner: G, delay: Duration) -> Self {
        Self { inner, delay }
    }

    /// Create a generator with a delay in milliseconds.
    pub fn with_millis(inner: G, millis: u64) -> Self {
        Self::new(inner, Duration::from_millis(millis))
    }
}

#[async_trait]
impl<G: Generator> Generator for DelayedGenerator<G> {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        sleep(self.delay).await;
        self.inner.generate_text(prompt).await
    }

    async fn generate_structured(&self, prompt: &str) -> Result<StructuredOutput, GenerationError> {
        sleep(self.delay).await;
        self.inner.generate_structured(prompt).await
    }

    fn name(&self) -> &str {
        "DelayedGenerator"
    }

    async fn is_ready(&self) -> bool {
        self.inner.is_ready().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EchoGenerator;
    use std::time::Instant;

    #[tokio::test]
    async fn test_delayed_generator() {
        let generator = DelayedGenerator::with_millis(EchoGenerator::new(), 100);

        let start = Instant::now();
        let text = generator.generate_text("test").await.unwrap();

        assert_eq!(text, "test");
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn test_generator_name() {
        let generator = DelayedGenerator::with_millis(EchoGenerator::new(), 0);
        assert_eq!(generator.name(), "DelayedGenerator");
    }
}
