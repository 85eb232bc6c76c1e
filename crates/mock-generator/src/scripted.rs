//! Scripted generator implementation - replays queued responses.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use generation_core::{async_trait, GenerationError, Generator};
use tokio::sync::Mutex;

/// A queued outcome for one generation call.
#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

/// A generator that replays a fixed script of responses in order.
///
/// Every prompt it receives is recorded so tests can assert on what a
/// service asked for and how many times. Once the script is exhausted,
/// further calls fail with [`GenerationError::Unavailable`].
#[derive(Debug, Default)]
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Reply>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    /// Create a generator with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a generator that replies with each text in turn.
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let script = replies.into_iter().map(|s| Reply::Text(s.into())).collect();
        Self {
            script: Mutex::new(script),
            ..Self::default()
        }
    }

    /// Queue a successful reply.
    pub async fn push_reply(&self, text: impl Into<String>) {
        self.script.lock().await.push_back(Reply::Text(text.into()));
    }

    /// Queue a failure.
    pub async fn push_failure(&self, message: impl Into<String>) {
        self.script.lock().await.push_back(Reply::Fail(message.into()));
    }

    /// Number of generation calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// All prompts received so far, in order.
    pub async fn prompts(&self) -> Vec<String> {
        self.prompts.lock().await.clone()
    }

    /// The most recent prompt, if any.
    pub async fn last_prompt(&self) -> Option<String> {
        self.prompts.lock().await.last().cloned()
    }
}

#[async_trait]
impl Generator for ScriptedGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().await.push(prompt.to_string());

        match self.script.lock().await.pop_front() {
            Some(Reply::Text(text)) => Ok(text),
            Some(Reply::Fail(message)) => Err(GenerationError::ProcessingFailed(message)),
            None => Err(GenerationError::Unavailable("script exhausted".to_string())),
        }
    }

    fn name(&self) -> &str {
        "ScriptedGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_and_records_prompts() {
        let generator = ScriptedGenerator::with_replies(["one", "two"]);

        assert_eq!(generator.generate_text("a").await.unwrap(), "one");
        assert_eq!(generator.generate_text("b").await.unwrap(), "two");
        assert!(matches!(
            generator.generate_text("c").await,
            Err(GenerationError::Unavailable(_))
        ));

        assert_eq!(generator.calls(), 3);
        assert_eq!(generator.prompts().await, vec!["a", "b", "c"]);
        assert_eq!(generator.last_prompt().await.as_deref(), Some("c"));
    }

    #[tokio::test]
    async fn test_queued_failure() {
        let generator = ScriptedGenerator::new();
        generator.push_failure("boom").await;
        generator.push_reply("after").await;

        assert!(matches!(
            generator.generate_text("x").await,
            Err(GenerationError::ProcessingFailed(msg)) if msg == "boom"
        ));
        assert_eq!(generator.generate_text("y").await.unwrap(), "after");
    }
}
