//! Onboarding services: question cache, session ledger, quizzes and guides.
//!
//! This crate provides the [`Onboarding`] service which sits between the HTTP
//! layer and the `database` and `generation-core` crates.
//!
//! # Architecture
//!
//! ```text
//! Question (session id + text)
//!          ↓
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        ONBOARDING                           │
//! │                                                             │
//! │  1. Search cached Q/A pairs (literal substring)             │
//! │         ↓                                                   │
//! │  2. Exact match?                                            │
//! │     • yes → reuse answer, bump usage                        │
//! │     • no  → generate with similar pairs as context          │
//! │         ↓                                                   │
//! │  3. One transaction: Q/A write + session turn               │
//! └─────────────────────────────────────────────────────────────┘
//!          ↓
//! Session transcript → quiz generation → grading
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use database::Database;
//! use onboarding::Onboarding;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:data/onboarding.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     let generator = Arc::new(grok_generator::GrokGenerator::from_env()?);
//!     let service = Onboarding::new(db, generator);
//!
//!     let answer = service.ask("How do I run the tests?", "session-1").await?;
//!     println!("{}", answer.answer);
//!     Ok(())
//! }
//! ```

mod architecture;
mod error;
mod guides;
mod ledger;
mod prompts;
mod quiz;
mod resolver;

pub use error::{OnboardingError, Result};
pub use ledger::ChatTranscript;
pub use quiz::{
    grade_questions, parse_quiz_questions, GradeReport, QuestionResult, SubmittedAnswer,
    DEFAULT_QUESTION_COUNT, MAX_QUESTION_COUNT,
};
pub use resolver::Answer;

use std::sync::Arc;
use std::time::{Duration, Instant};

use database::Database;
use generation_core::{with_timeout, Generator, StructuredOutput};
use tracing::{debug, warn};

/// Default upper bound on a single generation call.
pub const DEFAULT_GENERATION_TIMEOUT: Duration = Duration::from_secs(60);

/// Onboarding service over a database and a generator.
#[derive(Clone)]
pub struct Onboarding {
    /// Persistence store.
    db: Database,
    /// Backend used for answers, quizzes, guides and architecture docs.
    generator: Arc<dyn Generator>,
    /// Bound applied to every generator call.
    generation_timeout: Duration,
}

impl Onboarding {
    /// Create a service with the default generation timeout.
    pub fn new(db: Database, generator: Arc<dyn Generator>) -> Self {
        Self {
            db,
            generator,
            generation_timeout: DEFAULT_GENERATION_TIMEOUT,
        }
    }

    /// Override the generation timeout.
    pub fn with_generation_timeout(mut self, timeout: Duration) -> Self {
        self.generation_timeout = timeout;
        self
    }

    /// Get the underlying database.
    pub fn database(&self) -> &Database {
        &self.db
    }

    /// Name of the configured generator.
    pub fn generator_name(&self) -> &str {
        self.generator.name()
    }

    async fn generate_text(&self, prompt: &str) -> Result<String> {
        let started = Instant::now();
        match with_timeout(self.generation_timeout, self.generator.generate_text(prompt)).await {
            Ok(text) => {
                debug!(
                    generator = self.generator.name(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Generated text"
                );
                Ok(text)
            }
            Err(e) => {
                warn!(generator = self.generator.name(), error = %e, "Text generation failed");
                Err(e.into())
            }
        }
    }

    async fn generate_structured(&self, prompt: &str) -> Result<StructuredOutput> {
        let started = Instant::now();
        match with_timeout(
            self.generation_timeout,
            self.generator.generate_structured(prompt),
        )
        .await
        {
            Ok(output) => {
                debug!(
                    generator = self.generator.name(),
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    raw_len = output.raw().len(),
                    "Generated structured output"
                );
                Ok(output)
            }
            Err(e) => {
                warn!(generator = self.generator.name(), error = %e, "Structured generation failed");
                Err(e.into())
            }
        }
    }
}

/// Reject blank input with a validation error.
pub(crate) fn require_text<'a>(value: &'a str, message: &str) -> Result<&'a str> {
    if value.trim().is_empty() {
        Err(OnboardingError::validation(message))
    } else {
        Ok(value)
    }
}
