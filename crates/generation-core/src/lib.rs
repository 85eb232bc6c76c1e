//! Core trait and types for generation backends.
//!
//! This crate provides the shared interface for every backend that
//! Onboarding Buddy uses to produce answers, guides and quizzes. It defines:
//!
//! - [`Generator`] - The trait that all generation backends implement
//! - [`StructuredOutput`] - Untrusted output expected to embed JSON
//! - [`GenerationError`] - Error types for generation
//!
//! # Example
//!
//! ```rust
//! use generation_core::{async_trait, GenerationError, Generator};
//!
//! struct Canned;
//!
//! #[async_trait]
//! impl Generator for Canned {
//!     async fn generate_text(&self, _prompt: &str) -> Result<String, GenerationError> {
//!         Ok("Run `make dev` to start the stack.".to_string())
//!     }
//!
//!     fn name(&self) -> &str {
//!         "Canned"
//!     }
//! }
//! ```

mod error;
mod prompt;
mod structured;
mod trait_def;

pub use error::GenerationError;
pub use prompt::prompt_fingerprint;
pub use structured::{extract_json_array, extract_json_object, StructuredOutput};
pub use trait_def::{with_timeout, Generator};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
