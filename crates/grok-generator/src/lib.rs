//! xAI Grok-based generator.
//!
//! This crate provides a [`Generator`] that sends each prompt to an
//! OpenAI-compatible chat completions endpoint (xAI by default) as a
//! single-turn conversation behind a fixed system prompt.
//!
//! # Usage
//!
//! ```rust,no_run
//! use grok_generator::{Generator, GrokGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let generator = GrokGenerator::from_env()?;
//!     let answer = generator.generate_text("How do I run the test suite?").await?;
//!     println!("{}", answer);
//!     Ok(())
//! }
//! ```

mod api_types;
mod config;
mod generator;

pub use config::{GrokGeneratorConfig, GrokGeneratorConfigBuilder, DEFAULT_SYSTEM_PROMPT};
pub use generator::GrokGenerator;

// Re-export generation-core types for convenience
pub use generation_core::{async_trait, GenerationError, Generator, StructuredOutput};
