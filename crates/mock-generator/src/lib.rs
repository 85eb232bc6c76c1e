//! Mock generator implementations for testing.
//!
//! This crate provides mock implementations of the `Generator` trait:
//! - `EchoGenerator` - Echoes prompts back
//! - `ScriptedGenerator` - Replays queued replies and failures, recording prompts
//! - `DelayedGenerator` - Wraps another generator with artificial delay
//!
//! For real generation, use the `grok-generator` crate instead.
//!
//! # Example
//!
//! ```rust
//! use mock_generator::{Generator, ScriptedGenerator};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), mock_generator::GenerationError> {
//!     let generator = ScriptedGenerator::with_replies(["Run `make dev`."]);
//!
//!     let answer = generator.generate_text("How do I start the stack?").await?;
//!     assert_eq!(answer, "Run `make dev`.");
//!     assert_eq!(generator.calls(), 1);
//!     Ok(())
//! }
//! ```

mod delayed;
mod echo;
mod scripted;

// Re-export generation-core types for convenience
pub use generation_core::{async_trait, GenerationError, Generator, StructuredOutput};

pub use delayed::DelayedGenerator;
pub use echo::EchoGenerator;
pub use scripted::ScriptedGenerator;
