//! Prompt fingerprinting.

use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a prompt string.
///
/// Used to log which system prompt a generator runs with without logging
/// the prompt itself.
pub fn prompt_fingerprint(prompt: &str) -> String {
    Sha256::digest(prompt.as_bytes())
        .iter()
        .map(|byte| format!("{:02x}", byte))
        .collect()
}
