//! Configuration for GrokGenerator.

use generation_core::GenerationError;
use std::env;
use std::path::Path;

/// Default system prompt file name.
pub const DEFAULT_PROMPT_FILE: &str = "SYSTEM_PROMPT.md";

/// Built-in instructions used when no system prompt is configured.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an expert onboarding assistant helping new developers understand the codebase.
Your responsibilities:
- Answer questions about the codebase architecture and components
- Generate step-by-step setup guides
- Explain code patterns and best practices
- Provide context-aware responses based on the actual codebase

Always be helpful, concise, and provide code examples when relevant.";

/// Configuration for GrokGenerator.
#[derive(Debug, Clone)]
pub struct GrokGeneratorConfig {
    /// API base URL.
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// System prompt sent ahead of every request.
    pub system_prompt: String,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Ask the API for JSON mode on structured prompts.
    pub json_mode: bool,
}

impl Default for GrokGeneratorConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.x.ai".to_string(),
            api_key: String::new(),
            model: "grok-4-1-fast".to_string(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            max_tokens: Some(2048),
            temperature: Some(0.7),
            json_mode: false,
        }
    }
}

impl GrokGeneratorConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `GROK_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `GROK_API_URL` - API URL (default: https://api.x.ai)
    /// - `GROK_MODEL` - Model name (default: grok-4-1-fast)
    /// - `GROK_SYSTEM_PROMPT` - System prompt (overrides prompt file)
    /// - `GROK_PROMPT_FILE` - Path to system prompt file (default: SYSTEM_PROMPT.md)
    /// - `GROK_MAX_TOKENS` - Max tokens (default: 2048)
    /// - `GROK_TEMPERATURE` - Temperature (default: 0.7)
    /// - `GROK_JSON_MODE` - Request JSON mode for structured prompts (default: false)
    ///
    /// System prompt priority:
    /// 1. `GROK_SYSTEM_PROMPT` env var (if set)
    /// 2. Contents of prompt file (if exists)
    /// 3. [`DEFAULT_SYSTEM_PROMPT`]
    pub fn from_env() -> Result<Self, GenerationError> {
        let api_key = env::var("GROK_API_KEY")
            .map_err(|_| GenerationError::Configuration("GROK_API_KEY not set".to_string()))?;

        let api_url = env::var("GROK_API_URL").unwrap_or_else(|_| "https://api.x.ai".to_string());

        let model = env::var("GROK_MODEL").unwrap_or_else(|_| "grok-4-1-fast".to_string());

        let system_prompt = match env::var("GROK_SYSTEM_PROMPT") {
            Ok(prompt) => prompt,
            Err(_) => {
                let prompt_file = env::var("GROK_PROMPT_FILE")
                    .unwrap_or_else(|_| DEFAULT_PROMPT_FILE.to_string());
                load_prompt_file(&prompt_file).unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string())
            }
        };

        let max_tokens = env::var("GROK_MAX_TOKENS")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(2048));

        let temperature = env::var("GROK_TEMPERATURE")
            .ok()
            .and_then(|v| v.parse().ok())
            .or(Some(0.7));

        let json_mode = env::var("GROK_JSON_MODE")
            .ok()
            .map(|v| v.to_lowercase() == "true" || v == "1")
            .unwrap_or(false);

        Ok(Self {
            api_url,
            api_key,
            model,
            system_prompt,
            max_tokens,
            temperature,
            json_mode,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> GrokGeneratorConfigBuilder {
        GrokGeneratorConfigBuilder::default()
    }
}

/// Builder for GrokGeneratorConfig.
#[derive(Debug, Default)]
pub struct GrokGeneratorConfigBuilder {
    config: GrokGeneratorConfig,
}

impl GrokGeneratorConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = prompt.into();
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Enable JSON mode for structured prompts.
    pub fn json_mode(mut self, enable: bool) -> Self {
        self.config.json_mode = enable;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> GrokGeneratorConfig {
        self.config
    }
}

/// Load a prompt file, returning None if not found or empty.
fn load_prompt_file(path: impl AsRef<Path>) -> Option<String> {
    let content = std::fs::read_to_string(path.as_ref()).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
