//! GrokGenerator implementation using the chat completions API.

use generation_core::{
    async_trait, prompt_fingerprint, GenerationError, Generator, StructuredOutput,
};
use reqwest::Client;
use tracing::{debug, info};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ResponseFormat,
};
use crate::config::GrokGeneratorConfig;

/// A generator backed by xAI's Grok chat completions API.
///
/// Every prompt is sent as a fresh single-turn conversation; the generator
/// keeps no history of its own.
pub struct GrokGenerator {
    client: Client,
    config: GrokGeneratorConfig,
    system_prompt_hash: String,
}

impl GrokGenerator {
    /// Create a new GrokGenerator with the given configuration.
    pub fn new(config: GrokGeneratorConfig) -> Result<Self, GenerationError> {
        if config.api_key.trim().is_empty() {
            return Err(GenerationError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder().build().map_err(|e| {
            GenerationError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;

        let system_prompt_hash = prompt_fingerprint(&config.system_prompt);
        info!(
            model = %config.model,
            prompt_fingerprint = %system_prompt_hash,
            "GrokGenerator initialized"
        );

        Ok(Self {
            client,
            config,
            system_prompt_hash,
        })
    }

    /// Create a GrokGenerator from environment variables.
    ///
    /// See [`GrokGeneratorConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, GenerationError> {
        let config = GrokGeneratorConfig::from_env()?;
        Self::new(config)
    }

    /// Get the configuration.
    pub fn config(&self) -> &GrokGeneratorConfig {
        &self.config
    }

    /// Get the system prompt fingerprint.
    pub fn system_prompt_hash(&self) -> &str {
        &self.system_prompt_hash
    }

    fn build_request(&self, prompt: &str, json: bool) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(self.config.system_prompt.clone()),
                ChatMessage::user(prompt),
            ],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            response_format: (json && self.config.json_mode).then(|| ResponseFormat {
                format_type: "json_object".to_string(),
            }),
        }
    }

    /// Make a chat completion request and return the first choice's text.
    async fn complete(&self, request: ChatCompletionRequest) -> Result<String, GenerationError> {
        let url = format!("{}/v1/chat/completions", self.config.api_url.trim_end_matches('/'));

        debug!(model = %request.model, "Sending chat completion request");

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.config.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| GenerationError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiError>(&error_text)
                .map(|api_error| api_error.error.message)
                .unwrap_or(error_text);

            return Err(GenerationError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                message
            )));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            GenerationError::ProcessingFailed(format!("Failed to parse response: {}", e))
        })?;

        if let Some(usage) = &completion.usage {
            debug!(
                prompt_tokens = usage.prompt_tokens,
                completion_tokens = usage.completion_tokens,
                total_tokens = usage.total_tokens,
                "Token usage"
            );
        }

        extract_content(completion)
    }
}

/// Pull the text of the first choice out of a completion.
fn extract_content(completion: ChatCompletionResponse) -> Result<String, GenerationError> {
    completion
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or_else(|| GenerationError::ProcessingFailed("Empty completion".to_string()))
}

#[async_trait]
impl Generator for GrokGenerator {
    async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        let request = self.build_request(prompt, false);
        self.complete(request).await
    }

    async fn generate_structured(&self, prompt: &str) -> Result<StructuredOutput, GenerationError> {
        let request = self.build_request(prompt, true);
        let raw = self.complete(request).await?;
        Ok(StructuredOutput::new(raw))
    }

    fn name(&self) -> &str {
        "GrokGenerator"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generator(json_mode: bool) -> GrokGenerator {
        let config = GrokGeneratorConfig::builder()
            .api_key("test-key")
            .model("grok-test")
            .system_prompt("Be brief.")
            .json_mode(json_mode)
            .build();
        GrokGenerator::new(config).unwrap()
    }

    #[test]
    fn test_empty_api_key_rejected() {
        let result = GrokGenerator::new(GrokGeneratorConfig::default());
        assert!(matches!(result, Err(GenerationError::Configuration(_))));
    }

    #[test]
    fn test_build_request_messages() {
        let request = generator(false).build_request("How do I build?", false);
        assert_eq!(request.model, "grok-test");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.messages[0].content, "Be brief.");
        assert_eq!(request.messages[1].role, "user");
        assert_eq!(request.messages[1].content, "How do I build?");
        assert!(request.response_format.is_none());
    }

    #[test]
    fn test_json_mode_only_for_structured() {
        let gen = generator(true);
        assert!(gen.build_request("p", false).response_format.is_none());
        let format = gen.build_request("p", true).response_format.unwrap();
        assert_eq!(format.format_type, "json_object");

        // Disabled in config: never requested
        assert!(generator(false).build_request("p", true).response_format.is_none());
    }

    #[test]
    fn test_extract_content() {
        let completion: ChatCompletionResponse = serde_json::from_value(serde_json::json!({
            "id": "c1",
            "model": "grok-test",
            "choices": [{"message": {"role": "assistant", "content": "Hello"}, "finish_reason": "stop"}],
            "usage": null
        }))
        .unwrap();
        assert_eq!(extract_content(completion).unwrap(), "Hello");

        let empty: ChatCompletionResponse =
            serde_json::from_value(serde_json::json!({"choices": []})).unwrap();
        assert!(matches!(
            extract_content(empty),
            Err(GenerationError::ProcessingFailed(_))
        ));
    }

    #[test]
    fn test_generator_name_and_fingerprint() {
        let gen = generator(false);
        assert_eq!(gen.name(), "GrokGenerator");
        assert_eq!(gen.system_prompt_hash(), prompt_fingerprint("Be brief."));
    }
}
