//! OpenAI API integration.
//!
//! Implements the ChatGateway trait for OpenAI and OpenAI-compatible APIs.

use async_trait::async_trait;
use reqwest::Client;

use super::wire::{send_completion, ChatCompletionRequest, ResponseFormat};
use super::{ChatGateway, ChatMessage, GatewayError, ResponseSchema};

/// OpenAI API gateway.
pub struct OpenAIGateway {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl OpenAIGateway {
    /// Create from an explicit API key.
    pub fn from_config(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: "gpt-4o".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Create with a specific model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create with a custom base URL (for compatible APIs).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set sampling parameters; `None` leaves the model default.
    pub fn with_sampling(mut self, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }
}

#[async_trait]
impl ChatGateway for OpenAIGateway {
    async fn send(
        &self,
        conversation: &[ChatMessage],
        schema: Option<&ResponseSchema>,
    ) -> Result<String, GatewayError> {
        let body = ChatCompletionRequest {
            model: Some(&self.model),
            messages: conversation,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format: schema.map(ResponseFormat::from_schema),
        };

        tracing::debug!(
            model = %self.model,
            messages = conversation.len(),
            structured = schema.is_some(),
            "Sending OpenAI chat request"
        );

        let request = self
            .client
            .post(format!("{}/chat/completions", self.base_url.trim_end_matches('/')))
            .header("Authorization", format!("Bearer {}", self.api_key));
        send_completion(request, &body).await
    }

    fn name(&self) -> &str {
        "openai"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_gateway_defaults() {
        let gateway = OpenAIGateway::from_config("sk-test");
        assert_eq!(gateway.model, "gpt-4o");
        assert_eq!(gateway.base_url, "https://api.openai.com/v1");
    }

    #[test]
    fn test_openai_gateway_builders() {
        let gateway = OpenAIGateway::from_config("sk-test")
            .with_model("gpt-4o-mini")
            .with_base_url("http://localhost:8080/v1")
            .with_sampling(Some(0.2), Some(2048));
        assert_eq!(gateway.model, "gpt-4o-mini");
        assert_eq!(gateway.base_url, "http://localhost:8080/v1");
        assert_eq!(gateway.temperature, Some(0.2));
        assert_eq!(gateway.max_tokens, Some(2048));
    }
}
