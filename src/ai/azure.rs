//! Azure OpenAI API integration.
//!
//! Implements the ChatGateway trait for Azure OpenAI deployments.

use async_trait::async_trait;
use reqwest::Client;

use super::wire::{send_completion, ChatCompletionRequest, ResponseFormat};
use super::{ChatGateway, ChatMessage, GatewayError, ResponseSchema};

/// Oldest API version that accepts `json_schema` response formats.
const DEFAULT_API_VERSION: &str = "2024-08-01-preview";

/// Azure OpenAI API gateway.
pub struct AzureOpenAIGateway {
    client: Client,
    endpoint: String,
    api_key: String,
    deployment: String,
    api_version: String,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl AzureOpenAIGateway {
    /// Create from explicit config values.
    pub fn from_config(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        deployment: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            deployment: deployment.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Set the API version.
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Set sampling parameters; `None` leaves the deployment default.
    pub fn with_sampling(mut self, temperature: Option<f32>, max_tokens: Option<u32>) -> Self {
        self.temperature = temperature;
        self.max_tokens = max_tokens;
        self
    }

    // {endpoint}/openai/deployments/{deployment}/chat/completions?api-version={api_version}
    fn completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

#[async_trait]
impl ChatGateway for AzureOpenAIGateway {
    async fn send(
        &self,
        conversation: &[ChatMessage],
        schema: Option<&ResponseSchema>,
    ) -> Result<String, GatewayError> {
        let body = ChatCompletionRequest {
            model: None,
            messages: conversation,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            response_format: schema.map(ResponseFormat::from_schema),
        };

        tracing::debug!(
            deployment = %self.deployment,
            messages = conversation.len(),
            structured = schema.is_some(),
            "Sending Azure OpenAI chat request"
        );

        // Azure uses api-key header, not Bearer
        let request = self.client.post(self.completions_url()).header("api-key", &self.api_key);
        send_completion(request, &body).await
    }

    fn name(&self) -> &str {
        "azure"
    }
}
