//! Chat completion gateway.
//!
//! Maps a conversation (and optionally a response schema) to a single model
//! response. The workflow only ever talks to the [`ChatGateway`] trait; the
//! concrete adapter is picked once from configuration and injected.
//!
//! ## Adapters
//!
//! - [`AzureOpenAIGateway`] - Azure OpenAI deployments
//! - [`OpenAIGateway`] - OpenAI and OpenAI-compatible endpoints
//! - [`ScriptedGateway`] - canned replies, for tests

mod azure;
mod conversation;
mod openai;
mod scripted;
mod wire;

pub use azure::AzureOpenAIGateway;
pub use conversation::{ChatMessage, ChatRole, Conversation};
pub use openai::OpenAIGateway;
pub use scripted::{RecordedCall, ScriptedGateway};

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::core::{AiConfig, AiProviderKind};

/// A JSON schema the model response must conform to.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseSchema {
    /// Schema name, sent to the service alongside the schema
    pub name: String,
    /// JSON Schema document
    pub schema: serde_json::Value,
}

impl ResponseSchema {
    /// Create a new response schema.
    pub fn new(name: impl Into<String>, schema: serde_json::Value) -> Self {
        Self { name: name.into(), schema }
    }
}

/// Trait for chat completion services.
#[async_trait]
pub trait ChatGateway: Send + Sync {
    /// Send the conversation and return the model's reply.
    ///
    /// When `schema` is set the service is asked for structured output; the
    /// reply is still returned as raw text and validated by the caller.
    async fn send(
        &self,
        conversation: &[ChatMessage],
        schema: Option<&ResponseSchema>,
    ) -> Result<String, GatewayError>;

    /// Get the gateway name.
    fn name(&self) -> &str;
}

/// Gateway error types.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("Chat service not configured: {0}")]
    NotConfigured(String),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("API error ({status}): {body}")]
    Api { status: u16, body: String },

    #[error("No response within {0:?}")]
    Timeout(Duration),

    #[error("No response from chat service")]
    EmptyResponse,
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Wraps a gateway so every call is bounded by a timeout.
pub struct TimedGateway<G> {
    inner: G,
    timeout: Duration,
}

impl<G: ChatGateway> TimedGateway<G> {
    /// Bound every call to `inner` by `timeout`.
    pub fn new(inner: G, timeout: Duration) -> Self {
        Self { inner, timeout }
    }
}

#[async_trait]
impl<G: ChatGateway> ChatGateway for TimedGateway<G> {
    async fn send(
        &self,
        conversation: &[ChatMessage],
        schema: Option<&ResponseSchema>,
    ) -> Result<String, GatewayError> {
        match tokio::time::timeout(self.timeout, self.inner.send(conversation, schema)).await {
            Ok(result) => result,
            Err(_) => {
                tracing::warn!(gateway = self.inner.name(), timeout = ?self.timeout, "Chat call timed out");
                Err(GatewayError::Timeout(self.timeout))
            }
        }
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Build the gateway selected by the configuration.
///
/// The returned gateway is already bounded by `config.timeout_secs`.
pub fn gateway_from_config(config: &AiConfig) -> Result<Arc<dyn ChatGateway>, GatewayError> {
    let timeout = Duration::from_secs(config.timeout_secs);

    let gateway: Arc<dyn ChatGateway> = match config.provider {
        AiProviderKind::Azure => {
            let endpoint = config.endpoint.clone().ok_or_else(|| {
                GatewayError::NotConfigured("AZURE_OPENAI_ENDPOINT not set".to_string())
            })?;
            let deployment = config.deployment.clone().ok_or_else(|| {
                GatewayError::NotConfigured("AZURE_OPENAI_DEPLOYMENT_NAME not set".to_string())
            })?;
            let api_key = config.api_key.clone().ok_or_else(|| {
                GatewayError::NotConfigured("AZURE_OPENAI_API_KEY not set".to_string())
            })?;

            let gateway = AzureOpenAIGateway::from_config(endpoint, api_key, deployment)
                .with_api_version(config.api_version.clone())
                .with_sampling(config.temperature, config.max_tokens);
            Arc::new(TimedGateway::new(gateway, timeout))
        }
        AiProviderKind::OpenAI => {
            let api_key = config.api_key.clone().ok_or_else(|| {
                GatewayError::NotConfigured("OPENAI_API_KEY not set".to_string())
            })?;

            let gateway = OpenAIGateway::from_config(api_key)
                .with_model(config.model.clone())
                .with_base_url(config.base_url.clone())
                .with_sampling(config.temperature, config.max_tokens);
            Arc::new(TimedGateway::new(gateway, timeout))
        }
    };

    tracing::debug!(gateway = gateway.name(), "Chat gateway configured");
    Ok(gateway)
}
