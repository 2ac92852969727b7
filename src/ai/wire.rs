//! Chat completion request/response types shared by the HTTP adapters.

use reqwest::RequestBuilder;
use serde::{Deserialize, Serialize};

use super::{ChatMessage, GatewayError, ResponseSchema};

#[derive(Debug, Serialize)]
pub(super) struct ChatCompletionRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<&'a str>,
    pub messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat<'a>>,
}

#[derive(Debug, Serialize)]
pub(super) struct ResponseFormat<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    json_schema: JsonSchemaFormat<'a>,
}

#[derive(Debug, Serialize)]
struct JsonSchemaFormat<'a> {
    name: &'a str,
    schema: &'a serde_json::Value,
    strict: bool,
}

impl<'a> ResponseFormat<'a> {
    pub fn from_schema(schema: &'a ResponseSchema) -> Self {
        Self {
            kind: "json_schema",
            json_schema: JsonSchemaFormat { name: &schema.name, schema: &schema.schema, strict: true },
        }
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Send a prepared request and pull the first choice's text out of the reply.
pub(super) async fn send_completion(
    request: RequestBuilder,
    body: &ChatCompletionRequest<'_>,
) -> Result<String, GatewayError> {
    let response = request.header("Content-Type", "application/json").json(body).send().await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        return Err(GatewayError::Api { status, body });
    }

    let response: ChatCompletionResponse = response.json().await?;
    first_choice(response)
}

fn first_choice(response: ChatCompletionResponse) -> Result<String, GatewayError> {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .filter(|content| !content.is_empty())
        .ok_or(GatewayError::EmptyResponse)
}
