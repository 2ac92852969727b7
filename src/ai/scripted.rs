//! Gateway that answers from a fixed script.
//!
//! Replies are handed out in order, one per call, and every call is recorded
//! so callers can inspect exactly what was sent.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{ChatGateway, ChatMessage, GatewayError, ResponseSchema};

/// A call received by a [`ScriptedGateway`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Conversation as it was at call time
    pub messages: Vec<ChatMessage>,
    /// Name of the requested response schema, if any
    pub schema: Option<String>,
}

/// In-memory gateway with canned replies.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    replies: Mutex<VecDeque<Result<String, GatewayError>>>,
    calls: Mutex<Vec<RecordedCall>>,
    delay: Option<Duration>,
}

impl ScriptedGateway {
    /// Create a gateway with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a text reply.
    pub fn reply(self, content: impl Into<String>) -> Self {
        self.replies.lock().push_back(Ok(content.into()));
        self
    }

    /// Queue a failure.
    pub fn fail(self, error: GatewayError) -> Self {
        self.replies.lock().push_back(Err(error));
        self
    }

    /// Sleep before answering each call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// All calls received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().clone()
    }

    /// Number of calls received so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Number of replies not yet handed out.
    pub fn remaining(&self) -> usize {
        self.replies.lock().len()
    }
}

#[async_trait]
impl ChatGateway for ScriptedGateway {
    async fn send(
        &self,
        conversation: &[ChatMessage],
        schema: Option<&ResponseSchema>,
    ) -> Result<String, GatewayError> {
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        self.calls.lock().push(RecordedCall {
            messages: conversation.to_vec(),
            schema: schema.map(|s| s.name.clone()),
        });

        // An exhausted script behaves like a service that stopped answering
        self.replies.lock().pop_front().unwrap_or(Err(GatewayError::EmptyResponse))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
