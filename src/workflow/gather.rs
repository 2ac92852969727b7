//! Product information gathering step.

use std::sync::Arc;

use crate::ai::{ChatGateway, Conversation};

use super::prompts::{product_name_message, GATHER_SYSTEM_PROMPT};
use super::WorkflowError;

/// Produces free-text product information from a product name.
pub struct ProductInfoGatherer {
    gateway: Arc<dyn ChatGateway>,
}

impl ProductInfoGatherer {
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self { gateway }
    }

    /// Ask the chat service for information about `product_name`.
    ///
    /// One call, no retry.
    pub async fn gather(&self, product_name: &str) -> Result<String, WorkflowError> {
        tracing::info!(step = "gather", product = %product_name, "Gathering product information");

        let mut conversation = Conversation::with_system(GATHER_SYSTEM_PROMPT);
        conversation.add_user_message(product_name_message(product_name));

        let info = self.gateway.send(conversation.messages(), None).await?;

        tracing::debug!(step = "gather", chars = info.len(), "Product information gathered");
        Ok(info)
    }
}
