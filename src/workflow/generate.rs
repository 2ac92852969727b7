//! Documentation generation step.
//!
//! The generator keeps one conversation for the whole run so rewrites see the
//! original product information and every earlier draft.

use std::sync::Arc;

use crate::ai::{ChatGateway, Conversation};

use super::prompts::{product_info_message, revision_message, GENERATE_SYSTEM_PROMPT};
use super::{StepContext, WorkflowError, WorkflowEvent};

/// Proofreader feedback handed back to the generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevisionRequest {
    pub explanation: String,
    /// Suggestions joined one per line
    pub suggestions: String,
}

/// Turns product information into documentation drafts.
pub struct DocumentationGenerator {
    gateway: Arc<dyn ChatGateway>,
    conversation: Conversation,
}

impl DocumentationGenerator {
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self { gateway, conversation: Conversation::new() }
    }

    /// Write the first draft from product information.
    ///
    /// Emits `DocGenerated` with the draft.
    pub async fn generate(
        &mut self,
        product_info: &str,
        ctx: &StepContext,
    ) -> Result<String, WorkflowError> {
        tracing::info!(step = "generate", "Generating documentation for product information");

        let draft = self.exchange(product_info_message(product_info)).await?;
        ctx.emit(WorkflowEvent::DocGenerated { draft: draft.clone() })?;
        Ok(draft)
    }

    /// Rewrite the latest draft using proofreader feedback.
    ///
    /// Emits `DocGenerated` with the new draft.
    pub async fn apply_suggestions(
        &mut self,
        request: &RevisionRequest,
        ctx: &StepContext,
    ) -> Result<String, WorkflowError> {
        tracing::info!(step = "generate", "Rewriting documentation with suggestions");

        let message = revision_message(&request.suggestions, &request.explanation);
        let draft = self.exchange(message).await?;
        ctx.emit(WorkflowEvent::DocGenerated { draft: draft.clone() })?;
        Ok(draft)
    }

    /// The conversation so far.
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    // Appends one user message and, on success, one assistant reply.
    async fn exchange(&mut self, user_message: String) -> Result<String, WorkflowError> {
        if self.conversation.is_empty() {
            self.conversation.add_system_message(GENERATE_SYSTEM_PROMPT);
        }
        self.conversation.add_user_message(user_message);

        let reply = self.gateway.send(self.conversation.messages(), None).await?;
        self.conversation.add_assistant_message(reply.clone());

        tracing::debug!(
            step = "generate",
            messages = self.conversation.len(),
            chars = reply.len(),
            "Draft received"
        );
        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{ChatRole, GatewayError, ScriptedGateway};
    use std::time::Duration;

    #[tokio::test]
    async fn test_generate_initializes_conversation() {
        let gateway = Arc::new(ScriptedGateway::new().reply("Draft one"));
        let mut generator = DocumentationGenerator::new(gateway.clone());
        let (ctx, mut rx) = StepContext::channel();

        let draft = generator.generate("LEDs and coffee", &ctx).await.unwrap();
        assert_eq!(draft, "Draft one");

        let messages = generator.conversation().messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, ChatRole::System);
        assert_eq!(messages[1].content, "Product Information:\nLEDs and coffee");
        assert_eq!(messages[2].role, ChatRole::Assistant);

        assert_eq!(rx.recv().await.unwrap(), WorkflowEvent::DocGenerated { draft: "Draft one".into() });
    }

    #[tokio::test]
    async fn test_apply_suggestions_extends_same_conversation() {
        let gateway = Arc::new(ScriptedGateway::new().reply("Draft one").reply("Draft two"));
        let mut generator = DocumentationGenerator::new(gateway.clone());
        let (ctx, _rx) = StepContext::channel();

        generator.generate("info", &ctx).await.unwrap();
        let before = generator.conversation().len();

        let request = RevisionRequest {
            explanation: "Spelling error".into(),
            suggestions: "Fix typo".into(),
        };
        let draft = generator.apply_suggestions(&request, &ctx).await.unwrap();

        assert_eq!(draft, "Draft two");
        assert_eq!(generator.conversation().len(), before + 2);

        // The rewrite request carries the whole history plus the feedback
        let calls = gateway.calls();
        let sent = &calls[1].messages;
        assert_eq!(sent.len(), before + 1);
        assert_eq!(sent[2].content, "Draft one");
        let feedback = &sent.last().unwrap().content;
        assert!(feedback.contains("Fix typo"));
        assert!(feedback.contains("Spelling error"));
    }

    #[tokio::test]
    async fn test_generate_failure_does_not_emit() {
        let gateway = Arc::new(ScriptedGateway::new().fail(GatewayError::Timeout(Duration::from_secs(120))));
        let mut generator = DocumentationGenerator::new(gateway);
        let (ctx, mut rx) = StepContext::channel();

        let err = generator.generate("info", &ctx).await.unwrap_err();
        assert!(matches!(err, WorkflowError::Gateway(GatewayError::Timeout(_))));
        assert!(rx.try_recv().is_err());
    }
}
