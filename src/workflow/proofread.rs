//! Proofreading step.

use std::sync::Arc;

use crate::ai::{ChatGateway, Conversation};

use super::prompts::PROOFREAD_SYSTEM_PROMPT;
use super::{ProofreadVerdict, StepContext, WorkflowError, WorkflowEvent};

/// Grades documentation drafts with a schema-constrained chat call.
pub struct Proofreader {
    gateway: Arc<dyn ChatGateway>,
}

impl Proofreader {
    pub fn new(gateway: Arc<dyn ChatGateway>) -> Self {
        Self { gateway }
    }

    /// Grade `draft`.
    ///
    /// Emits `DocApproved` or `DocRejected`. A reply that does not match the
    /// verdict schema fails with [`WorkflowError::Parse`] and emits nothing.
    pub async fn review(
        &self,
        draft: &str,
        ctx: &StepContext,
    ) -> Result<ProofreadVerdict, WorkflowError> {
        tracing::info!(step = "proofread", "Proofreading product documentation");

        let mut conversation = Conversation::with_system(PROOFREAD_SYSTEM_PROMPT);
        conversation.add_user_message(draft);

        let schema = ProofreadVerdict::response_schema();
        let raw = self.gateway.send(conversation.messages(), Some(&schema)).await?;
        let verdict = ProofreadVerdict::parse(&raw).inspect_err(|e| {
            tracing::error!(step = "proofread", error = %e, "Malformed proofreading response");
        })?;

        tracing::info!(
            step = "proofread",
            grade = verdict.grade(),
            explanation = %verdict.explanation,
            suggestions = ?verdict.suggestions,
            "Proofreading complete"
        );

        let event = if verdict.meets_expectations {
            WorkflowEvent::DocApproved { draft: draft.to_string() }
        } else {
            WorkflowEvent::DocRejected {
                explanation: verdict.explanation.clone(),
                suggestions: verdict.joined_suggestions("\n"),
            }
        };
        ctx.emit(event)?;

        Ok(verdict)
    }
}
