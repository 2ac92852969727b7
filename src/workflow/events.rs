//! Workflow events and the channel steps emit them on.

use std::fmt;

use tokio::sync::mpsc;

use super::WorkflowError;

/// A named signal that moves the workflow from one step to the next.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkflowEvent {
    /// External trigger carrying the product name
    Start { product_name: String },

    /// Product information is ready for the generator
    InfoGathered { info: String },

    /// A documentation draft is ready for proofreading
    DocGenerated { draft: String },

    /// The proofreader rejected the draft
    DocRejected {
        explanation: String,
        /// Suggestions joined one per line
        suggestions: String,
    },

    /// The proofreader approved the draft
    DocApproved { draft: String },
}

impl WorkflowEvent {
    /// Stable process-event id.
    pub fn id(&self) -> &'static str {
        match self {
            Self::Start { .. } => "start",
            Self::InfoGathered { .. } => "product_info_gathered",
            Self::DocGenerated { .. } => "documentation_generated",
            Self::DocRejected { .. } => "documentation_rejected",
            Self::DocApproved { .. } => "documentation_approved",
        }
    }
}

impl fmt::Display for WorkflowEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Handle a step uses to emit events back to the orchestrator.
#[derive(Debug, Clone)]
pub struct StepContext {
    tx: mpsc::UnboundedSender<WorkflowEvent>,
}

impl StepContext {
    pub fn new(tx: mpsc::UnboundedSender<WorkflowEvent>) -> Self {
        Self { tx }
    }

    /// Create a context together with the receiving end of its channel.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<WorkflowEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    /// Emit an event to the orchestrator.
    pub fn emit(&self, event: WorkflowEvent) -> Result<(), WorkflowError> {
        tracing::trace!(event = event.id(), "Emitting event");
        self.tx.send(event).map_err(|_| WorkflowError::ChannelClosed)
    }
}
