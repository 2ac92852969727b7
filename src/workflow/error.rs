//! Workflow error types.

use crate::ai::GatewayError;

use super::{ParseError, WorkflowState};

/// Reasons a workflow run terminates early. None of them are retried.
#[derive(Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error("Chat gateway failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("Publishing failed: {0}")]
    Publish(String),

    #[error("No transition from '{state}' on '{event}'")]
    InvalidTransition { state: WorkflowState, event: &'static str },

    #[error("Documentation still rejected after {0} revision(s)")]
    RevisionLimitExceeded(u32),

    #[error("Workflow event channel closed")]
    ChannelClosed,
}

impl WorkflowError {
    /// Short machine-friendly name of the error class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Gateway(GatewayError::Timeout(_)) => "timeout",
            Self::Gateway(_) => "gateway",
            Self::Parse(_) => "parse",
            Self::Publish(_) => "publish",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::RevisionLimitExceeded(_) => "revision_limit",
            Self::ChannelClosed => "channel_closed",
        }
    }
}
