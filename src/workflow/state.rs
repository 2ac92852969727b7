//! Workflow state machine.
//!
//! | From         | Event         | To           |
//! |--------------|---------------|--------------|
//! | Idle         | Start         | Gathering    |
//! | Gathering    | InfoGathered  | Generating   |
//! | Generating   | DocGenerated  | Proofreading |
//! | Proofreading | DocApproved   | Publishing   |
//! | Proofreading | DocRejected   | Generating   |
//! | Publishing   | (complete)    | Done         |

use std::fmt;

use serde::Serialize;

use super::{WorkflowError, WorkflowEvent};

/// Position of a run in the step graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowState {
    Idle,
    Gathering,
    Generating,
    Proofreading,
    Publishing,
    Done,
    Failed,
}

impl WorkflowState {
    /// State reached by handling `event` in this state.
    pub fn on_event(self, event: &WorkflowEvent) -> Result<Self, WorkflowError> {
        use WorkflowEvent::*;

        match (self, event) {
            (Self::Idle, Start { .. }) => Ok(Self::Gathering),
            (Self::Gathering, InfoGathered { .. }) => Ok(Self::Generating),
            (Self::Generating, DocGenerated { .. }) => Ok(Self::Proofreading),
            (Self::Proofreading, DocApproved { .. }) => Ok(Self::Publishing),
            (Self::Proofreading, DocRejected { .. }) => Ok(Self::Generating),
            (state, event) => {
                Err(WorkflowError::InvalidTransition { state, event: event.id() })
            }
        }
    }

    /// State reached when the publisher finishes.
    pub fn complete(self) -> Result<Self, WorkflowError> {
        match self {
            Self::Publishing => Ok(Self::Done),
            state => Err(WorkflowError::InvalidTransition { state, event: "complete" }),
        }
    }

    /// Whether the run is over.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Gathering => "gathering",
            Self::Generating => "generating",
            Self::Proofreading => "proofreading",
            Self::Publishing => "publishing",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for WorkflowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
