//! Product documentation workflow.
//!
//! An explicit state machine drives four steps over an event channel:
//!
//! ```text
//! Start ─▶ gather ─▶ generate ─▶ proofread ─┬─▶ publish ─▶ Done
//!                       ▲                   │
//!                       └──── rejected ─────┘
//! ```
//!
//! ## Steps
//!
//! - `ProductInfoGatherer` - product name to product information
//! - `DocumentationGenerator` - product information to drafts, keeps its conversation
//! - `Proofreader` - structured pass/fail verdict on a draft
//! - `Publisher` - terminal action for the approved draft

mod error;
mod events;
mod gather;
mod generate;
mod process;
mod proofread;
pub mod prompts;
mod publish;
mod state;
mod verdict;

pub use error::WorkflowError;
pub use events::{StepContext, WorkflowEvent};
pub use gather::ProductInfoGatherer;
pub use generate::{DocumentationGenerator, RevisionRequest};
pub use process::{DocumentationProcess, RunReport};
pub use proofread::Proofreader;
pub use publish::{slugify, ConsolePublisher, ConsoleStream, FilePublisher, Publisher};
pub use state::WorkflowState;
pub use verdict::{ParseError, ProofreadVerdict, VERDICT_SCHEMA_NAME};
