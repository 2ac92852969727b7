//! # Docpipe
//!
//! Product documentation pipeline driven by a chat model.
//!
//! A run takes a product name through four steps: gather product
//! information, generate documentation, proofread it, and publish it once the
//! proofreader approves. Rejected drafts go back to the generator together
//! with the proofreader's suggestions.
//!
//! ## Features
//!
//! - **Explicit state machine**: every transition is checked and traced
//! - **Structured proofreading**: schema-constrained verdicts, strictly validated
//! - **Pluggable chat service**: Azure OpenAI or OpenAI-compatible, scripted in tests
//! - **Bounded calls**: per-call timeouts and an optional revision cap
//!
//! ## Quick Start
//!
//! ```bash
//! export AZURE_OPENAI_ENDPOINT=https://my-resource.openai.azure.com
//! export AZURE_OPENAI_DEPLOYMENT_NAME=gpt-4o
//! export AZURE_OPENAI_API_KEY=...
//!
//! docpipe run "Lavalamp 2.0"
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::use_self)]

pub mod ai;
pub mod core;
pub mod workflow;

pub use ai::{ChatGateway, ChatMessage, ChatRole, Conversation, GatewayError, ScriptedGateway};
pub use crate::core::Config;
pub use workflow::{
    ConsolePublisher, DocumentationProcess, FilePublisher, ProofreadVerdict, Publisher, RunReport,
    WorkflowError, WorkflowEvent, WorkflowState,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "docpipe";
