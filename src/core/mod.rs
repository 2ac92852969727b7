//! Core types for Docpipe.
//!
//! Holds configuration shared by the chat gateway, the workflow and the CLI.

mod config;

pub use config::{
    AiConfig, AiProviderKind, Config, ProcessConfig, PublishConfig, PublishTarget, WorkflowConfig,
    DEFAULT_PROCESS_ID,
};
