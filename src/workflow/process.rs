//! Documentation process orchestrator.
//!
//! Runs the gather → generate → proofread → publish graph for one product.
//! Steps report completion by emitting events on a channel; the orchestrator
//! receives each event exactly once, advances the state machine and
//! dispatches the next step. Everything runs sequentially on the caller's
//! task.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::mpsc;
use tracing::Instrument;
use uuid::Uuid;

use crate::ai::ChatGateway;
use crate::core::{ProcessConfig, DEFAULT_PROCESS_ID};

use super::{
    DocumentationGenerator, ProductInfoGatherer, Proofreader, Publisher, RevisionRequest,
    StepContext, WorkflowError, WorkflowEvent, WorkflowState,
};

/// Summary of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: String,
    pub process_id: String,
    pub process_name: String,
    pub product_name: String,
    /// Every state the run passed through, starting at `idle`
    pub states: Vec<WorkflowState>,
    /// Number of proofread rejections
    pub revisions: u32,
    /// The published document
    pub document: String,
    pub started_at: String,
    pub finished_at: String,
}

/// The four-step documentation workflow.
pub struct DocumentationProcess {
    process: ProcessConfig,
    gateway: Arc<dyn ChatGateway>,
    publisher: Arc<dyn Publisher>,
    max_revisions: Option<u32>,
}

/// Per-run state. Dropped when the run ends.
struct Run {
    state: WorkflowState,
    states: Vec<WorkflowState>,
    revisions: u32,
    product_name: String,
    generator: DocumentationGenerator,
    published: Option<String>,
}

impl Run {
    fn advance(&mut self, next: WorkflowState) {
        tracing::debug!(from = %self.state, to = %next, "State transition");
        self.state = next;
        self.states.push(next);
    }
}

impl DocumentationProcess {
    /// Create a process with the default id.
    pub fn new(
        name: impl Into<String>,
        gateway: Arc<dyn ChatGateway>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self::from_config(ProcessConfig::new(DEFAULT_PROCESS_ID, name), gateway, publisher)
    }

    /// Create a process from its configured definition.
    pub fn from_config(
        process: ProcessConfig,
        gateway: Arc<dyn ChatGateway>,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        Self { process, gateway, publisher, max_revisions: None }
    }

    /// Cap the number of proofread rejections per run.
    ///
    /// `None` (the default) lets the proofread/rewrite cycle repeat until the
    /// proofreader approves.
    pub fn with_max_revisions(mut self, max: Option<u32>) -> Self {
        self.max_revisions = max;
        self
    }

    pub fn id(&self) -> &str {
        &self.process.id
    }

    pub fn name(&self) -> &str {
        &self.process.name
    }

    /// Run the workflow for `product_name` to completion.
    ///
    /// Any step failure ends the run with that error; nothing is published
    /// unless the proofreader approved a draft.
    pub async fn run(&self, product_name: &str) -> Result<RunReport, WorkflowError> {
        let run_id = Uuid::new_v4().to_string();
        let span = tracing::info_span!(
            "workflow",
            process = %self.process.name,
            run_id = %run_id,
        );

        async move {
            let started_at = chrono::Local::now().to_rfc3339();
            tracing::info!(product = %product_name, "Starting process");

            let mut run = Run {
                state: WorkflowState::Idle,
                states: vec![WorkflowState::Idle],
                revisions: 0,
                product_name: product_name.to_string(),
                generator: DocumentationGenerator::new(Arc::clone(&self.gateway)),
                published: None,
            };

            let (ctx, rx) = StepContext::channel();
            if let Err(e) = self.drive(&mut run, &ctx, rx).await {
                tracing::error!(state = %run.state, kind = e.kind(), error = %e, "Process failed");
                run.advance(WorkflowState::Failed);
                return Err(e);
            }

            tracing::info!(revisions = run.revisions, "Process complete");
            Ok(RunReport {
                run_id,
                process_id: self.process.id.clone(),
                process_name: self.process.name.clone(),
                product_name: run.product_name,
                states: run.states,
                revisions: run.revisions,
                document: run.published.unwrap_or_default(),
                started_at,
                finished_at: chrono::Local::now().to_rfc3339(),
            })
        }
        .instrument(span)
        .await
    }

    async fn drive(
        &self,
        run: &mut Run,
        ctx: &StepContext,
        mut rx: mpsc::UnboundedReceiver<WorkflowEvent>,
    ) -> Result<(), WorkflowError> {
        ctx.emit(WorkflowEvent::Start { product_name: run.product_name.clone() })?;

        while !run.state.is_terminal() {
            let event = rx.recv().await.ok_or(WorkflowError::ChannelClosed)?;
            self.dispatch(run, ctx, event).await?;
        }

        Ok(())
    }

    async fn dispatch(
        &self,
        run: &mut Run,
        ctx: &StepContext,
        event: WorkflowEvent,
    ) -> Result<(), WorkflowError> {
        tracing::debug!(event = event.id(), state = %run.state, "Dispatching event");

        let next = run.state.on_event(&event)?;
        if matches!(event, WorkflowEvent::DocRejected { .. }) {
            self.check_revision_budget(run)?;
        }
        run.advance(next);

        match event {
            WorkflowEvent::Start { product_name } => {
                let gatherer = ProductInfoGatherer::new(Arc::clone(&self.gateway));
                let info = gatherer.gather(&product_name).await?;
                ctx.emit(WorkflowEvent::InfoGathered { info })?;
            }
            WorkflowEvent::InfoGathered { info } => {
                run.generator.generate(&info, ctx).await?;
            }
            WorkflowEvent::DocGenerated { draft } => {
                Proofreader::new(Arc::clone(&self.gateway)).review(&draft, ctx).await?;
            }
            WorkflowEvent::DocRejected { explanation, suggestions } => {
                let request = RevisionRequest { explanation, suggestions };
                run.generator.apply_suggestions(&request, ctx).await?;
            }
            WorkflowEvent::DocApproved { draft } => {
                self.publisher
                    .publish(&run.product_name, &draft)
                    .await
                    .map_err(|e| WorkflowError::Publish(format!("{:#}", e)))?;
                run.published = Some(draft);

                let done = run.state.complete()?;
                run.advance(done);
            }
        }

        Ok(())
    }

    fn check_revision_budget(&self, run: &mut Run) -> Result<(), WorkflowError> {
        run.revisions += 1;

        match self.max_revisions {
            Some(max) if run.revisions > max => {
                tracing::warn!(max_revisions = max, "Revision limit reached");
                Err(WorkflowError::RevisionLimitExceeded(max))
            }
            Some(max) => {
                tracing::info!(revision = run.revisions, max_revisions = max, "Documentation rejected");
                Ok(())
            }
            None => {
                if run.revisions == 1 {
                    tracing::warn!("Documentation rejected; revision cycle has no limit for this run");
                }
                tracing::info!(revision = run.revisions, "Documentation rejected");
                Ok(())
            }
        }
    }
}
