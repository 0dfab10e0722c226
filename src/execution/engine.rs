//! Step pipeline - runs an ordered list of steps against a shared context

use crate::core::{ExecutionStatus, RunState, Step, StepError};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

/// Events that can occur during a run
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    PipelineStarted {
        execution_id: Uuid,
        total_steps: usize,
    },
    StepStarted {
        index: usize,
        title: String,
    },
    StepCompleted {
        index: usize,
        title: String,
        status: String,
    },
    StepFailed {
        index: usize,
        title: String,
        error: String,
    },
    PipelineFinished {
        execution_id: Uuid,
        status: ExecutionStatus,
    },
}

/// Type for event handlers
pub type EventHandler = Arc<dyn Fn(&PipelineEvent) + Send + Sync>;

/// The step that stopped a run, and why
#[derive(Debug, Error)]
#[error("{step}: {source}")]
pub struct PipelineError {
    /// Title of the failed step
    pub step: String,
    /// Position of the failed step
    pub index: usize,
    #[source]
    pub source: StepError,
    /// Run state at the moment of failure
    pub state: RunState,
}

/// Result of a run in which every step succeeded
#[derive(Debug, Clone)]
pub struct PipelineReport {
    pub execution_id: Uuid,
    /// Status line of each step, in order
    pub statuses: Vec<String>,
    pub state: RunState,
}

/// Runs steps strictly in order; the first failure stops the run
#[derive(Default)]
pub struct StepPipeline {
    event_handlers: Vec<EventHandler>,
}

impl StepPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an event handler
    pub fn add_event_handler<F>(&mut self, handler: F)
    where
        F: Fn(&PipelineEvent) + Send + Sync + 'static,
    {
        self.event_handlers.push(Arc::new(handler));
    }

    /// Emit an event to all handlers
    fn emit_event(&self, event: PipelineEvent) {
        for handler in &self.event_handlers {
            handler(&event);
        }
    }

    /// Execute every step in order
    ///
    /// Each step completes, including any subprocess it awaits, before the
    /// next one starts. There is no retry here: fallbacks belong to the steps.
    pub async fn run<C, S>(&self, steps: &[S], ctx: &mut C) -> Result<PipelineReport, PipelineError>
    where
        C: Send,
        S: Step<C>,
    {
        let mut state = RunState::new(steps.iter().map(|s| s.title()).collect());
        let execution_id = state.execution_id;

        info!("Starting run {} with {} steps", execution_id, steps.len());
        state.start();
        self.emit_event(PipelineEvent::PipelineStarted {
            execution_id,
            total_steps: steps.len(),
        });

        let mut statuses = Vec::with_capacity(steps.len());

        for (index, step) in steps.iter().enumerate() {
            let title = step.title();
            info!("Executing step {}: {}", index + 1, title);
            state.step_started(index);
            self.emit_event(PipelineEvent::StepStarted {
                index,
                title: title.clone(),
            });

            match step.run(ctx).await {
                Ok(status) => {
                    state.step_completed(index, status.clone());
                    self.emit_event(PipelineEvent::StepCompleted {
                        index,
                        title,
                        status: status.clone(),
                    });
                    statuses.push(status);
                }
                Err(e) => {
                    error!("Step '{}' failed: {}", title, e);
                    state.step_failed(index, e.to_string());
                    self.emit_event(PipelineEvent::StepFailed {
                        index,
                        title: title.clone(),
                        error: e.to_string(),
                    });
                    self.emit_event(PipelineEvent::PipelineFinished {
                        execution_id,
                        status: ExecutionStatus::Failed,
                    });
                    return Err(PipelineError {
                        step: title,
                        index,
                        source: e,
                        state,
                    });
                }
            }
        }

        state.complete();
        info!("Run {} completed", execution_id);
        self.emit_event(PipelineEvent::PipelineFinished {
            execution_id,
            status: ExecutionStatus::Completed,
        });

        Ok(PipelineReport {
            execution_id,
            statuses,
            state,
        })
    }
}
