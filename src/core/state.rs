//! Execution state models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Overall pipeline execution status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExecutionStatus {
    /// Pipeline has not started
    Pending,
    /// Pipeline is currently running
    Running,
    /// Every step completed
    Completed,
    /// A step failed and the remaining steps were not run
    Failed,
}

/// State of a single step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StepState {
    /// Step has not run yet
    Pending,
    /// Step is currently running
    Running { started_at: DateTime<Utc> },
    /// Step completed successfully
    Completed {
        status: String,
        started_at: DateTime<Utc>,
        completed_at: DateTime<Utc>,
    },
    /// Step failed
    Failed {
        error: String,
        started_at: DateTime<Utc>,
        failed_at: DateTime<Utc>,
    },
}

impl StepState {
    /// Check if step is in a terminal state
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepState::Completed { .. } | StepState::Failed { .. })
    }
}

/// Record of one step within a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepRecord {
    pub title: String,
    pub state: StepState,
}

/// State of a whole run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    /// Unique execution ID
    pub execution_id: Uuid,

    /// Current execution status
    pub status: ExecutionStatus,

    /// When execution started
    pub started_at: Option<DateTime<Utc>>,

    /// When execution completed/failed
    pub completed_at: Option<DateTime<Utc>>,

    /// One record per step, in execution order
    pub steps: Vec<StepRecord>,
}

impl RunState {
    /// Create a state with every step pending
    pub fn new(titles: Vec<String>) -> Self {
        Self {
            execution_id: Uuid::new_v4(),
            status: ExecutionStatus::Pending,
            started_at: None,
            completed_at: None,
            steps: titles
                .into_iter()
                .map(|title| StepRecord {
                    title,
                    state: StepState::Pending,
                })
                .collect(),
        }
    }

    /// Mark the run as started
    pub fn start(&mut self) {
        self.status = ExecutionStatus::Running;
        self.started_at = Some(Utc::now());
    }

    pub fn step_started(&mut self, index: usize) {
        if let Some(record) = self.steps.get_mut(index) {
            record.state = StepState::Running {
                started_at: Utc::now(),
            };
        }
    }

    pub fn step_completed(&mut self, index: usize, status: String) {
        if let Some(record) = self.steps.get_mut(index) {
            let started_at = match record.state {
                StepState::Running { started_at } => started_at,
                _ => Utc::now(),
            };
            record.state = StepState::Completed {
                status,
                started_at,
                completed_at: Utc::now(),
            };
        }
    }

    /// Mark a step failed; the run fails with it
    pub fn step_failed(&mut self, index: usize, error: String) {
        if let Some(record) = self.steps.get_mut(index) {
            let started_at = match record.state {
                StepState::Running { started_at } => started_at,
                _ => Utc::now(),
            };
            record.state = StepState::Failed {
                error,
                started_at,
                failed_at: Utc::now(),
            };
        }
        self.status = ExecutionStatus::Failed;
        self.completed_at = Some(Utc::now());
    }

    /// Mark the run as completed
    pub fn complete(&mut self) {
        self.status = ExecutionStatus::Completed;
        self.completed_at = Some(Utc::now());
    }

    /// Number of steps that reached a terminal state
    pub fn finished_steps(&self) -> usize {
        self.steps.iter().filter(|s| s.state.is_terminal()).count()
    }

    /// Calculate progress (0.0 to 1.0)
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.finished_steps() as f64 / self.steps.len() as f64
    }
}
