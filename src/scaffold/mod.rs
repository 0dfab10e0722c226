//! Scaffolding: planning, concrete steps and templates

pub mod planner;
pub mod steps;
pub mod templates;

pub use planner::{ScaffoldPlan, ScaffoldPlanner};
pub use steps::{FileDrop, ScaffoldStep};

use crate::core::{InvalidAnswer, ScaffoldContext};
use crate::execution::{PipelineError, PipelineReport, StepPipeline};
use std::path::PathBuf;
use thiserror::Error;
use tracing::info;

/// Everything that can end a scaffolding run early
#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error(transparent)]
    InvalidAnswer(#[from] InvalidAnswer),

    #[error("Invalid settings: {0:#}")]
    Settings(anyhow::Error),

    #[error("Step failed - {0}")]
    Pipeline(#[from] PipelineError),
}

impl ScaffoldError {
    /// Process exit code for this outcome
    pub fn exit_code(&self) -> i32 {
        match self {
            ScaffoldError::Cancelled(_) => 2,
            _ => 1,
        }
    }
}

/// A finished run
#[derive(Debug, Clone)]
pub struct ScaffoldOutcome {
    pub install_path: PathBuf,
    pub report: PipelineReport,
}

/// Execute a plan and report where the project ended up
pub async fn run_plan(
    plan: &ScaffoldPlan,
    pipeline: &StepPipeline,
    ctx: &mut ScaffoldContext,
) -> Result<ScaffoldOutcome, ScaffoldError> {
    info!(
        "Scaffolding {} ({:?} mode, {} steps)",
        plan.install_dir.display(),
        plan.mode,
        plan.steps.len()
    );

    let report = pipeline.run(&plan.steps, ctx).await?;
    let install_path = plan.install_path(ctx.workspace.origin());

    Ok(ScaffoldOutcome {
        install_path,
        report,
    })
}
