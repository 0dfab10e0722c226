//! Step domain model

use crate::execution::shell::ExecError;
use crate::workspace::{ConfigFileError, WorkspaceError};
use async_trait::async_trait;
use thiserror::Error;

/// Error produced by a single step
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Command(#[from] ExecError),

    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    #[error(transparent)]
    ConfigFile(#[from] ConfigFileError),

    #[error("No template registered for {0}")]
    MissingTemplate(String),

    #[error("No git repository has been cloned, found or initialised in this run")]
    NoRepository,
}

/// A single named unit of work in a pipeline
///
/// Steps are atomic from the runner's point of view: `run` either fully
/// succeeds with a human-readable status line or fails with an error.
/// The context `C` is shared, mutable state owned by the run.
#[async_trait]
pub trait Step<C: Send>: Send + Sync {
    /// Title shown to the operator while the step runs
    fn title(&self) -> String;

    /// Execute the step against the shared context
    async fn run(&self, ctx: &mut C) -> Result<String, StepError>;
}

#[async_trait]
impl<C: Send, T: Step<C> + ?Sized> Step<C> for Box<T> {
    fn title(&self) -> String {
        (**self).title()
    }

    async fn run(&self, ctx: &mut C) -> Result<String, StepError> {
        (**self).run(ctx).await
    }
}
