//! kata-scaffold - sets up a TypeScript kata project, standalone or as a Dojo lesson

pub mod cli;
pub mod core;
pub mod execution;
pub mod scaffold;
pub mod workspace;

// Re-export commonly used types
pub use core::{Answers, Mode, ScaffoldContext, ScaffoldSettings, Step, StepError};
pub use execution::{CommandRunner, PipelineEvent, ShellRunner, StepPipeline};
pub use scaffold::{run_plan, ScaffoldError, ScaffoldPlan, ScaffoldPlanner};
pub use workspace::{ConfigMutator, WorkspaceNavigator};
