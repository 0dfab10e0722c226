//! Pipeline execution engine and shell command runner

pub mod engine;
pub mod shell;

pub use engine::{EventHandler, PipelineError, PipelineEvent, PipelineReport, StepPipeline};
pub use shell::{shell_escape, CommandRunner, ExecError, ShellRunner};
