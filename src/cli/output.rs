//! CLI output formatting

use crate::core::{ExecutionStatus, StepError};
use crate::execution::{ExecError, PipelineError, PipelineEvent};
use indicatif::{ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

pub use console::{style, Emoji};

pub static CHECK: Emoji<'_, '_> = Emoji("✅ ", "✓ ");
pub static CROSS: Emoji<'_, '_> = Emoji("❌ ", "✗ ");
pub static SPINNER: Emoji<'_, '_> = Emoji("⏳ ", "~ ");
pub static INFO: Emoji<'_, '_> = Emoji("ℹ️  ", "i ");
pub static WARN: Emoji<'_, '_> = Emoji("⚠️  ", "! ");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "> ");
pub static SPARKLES: Emoji<'_, '_> = Emoji("✨ ", "* ");

/// Spinner shown while a step runs
pub fn create_spinner(message: String) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner:.green} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message);
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

/// Format an execution status for display
pub fn format_status(status: ExecutionStatus) -> String {
    match status {
        ExecutionStatus::Pending => style("PENDING").dim().to_string(),
        ExecutionStatus::Running => style("RUNNING").yellow().to_string(),
        ExecutionStatus::Completed => style("COMPLETED").green().to_string(),
        ExecutionStatus::Failed => style("FAILED").red().to_string(),
    }
}

/// Format a pipeline event for display
pub fn format_pipeline_event(event: &PipelineEvent) -> String {
    match event {
        PipelineEvent::PipelineStarted {
            execution_id,
            total_steps,
        } => format!(
            "{} Scaffolding in {} steps ({})",
            ROCKET,
            style(total_steps).bold(),
            style(&execution_id.to_string()[..8]).dim()
        ),
        PipelineEvent::StepStarted { title, .. } => {
            format!("{} {}", SPINNER, style(title).cyan())
        }
        PipelineEvent::StepCompleted { title, status, .. } => format!(
            "{} {} {}",
            CHECK,
            style(title).green(),
            style(format!("({})", status)).dim()
        ),
        PipelineEvent::StepFailed { title, error, .. } => {
            format!("{} {}: {}", CROSS, style(title).red(), style(error).dim())
        }
        PipelineEvent::PipelineFinished {
            execution_id,
            status,
        } => format!(
            "{} Run ({}) {}",
            INFO,
            style(&execution_id.to_string()[..8]).dim(),
            format_status(*status)
        ),
    }
}

/// Horizontal rule spanning the terminal width
pub fn separator() -> String {
    let width = term_size::dimensions_stdout()
        .map(|(w, _)| w)
        .unwrap_or(80);
    style("─".repeat(width)).dim().to_string()
}

/// Renders pipeline events with a spinner per running step
#[derive(Default)]
pub struct ProgressRenderer {
    active: Mutex<Option<ProgressBar>>,
}

impl ProgressRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self, event: &PipelineEvent) {
        let Ok(mut active) = self.active.lock() else {
            println!("{}", format_pipeline_event(event));
            return;
        };

        match event {
            PipelineEvent::StepStarted { index, title } => {
                *active = Some(create_spinner(format!(
                    "[{}] {}",
                    style(index + 1).dim(),
                    title
                )));
            }
            PipelineEvent::StepCompleted { .. } | PipelineEvent::StepFailed { .. } => {
                let line = format_pipeline_event(event);
                match active.take() {
                    Some(spinner) => spinner.finish_with_message(line),
                    None => println!("{}", line),
                }
            }
            PipelineEvent::PipelineStarted { .. } => {
                println!("{}", format_pipeline_event(event));
                println!("{}", separator());
            }
            PipelineEvent::PipelineFinished { .. } => {
                if let Some(spinner) = active.take() {
                    spinner.finish_and_clear();
                }
                println!("{}", separator());
            }
        }
    }
}

/// Format step output with truncation
pub fn format_output(output: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = output.lines().collect();

    if lines.len() <= max_lines {
        output.to_string()
    } else {
        let truncated = lines[..max_lines].join("\n");
        format!(
            "{}\n{}... ({} more lines)",
            truncated,
            style("[truncated]").dim(),
            lines.len() - max_lines
        )
    }
}

/// Explain where a failed run stopped, with the tail of the failing command's output
pub fn format_failure(err: &PipelineError, max_lines: usize) -> String {
    let mut text = format!(
        "{} {} {}",
        CROSS,
        style(&err.step).red().bold(),
        style(format!(
            "failed after {}/{} steps ({:.0}%)",
            err.state.finished_steps(),
            err.state.steps.len(),
            err.state.progress() * 100.0
        ))
        .dim()
    );
    text.push_str(&format!("\n  {}", err.source));

    if let StepError::Command(ExecError::Failed { output, .. }) = &err.source {
        if !output.is_empty() {
            text.push_str(&format!("\n{}", format_output(output, max_lines)));
        }
    }
    text
}
