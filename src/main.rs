use kata_scaffold::cli::output::{style, CROSS, INFO, SPARKLES, WARN};
use kata_scaffold::cli::output::{format_failure, ProgressRenderer};
use kata_scaffold::cli::prompt::TerminalPrompter;
use kata_scaffold::cli::{collect_answers, Cli};
use kata_scaffold::{
    run_plan, ScaffoldContext, ScaffoldError, ScaffoldPlanner, ScaffoldSettings, ShellRunner,
    StepPipeline, WorkspaceNavigator,
};

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::error;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Lines of a failing command's output shown to the operator
const FAILURE_OUTPUT_LINES: usize = 15;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::from_args();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    match scaffold(&cli).await {
        Ok(()) => Ok(()),
        Err(e) => {
            match &e {
                ScaffoldError::Cancelled(reason) => {
                    println!("{} {}", WARN, style(reason).yellow());
                }
                ScaffoldError::Pipeline(failure) => {
                    error!("{}", failure);
                    println!("\n{}", format_failure(failure, FAILURE_OUTPUT_LINES));
                }
                other => {
                    error!("{}", other);
                    println!("{} {}", CROSS, style(other).red());
                }
            }
            std::process::exit(e.exit_code());
        }
    }
}

async fn scaffold(cli: &Cli) -> Result<(), ScaffoldError> {
    let mut settings =
        ScaffoldSettings::load(cli.config.as_deref()).map_err(ScaffoldError::Settings)?;
    cli.apply_to(&mut settings);

    let prompter = TerminalPrompter::new();
    let answers = collect_answers(cli, &settings, &prompter)?;
    let plan = ScaffoldPlanner::new(settings.clone()).plan_for(&answers);

    if cli.dry_run {
        println!("{} Planned steps:", INFO);
        for (i, title) in plan.titles().iter().enumerate() {
            println!("  {} {}", style(format!("{:>2}.", i + 1)).dim(), title);
        }
        return Ok(());
    }

    let workspace = WorkspaceNavigator::from_process_cwd().map_err(|e| {
        ScaffoldError::Settings(anyhow::Error::new(e).context("Cannot read the current folder"))
    })?;
    let mut shell = ShellRunner::new();
    if let Some(secs) = settings.command_timeout_secs {
        shell = shell.with_timeout(secs);
    }
    let mut ctx = ScaffoldContext::new(answers, settings, workspace, Arc::new(shell));

    // Set up event handler for console output
    let renderer = Arc::new(ProgressRenderer::new());
    let mut pipeline = StepPipeline::new();
    pipeline.add_event_handler(move |event| renderer.handle(event));

    let outcome = run_plan(&plan, &pipeline, &mut ctx).await?;

    println!(
        "\n{} Installed in {}",
        SPARKLES,
        style(outcome.install_path.display()).bold()
    );
    println!("{} You're all set!", INFO);
    Ok(())
}
