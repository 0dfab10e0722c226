//! Command-line interface

pub mod output;
pub mod prompt;

use crate::core::{require_non_empty, Answers, Mode, ScaffoldSettings};
use crate::scaffold::ScaffoldError;
use clap::Parser;
use prompt::Prompter;
use std::ffi::OsString;
use std::path::PathBuf;

/// Scaffold a TypeScript kata project
#[derive(Debug, Parser, Clone)]
#[command(name = "kata-scaffold")]
#[command(version = "0.1.0")]
#[command(about = "Scaffold a TypeScript kata, standalone or as a Dojo lesson", long_about = None)]
pub struct Cli {
    /// Scaffold a lesson inside the Dojo repository
    #[arg(long, conflicts_with = "standalone")]
    pub lesson: bool,

    /// Scaffold a standalone project with its own repository
    #[arg(long)]
    pub standalone: bool,

    /// Project name (written to package.json)
    #[arg(short, long)]
    pub name: Option<String>,

    /// Folder to create the project in
    #[arg(short, long)]
    pub folder: Option<String>,

    /// Path to a settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Skip compiling and testing the new project
    #[arg(long)]
    pub no_verify: bool,

    /// Print the planned steps without running them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }

    /// Mode given on the command line, if any
    pub fn mode(&self) -> Option<Mode> {
        match (self.lesson, self.standalone) {
            (true, _) => Some(Mode::Lesson),
            (_, true) => Some(Mode::Standalone),
            _ => None,
        }
    }

    /// Apply flag overrides to the loaded settings
    pub fn apply_to(&self, settings: &mut ScaffoldSettings) {
        if self.no_verify {
            settings.verify = false;
        }
    }
}

/// Fill in every answer not given as a flag by asking the operator
pub fn collect_answers(
    cli: &Cli,
    settings: &ScaffoldSettings,
    prompter: &dyn Prompter,
) -> Result<Answers, ScaffoldError> {
    let mode = match cli.mode() {
        Some(mode) => mode,
        None => Mode::from_lesson_flag(prompter.confirm("Is this a Dojo lesson?", false)?),
    };

    let project_name = match &cli.name {
        Some(name) => name.clone(),
        None => prompter.text(
            "What is your project name?",
            &settings.default_project_name,
            &require_non_empty,
        )?,
    };

    let folder_name = match &cli.folder {
        Some(folder) => folder.clone(),
        None => prompter.text(
            "What folder should it go in?",
            &project_name,
            &require_non_empty,
        )?,
    };

    Ok(Answers::new(mode, project_name, folder_name)?)
}
