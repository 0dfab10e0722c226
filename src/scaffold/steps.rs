//! Concrete scaffolding steps

use crate::core::{ScaffoldContext, Step, StepError};
use crate::execution::{shell_escape, ExecError};
use crate::scaffold::templates;
use crate::workspace::{CommentPolicy, ConfigMutator};
use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use tracing::{debug, info};

/// Exits 1 when the index holds changes, 0 when there is nothing to commit
const STAGED_CHANGES_CHECK: &str = "git diff --cached --quiet";

/// A template written to a path relative to the current directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDrop {
    pub path: PathBuf,
    pub template: &'static str,
}

impl FileDrop {
    pub fn new(path: impl Into<PathBuf>, template: &'static str) -> Self {
        Self {
            path: path.into(),
            template,
        }
    }
}

/// One action of a scaffold plan
#[derive(Debug, Clone, PartialEq)]
pub enum ScaffoldStep {
    /// Create a directory (and ancestors) if missing
    EnsureDir { path: PathBuf },

    /// Move the working directory into `path`
    Descend { path: PathBuf },

    /// Clone into the current directory unless it already holds a repository
    CloneIfMissing { primary: String, fallback: String },

    /// Create (or, on a re-run, switch to) a branch in the recorded repository
    CheckoutBranch { branch: String },

    /// `git init` the current directory unless it already holds a repository
    InitRepository { branch: String },

    /// Run a command that generates `creates`, unless that file already exists
    Bootstrap {
        title: String,
        command: String,
        creates: PathBuf,
    },

    /// Run commands one after another
    Shell { title: String, commands: Vec<String> },

    /// Check for a global tool and install it if the check fails
    EnsureGlobalTool {
        tool: String,
        check: String,
        install: String,
    },

    /// Shallow-merge keys into a config document
    PatchConfig {
        path: PathBuf,
        updates: Vec<(String, Value)>,
        comments: CommentPolicy,
    },

    /// Write templates to disk
    WriteFiles { title: String, files: Vec<FileDrop> },

    /// Stage `add_target` (relative to the repository root) and commit
    Commit { add_target: PathBuf, message: String },

    /// Undo the last `depth` descents
    Restore { depth: usize },
}

#[async_trait]
impl Step<ScaffoldContext> for ScaffoldStep {
    fn title(&self) -> String {
        match self {
            ScaffoldStep::EnsureDir { path } => format!("Creating folder {}", path.display()),
            ScaffoldStep::Descend { path } => format!("Entering {}", path.display()),
            ScaffoldStep::CloneIfMissing { .. } => "Fetching the Dojo repository".to_string(),
            ScaffoldStep::CheckoutBranch { branch } => format!("Creating branch {}", branch),
            ScaffoldStep::InitRepository { .. } => "Initialising git repository".to_string(),
            ScaffoldStep::Bootstrap { title, .. }
            | ScaffoldStep::Shell { title, .. }
            | ScaffoldStep::WriteFiles { title, .. } => title.clone(),
            ScaffoldStep::EnsureGlobalTool { tool, .. } => format!("Checking for {}", tool),
            ScaffoldStep::PatchConfig { path, .. } => format!("Updating {}", path.display()),
            ScaffoldStep::Commit { .. } => "Creating commit".to_string(),
            ScaffoldStep::Restore { .. } => "Returning to the starting folder".to_string(),
        }
    }

    async fn run(&self, ctx: &mut ScaffoldContext) -> Result<String, StepError> {
        match self {
            ScaffoldStep::EnsureDir { path } => {
                ctx.workspace.ensure_dir(path).await?;
                Ok(format!("Folder {} ready", path.display()))
            }

            ScaffoldStep::Descend { path } => {
                ctx.workspace.descend(path).await?;
                Ok(format!("Now in {}", ctx.workspace.current().display()))
            }

            ScaffoldStep::CloneIfMissing { primary, fallback } => {
                let root = ctx.workspace.current().to_path_buf();
                if ctx.workspace.exists(".git").await? {
                    info!("Repository already present in {}", root.display());
                    ctx.set_repository_root(&root);
                    return Ok("Repository already present, skipping clone".to_string());
                }
                ctx.run_with_fallback(primary, fallback).await?;
                ctx.set_repository_root(&root);
                Ok("Repository cloned".to_string())
            }

            ScaffoldStep::CheckoutBranch { branch } => {
                if ctx.repository_root.is_none() {
                    return Ok("No repository found, staying on the current branch".to_string());
                }
                let branch_arg = shell_escape(branch);
                ctx.run_with_fallback(
                    &format!("git checkout -b {}", branch_arg),
                    &format!("git checkout {}", branch_arg),
                )
                .await?;
                Ok(format!("On branch {}", branch))
            }

            ScaffoldStep::InitRepository { branch } => {
                let root = ctx.workspace.current().to_path_buf();
                if ctx.workspace.exists(".git").await? {
                    ctx.set_repository_root(&root);
                    return Ok("Repository already initialised".to_string());
                }
                ctx.run(&format!("git init -b {}", shell_escape(branch))).await?;
                ctx.set_repository_root(&root);
                Ok(format!("Initialised repository on {}", branch))
            }

            ScaffoldStep::Bootstrap {
                command, creates, ..
            } => {
                if ctx.workspace.exists(creates).await? {
                    return Ok(format!("{} already exists", creates.display()));
                }
                ctx.run(command).await?;
                Ok(format!("Created {}", creates.display()))
            }

            ScaffoldStep::Shell { commands, .. } => {
                for command in commands {
                    let output = ctx.run(command).await?;
                    debug!("`{}`: {}", command, output);
                }
                Ok(format!("Ran {}", commands.join(", ")))
            }

            ScaffoldStep::EnsureGlobalTool {
                tool,
                check,
                install,
            } => match ctx.run(check).await {
                Ok(version) => Ok(format!("{} {} already installed", tool, version)),
                Err(e) => {
                    info!("{} not available ({}), installing", tool, e);
                    ctx.run(install).await?;
                    Ok(format!("Installed {}", tool))
                }
            },

            ScaffoldStep::PatchConfig {
                path,
                updates,
                comments,
            } => {
                let target = ctx.workspace.resolve(path);
                ConfigMutator::new(*comments).update(&target, updates).await?;
                let keys: Vec<&str> = updates.iter().map(|(k, _)| k.as_str()).collect();
                Ok(format!("Set {} in {}", keys.join(", "), path.display()))
            }

            ScaffoldStep::WriteFiles { files, .. } => {
                for file in files {
                    let bytes = templates::lookup(file.template)
                        .ok_or_else(|| StepError::MissingTemplate(file.template.to_string()))?;
                    ctx.workspace.write_file(&file.path, bytes).await?;
                }
                let names: Vec<String> = files.iter().map(|f| f.path.display().to_string()).collect();
                Ok(format!("Wrote {}", names.join(", ")))
            }

            ScaffoldStep::Commit {
                add_target,
                message,
            } => {
                let root = ctx.repository_root.clone().ok_or(StepError::NoRepository)?;
                let add = format!("git add {}", shell_escape(&add_target.display().to_string()));
                let commit = format!("git commit -m {}", shell_escape(message));
                ctx.shell.run(&root, &add).await?;

                // Exit 0: the index matches HEAD, as on a re-run over a finished scaffold
                match ctx.shell.run(&root, STAGED_CHANGES_CHECK).await {
                    Ok(_) => {
                        info!("Nothing staged in {}, skipping commit", root.display());
                        return Ok("Nothing new to commit".to_string());
                    }
                    Err(ExecError::Failed { code: 1, .. }) => {}
                    Err(e) => return Err(e.into()),
                }

                ctx.shell.run(&root, &commit).await?;
                Ok(format!("Committed \"{}\"", message))
            }

            ScaffoldStep::Restore { depth } => {
                let dir = ctx.workspace.ascend_to(*depth)?;
                Ok(format!("Back in {}", dir.display()))
            }
        }
    }
}
