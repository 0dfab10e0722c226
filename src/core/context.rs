//! Scaffold context - state shared by the steps of one run

use crate::core::{answers::Answers, config::ScaffoldSettings};
use crate::execution::shell::{CommandRunner, ExecError};
use crate::workspace::WorkspaceNavigator;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Mutable state owned by a single run
///
/// Holds the operator's answers, the settings, the logical working directory
/// and what earlier steps discovered (e.g. whether a repository is present).
pub struct ScaffoldContext {
    answers: Answers,
    settings: ScaffoldSettings,

    /// Logical working directory for every command and file operation
    pub workspace: WorkspaceNavigator,

    /// Runs shell commands for the steps
    pub shell: Arc<dyn CommandRunner>,

    /// Root of the version-controlled repository, once cloned/initialised/found
    pub repository_root: Option<PathBuf>,
}

impl ScaffoldContext {
    pub fn new(
        answers: Answers,
        settings: ScaffoldSettings,
        workspace: WorkspaceNavigator,
        shell: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            answers,
            settings,
            workspace,
            shell,
            repository_root: None,
        }
    }

    pub fn answers(&self) -> &Answers {
        &self.answers
    }

    pub fn settings(&self) -> &ScaffoldSettings {
        &self.settings
    }

    /// Run a command in the current logical directory
    pub async fn run(&self, command: &str) -> Result<String, ExecError> {
        self.shell.run(self.workspace.current(), command).await
    }

    /// Run `primary`, falling back to `fallback`, in the current logical directory
    pub async fn run_with_fallback(
        &self,
        primary: &str,
        fallback: &str,
    ) -> Result<String, ExecError> {
        self.shell
            .run_with_fallback(self.workspace.current(), primary, fallback)
            .await
    }

    /// Record the repository root found at `path`
    pub fn set_repository_root(&mut self, path: &Path) {
        self.repository_root = Some(path.to_path_buf());
    }
}
