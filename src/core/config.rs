//! Scaffolder settings from YAML

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Settings shared by every run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScaffoldSettings {
    /// Shared container folder for Dojo lessons
    pub dojo_dir: String,

    /// Primary clone transport for the Dojo repository
    pub dojo_ssh_url: String,

    /// Clone transport tried when SSH fails
    pub dojo_https_url: String,

    /// Default branch of a standalone repository
    pub default_branch: String,

    /// Suggested answer for the project name prompt
    pub default_project_name: String,

    /// Run compile and test after the scaffold is written
    pub verify: bool,

    /// Commit message for standalone projects
    pub initial_commit_message: String,

    /// Commit message for lessons; `{folder}` is replaced by the folder name
    pub lesson_commit_message: String,

    /// Kill any single command that runs longer than this (None = no limit)
    pub command_timeout_secs: Option<u64>,
}

impl Default for ScaffoldSettings {
    fn default() -> Self {
        Self {
            dojo_dir: "dojo".to_string(),
            dojo_ssh_url: "git@github.com:kata-dojo/dojo.git".to_string(),
            dojo_https_url: "https://github.com/kata-dojo/dojo.git".to_string(),
            default_branch: "main".to_string(),
            default_project_name: "kata-ts".to_string(),
            verify: true,
            initial_commit_message: "Initial commit".to_string(),
            lesson_commit_message: "Start lesson {folder}".to_string(),
            command_timeout_secs: None,
        }
    }
}

impl ScaffoldSettings {
    /// Load settings from a YAML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;
        Self::from_yaml(&content)
            .with_context(|| format!("Invalid settings in {}", path.display()))
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        // An empty document means "all defaults"
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let settings: ScaffoldSettings = serde_yaml::from_str(yaml)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Resolve settings: explicit file, then the user config file, then defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }

        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!("Loading settings from {}", path.display());
                Self::from_file(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// `<config dir>/kata-scaffold/settings.yaml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("kata-scaffold").join("settings.yaml"))
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("dojo_dir", &self.dojo_dir),
            ("dojo_ssh_url", &self.dojo_ssh_url),
            ("dojo_https_url", &self.dojo_https_url),
            ("default_branch", &self.default_branch),
            ("initial_commit_message", &self.initial_commit_message),
            ("lesson_commit_message", &self.lesson_commit_message),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                anyhow::bail!("Setting '{}' must not be empty", key);
            }
        }

        if self.command_timeout_secs == Some(0) {
            anyhow::bail!("Setting 'command_timeout_secs' must be at least 1");
        }

        if self.default_branch.chars().any(char::is_whitespace) {
            anyhow::bail!(
                "Setting 'default_branch' must not contain whitespace: '{}'",
                self.default_branch
            );
        }

        Ok(())
    }

    /// Commit message for a lesson folder
    pub fn lesson_commit_message_for(&self, folder: &str) -> String {
        self.lesson_commit_message.replace("{folder}", folder)
    }
}
