//! Operator answers collected before a run

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which scaffolding branch to take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// A lesson folder inside the shared Dojo repository
    Lesson,
    /// A fresh project with its own repository
    Standalone,
}

impl Mode {
    /// Map the "Is this a Dojo lesson?" confirmation to a mode
    pub fn from_lesson_flag(is_lesson: bool) -> Self {
        if is_lesson {
            Mode::Lesson
        } else {
            Mode::Standalone
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} must not be empty")]
pub struct InvalidAnswer {
    pub field: &'static str,
}

/// Validated answers, immutable once built
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Answers {
    mode: Mode,
    project_name: String,
    folder_name: String,
}

impl Answers {
    /// Validate and bind the answers. Surrounding whitespace is trimmed.
    pub fn new(
        mode: Mode,
        project_name: impl Into<String>,
        folder_name: impl Into<String>,
    ) -> Result<Self, InvalidAnswer> {
        let project_name = project_name.into().trim().to_string();
        let folder_name = folder_name.into().trim().to_string();

        if project_name.is_empty() {
            return Err(InvalidAnswer {
                field: "project name",
            });
        }
        if folder_name.is_empty() {
            return Err(InvalidAnswer {
                field: "folder name",
            });
        }

        Ok(Self {
            mode,
            project_name,
            folder_name,
        })
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn project_name(&self) -> &str {
        &self.project_name
    }

    pub fn folder_name(&self) -> &str {
        &self.folder_name
    }

    /// Branch name derived from the folder, whitespace replaced by underscores
    pub fn branch_name(&self) -> String {
        self.folder_name
            .chars()
            .map(|c| if c.is_whitespace() { '_' } else { c })
            .collect()
    }
}

/// Validator used by the text prompts
pub fn require_non_empty(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err("Value is required!".to_string())
    } else {
        Ok(())
    }
}
