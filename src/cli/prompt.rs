//! Prompter capability: interactive terminal and pre-supplied answers

use crate::scaffold::ScaffoldError;
use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use std::collections::VecDeque;
use std::sync::Mutex;
use thiserror::Error;

/// The operator declined to answer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct Cancelled {
    pub reason: String,
}

impl Cancelled {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

impl From<Cancelled> for ScaffoldError {
    fn from(c: Cancelled) -> Self {
        ScaffoldError::Cancelled(c.reason)
    }
}

/// Validates a free-text answer; the error is shown to the operator
pub type Validator<'a> = &'a (dyn Fn(&str) -> Result<(), String> + Sync);

/// Asks the operator questions
pub trait Prompter {
    /// Yes/no question
    fn confirm(&self, question: &str, default: bool) -> Result<bool, Cancelled>;

    /// Free-text question with a default answer
    fn text(&self, question: &str, default: &str, validator: Validator<'_>)
        -> Result<String, Cancelled>;
}

/// Interactive prompts on the controlling terminal
pub struct TerminalPrompter {
    theme: ColorfulTheme,
}

impl TerminalPrompter {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Default for TerminalPrompter {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, question: &str, default: bool) -> Result<bool, Cancelled> {
        Confirm::with_theme(&self.theme)
            .with_prompt(question)
            .default(default)
            .interact_opt()
            .map_err(|e| Cancelled::new(e.to_string()))?
            .ok_or_else(|| Cancelled::new("Operation cancelled"))
    }

    fn text(
        &self,
        question: &str,
        default: &str,
        validator: Validator<'_>,
    ) -> Result<String, Cancelled> {
        // Invalid input re-prompts; Esc or Ctrl-C surfaces as an error
        Input::<String>::with_theme(&self.theme)
            .with_prompt(question)
            .default(default.to_string())
            .validate_with(|input: &String| validator(input.as_str()))
            .interact_text()
            .map_err(|e| Cancelled::new(e.to_string()))
    }
}

/// Answers from a fixed list, in order; running out counts as cancelling
#[derive(Debug, Default)]
pub struct PresetPrompter {
    confirms: Mutex<VecDeque<bool>>,
    texts: Mutex<VecDeque<String>>,
}

impl PresetPrompter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_confirm(self, answer: bool) -> Self {
        if let Ok(mut confirms) = self.confirms.lock() {
            confirms.push_back(answer);
        }
        self
    }

    pub fn with_text(self, answer: impl Into<String>) -> Self {
        if let Ok(mut texts) = self.texts.lock() {
            texts.push_back(answer.into());
        }
        self
    }
}

impl Prompter for PresetPrompter {
    fn confirm(&self, question: &str, _default: bool) -> Result<bool, Cancelled> {
        self.confirms
            .lock()
            .ok()
            .and_then(|mut c| c.pop_front())
            .ok_or_else(|| Cancelled::new(format!("No answer for '{}'", question)))
    }

    fn text(
        &self,
        question: &str,
        default: &str,
        validator: Validator<'_>,
    ) -> Result<String, Cancelled> {
        let answer = self
            .texts
            .lock()
            .ok()
            .and_then(|mut t| t.pop_front())
            .ok_or_else(|| Cancelled::new(format!("No answer for '{}'", question)))?;

        // An empty preset means "take the default", as pressing enter would
        let answer = if answer.is_empty() {
            default.to_string()
        } else {
            answer
        };

        validator(answer.as_str()).map_err(Cancelled::new)?;
        Ok(answer)
    }
}
