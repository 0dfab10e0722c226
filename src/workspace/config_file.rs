//! Read-merge-write of JSON config documents
//!
//! Used for `package.json` and `tsconfig.json`. Updates are a shallow merge:
//! a top-level key in the update replaces the existing value wholesale.

use regex::Regex;
use serde_json::{Map, Value};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use thiserror::Error;
use tracing::debug;

/// Errors from config document mutation
#[derive(Debug, Error)]
pub enum ConfigFileError {
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0} does not contain a top-level object")]
    NotAnObject(PathBuf),

    #[error("Failed to serialize {path}: {source}")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// How to treat non-JSON comment syntax in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentPolicy {
    /// Parse the text as plain JSON
    Strict,
    /// Parse as JSON; if that fails, strip comments, blank lines and
    /// trailing commas and parse again (lossy)
    StripComments,
}

fn block_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("valid block comment regex"))
}

fn line_comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // `//` preceded by `:` is kept so `"https://..."` values survive
    RE.get_or_init(|| Regex::new(r"(?m)(^|[^:])//.*$").expect("valid line comment regex"))
}

fn trailing_comma() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",(\s*[}\]])").expect("valid trailing comma regex"))
}

/// Remove `/* */` and `//` comments, whitespace-only lines and trailing commas
///
/// Only meant for machine-generated files such as a fresh `tsconfig.json`;
/// a `//` inside a string value that is not preceded by `:` is removed too.
pub fn strip_comments(text: &str) -> String {
    let without_blocks = block_comment().replace_all(text, "");
    let without_lines = line_comment().replace_all(&without_blocks, "$1");
    let collapsed = without_lines
        .lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    trailing_comma().replace_all(&collapsed, "$1").into_owned()
}

/// In-memory key/value view of a config file
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigDocument {
    entries: Map<String, Value>,
}

/// Why a text could not become a document
#[derive(Debug)]
enum ParseFailure {
    Json(serde_json::Error),
    NotAnObject,
}

impl ConfigDocument {
    fn parse(text: &str, policy: CommentPolicy) -> Result<Self, ParseFailure> {
        let value: Value = match policy {
            CommentPolicy::Strict => serde_json::from_str(text),
            // Already-clean JSON skips the lossy pass, so globs like
            // "src/**/*" written by an earlier run are not mistaken for comments
            CommentPolicy::StripComments => serde_json::from_str::<Value>(text)
                .or_else(|_| serde_json::from_str::<Value>(&strip_comments(text))),
        }
        .map_err(ParseFailure::Json)?;

        match value {
            Value::Object(entries) => Ok(Self { entries }),
            _ => Err(ParseFailure::NotAnObject),
        }
    }

    /// Read and parse the document at `path`
    pub async fn load(path: &Path, policy: CommentPolicy) -> Result<Self, ConfigFileError> {
        let text = tokio::fs::read_to_string(path).await.map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                ConfigFileError::NotFound(path.to_path_buf())
            } else {
                ConfigFileError::Read {
                    path: path.to_path_buf(),
                    source,
                }
            }
        })?;

        Self::parse(&text, policy).map_err(|failure| match failure {
            ParseFailure::Json(source) => ConfigFileError::Parse {
                path: path.to_path_buf(),
                source,
            },
            ParseFailure::NotAnObject => ConfigFileError::NotAnObject(path.to_path_buf()),
        })
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    /// Shallow overwrite: new keys are appended, existing keys fully replaced
    pub fn apply<'a, I>(&mut self, updates: I)
    where
        I: IntoIterator<Item = &'a (String, Value)>,
    {
        for (key, value) in updates {
            self.entries.insert(key.clone(), value.clone());
        }
    }

    /// Two-space indented JSON with a trailing newline
    pub fn to_pretty_string(&self) -> Result<String, serde_json::Error> {
        let mut text = serde_json::to_string_pretty(&self.entries)?;
        text.push('\n');
        Ok(text)
    }

    /// Replace the file at `path` with this document
    ///
    /// Written to a sibling file first and renamed over the target, so the
    /// target is either unchanged or fully rewritten.
    pub async fn save(&self, path: &Path) -> Result<(), ConfigFileError> {
        let write_err = |source| ConfigFileError::Write {
            path: path.to_path_buf(),
            source,
        };

        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "config".to_string());
        let staging = path.with_file_name(format!(".{}.scaffold-tmp", file_name));

        let text = self
            .to_pretty_string()
            .map_err(|source| ConfigFileError::Serialize {
                path: path.to_path_buf(),
                source,
            })?;
        tokio::fs::write(&staging, text)
            .await
            .map_err(write_err)?;
        tokio::fs::rename(&staging, path).await.map_err(write_err)?;
        Ok(())
    }
}

/// Applies key updates to config files on disk
#[derive(Debug, Clone, Copy)]
pub struct ConfigMutator {
    policy: CommentPolicy,
}

impl ConfigMutator {
    pub fn new(policy: CommentPolicy) -> Self {
        Self { policy }
    }

    /// Read `path`, apply `updates` in order, write it back
    ///
    /// The file is re-read on every call so edits made by external tools
    /// between steps are never lost.
    pub async fn update(
        &self,
        path: &Path,
        updates: &[(String, Value)],
    ) -> Result<ConfigDocument, ConfigFileError> {
        let mut document = ConfigDocument::load(path, self.policy).await?;
        document.apply(updates);
        document.save(path).await?;
        debug!("Updated {} keys in {}", updates.len(), path.display());
        Ok(document)
    }
}
