//! Working-directory tracking for a run
//!
//! The navigator owns the run's logical working directory. Every command and
//! file operation is resolved against it, so the process-wide cwd is never
//! touched and restoration is a function of the recorded descents alone.

use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Errors from directory and file operations
#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("Failed to create directory {path}: {source}")]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to inspect {path}: {source}")]
    Inspect {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Cannot ascend {requested} levels after only {descended} descents")]
    AscendBeyondOrigin { requested: usize, descended: usize },

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Logical working directory with a record of every descent
#[derive(Debug, Clone)]
pub struct WorkspaceNavigator {
    origin: PathBuf,
    current: PathBuf,
    /// Directory we were in before each descent, innermost last
    trail: Vec<PathBuf>,
}

impl WorkspaceNavigator {
    pub fn new(origin: impl Into<PathBuf>) -> Self {
        let origin = origin.into();
        Self {
            current: origin.clone(),
            origin,
            trail: Vec::new(),
        }
    }

    /// Start from the directory the process was launched in
    pub fn from_process_cwd() -> io::Result<Self> {
        Ok(Self::new(std::env::current_dir()?))
    }

    /// Where the run started
    pub fn origin(&self) -> &Path {
        &self.origin
    }

    /// The current logical working directory
    pub fn current(&self) -> &Path {
        &self.current
    }

    /// Number of descents not yet undone
    pub fn depth(&self) -> usize {
        self.trail.len()
    }

    /// Resolve `path` against the current directory
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        self.current.join(path)
    }

    /// Whether `path` (relative to the current directory) exists
    ///
    /// Only a missing entry counts as absent; any other failure is an error.
    pub async fn exists(&self, path: impl AsRef<Path>) -> Result<bool, WorkspaceError> {
        let target = self.resolve(path);
        tokio::fs::try_exists(&target)
            .await
            .map_err(|source| WorkspaceError::Inspect {
                path: target,
                source,
            })
    }

    /// Create `path` and its ancestors; an existing directory is not an error
    pub async fn ensure_dir(&self, path: impl AsRef<Path>) -> Result<PathBuf, WorkspaceError> {
        let target = self.resolve(path);
        match tokio::fs::create_dir_all(&target).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::AlreadyExists && target.is_dir() => {}
            Err(source) => {
                return Err(WorkspaceError::Create {
                    path: target,
                    source,
                })
            }
        }
        debug!("Ensured directory {}", target.display());
        Ok(target)
    }

    /// Move into `path`, relative to the current directory
    pub async fn descend(&mut self, path: impl AsRef<Path>) -> Result<(), WorkspaceError> {
        let target = self.resolve(path);
        let is_dir = match tokio::fs::metadata(&target).await {
            Ok(metadata) => metadata.is_dir(),
            Err(e) if e.kind() == io::ErrorKind::NotFound => false,
            Err(source) => {
                return Err(WorkspaceError::Inspect {
                    path: target,
                    source,
                })
            }
        };
        if !is_dir {
            return Err(WorkspaceError::NotADirectory(target));
        }

        debug!("Descending into {}", target.display());
        let previous = std::mem::replace(&mut self.current, target);
        self.trail.push(previous);
        Ok(())
    }

    /// Undo the last `depth` descents
    ///
    /// Callers pass the depth their plan descended; a count that differs from
    /// the recorded descents is logged, and one that exceeds them is refused.
    pub fn ascend_to(&mut self, depth: usize) -> Result<&Path, WorkspaceError> {
        if depth > self.trail.len() {
            return Err(WorkspaceError::AscendBeyondOrigin {
                requested: depth,
                descended: self.trail.len(),
            });
        }
        if depth != self.trail.len() {
            warn!(
                "Ascending {} levels but {} descents are recorded",
                depth,
                self.trail.len()
            );
        }

        for _ in 0..depth {
            if let Some(previous) = self.trail.pop() {
                self.current = previous;
            }
        }
        debug!("Returned to {}", self.current.display());
        Ok(&self.current)
    }

    /// Write `contents` to `path` (relative to the current directory), creating parents
    pub async fn write_file(
        &self,
        path: impl AsRef<Path>,
        contents: &[u8],
    ) -> Result<PathBuf, WorkspaceError> {
        let target = self.resolve(path);
        if let Some(parent) = target.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| WorkspaceError::Create {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        tokio::fs::write(&target, contents)
            .await
            .map_err(|source| WorkspaceError::Write {
                path: target.clone(),
                source,
            })?;
        debug!("Wrote {} ({} bytes)", target.display(), contents.len());
        Ok(target)
    }
}
