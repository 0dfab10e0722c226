//! Shell command execution

use async_trait::async_trait;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Error types for subprocess execution
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with code {code}")]
    Failed {
        command: String,
        code: i32,
        output: String,
    },

    #[error("`{command}` timed out after {secs} seconds")]
    Timeout { command: String, secs: u64 },
}

/// Trait for command execution - allows for different implementations
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` in `cwd` and return its stdout, or stderr when stdout is empty
    async fn run(&self, cwd: &Path, command: &str) -> Result<String, ExecError>;

    /// Run `primary`; on failure log a warning and run `fallback` instead
    ///
    /// The fallback's result is the overall result.
    async fn run_with_fallback(
        &self,
        cwd: &Path,
        primary: &str,
        fallback: &str,
    ) -> Result<String, ExecError> {
        match self.run(cwd, primary).await {
            Ok(output) => Ok(output),
            Err(e) => {
                warn!("`{}` failed ({}), trying `{}`", primary, e, fallback);
                self.run(cwd, fallback).await
            }
        }
    }
}

/// Runs commands through the platform shell
#[derive(Debug, Clone, Default)]
pub struct ShellRunner {
    /// Per-command timeout in seconds (None = wait indefinitely)
    timeout_secs: Option<u64>,
}

impl ShellRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = Some(timeout_secs);
        self
    }

    fn command(cwd: &Path, command: &str) -> Command {
        #[cfg(windows)]
        let mut cmd = {
            let mut cmd = Command::new("cmd");
            cmd.args(["/C", command]);
            cmd
        };
        #[cfg(not(windows))]
        let mut cmd = {
            let mut cmd = Command::new("sh");
            cmd.args(["-c", command]);
            cmd
        };
        cmd.current_dir(cwd).kill_on_drop(true);
        cmd
    }
}

#[async_trait]
impl CommandRunner for ShellRunner {
    async fn run(&self, cwd: &Path, command: &str) -> Result<String, ExecError> {
        debug!("Running `{}` in {}", command, cwd.display());

        let mut cmd = Self::command(cwd, command);
        let child = cmd.output();
        let result = match self.timeout_secs {
            Some(secs) => timeout(Duration::from_secs(secs), child)
                .await
                .map_err(|_| ExecError::Timeout {
                    command: command.to_string(),
                    secs,
                })?,
            None => child.await,
        };

        let output = result.map_err(|source| ExecError::Spawn {
            command: command.to_string(),
            source,
        })?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        if !output.status.success() {
            let code = output.status.code().unwrap_or(-1);
            let captured = pick_output(&stderr, &stdout);
            debug!("`{}` exited with code {}: {}", command, code, captured);
            return Err(ExecError::Failed {
                command: command.to_string(),
                code,
                output: captured,
            });
        }

        let captured = pick_output(&stdout, &stderr);
        debug!("`{}` returned {} bytes of output", command, captured.len());
        Ok(captured)
    }
}

/// First non-empty stream, trimmed
fn pick_output(preferred: &str, other: &str) -> String {
    let preferred = preferred.trim();
    if preferred.is_empty() {
        other.trim().to_string()
    } else {
        preferred.to_string()
    }
}

/// Quote a value for the shell `ShellRunner` uses on this platform
pub fn shell_escape(s: &str) -> String {
    if cfg!(windows) {
        cmd_quote(s)
    } else {
        posix_quote(s)
    }
}

fn is_plain(s: &str) -> bool {
    !s.is_empty()
        && s
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_=./:@".contains(c))
}

/// Single-quote a value for `sh -c`
pub fn posix_quote(s: &str) -> String {
    if is_plain(s) {
        s.to_string()
    } else {
        let escaped = s.replace('\'', "'\"'\"'");
        format!("'{}'", escaped)
    }
}

/// Double-quote a value for `cmd /C`; single quotes are literal there
pub fn cmd_quote(s: &str) -> String {
    if is_plain(s) {
        s.to_string()
    } else {
        format!("\"{}\"", s.replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records every command and fails the ones listed in `failing`
    struct RecordingRunner {
        failing: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl CommandRunner for RecordingRunner {
        async fn run(&self, _cwd: &Path, command: &str) -> Result<String, ExecError> {
            self.calls.lock().unwrap().push(command.to_string());
            if self.failing.contains(&command) {
                Err(ExecError::Failed {
                    command: command.to_string(),
                    code: 128,
                    output: "Permission denied (publickey)".to_string(),
                })
            } else {
                Ok(format!("ran {}", command))
            }
        }
    }

    #[tokio::test]
    async fn test_fallback_used_when_primary_fails() {
        let runner = RecordingRunner {
            failing: vec!["clone-ssh"],
            calls: Mutex::new(Vec::new()),
        };

        let result = runner
            .run_with_fallback(Path::new("."), "clone-ssh", "clone-https")
            .await
            .unwrap();

        assert_eq!(result, "ran clone-https");
        assert_eq!(*runner.calls.lock().unwrap(), vec!["clone-ssh", "clone-https"]);
    }

    #[tokio::test]
    async fn test_fallback_skipped_when_primary_succeeds() {
        let runner = RecordingRunner {
            failing: vec![],
            calls: Mutex::new(Vec::new()),
        };

        let result = runner
            .run_with_fallback(Path::new("."), "clone-ssh", "clone-https")
            .await
            .unwrap();

        assert_eq!(result, "ran clone-ssh");
        assert_eq!(*runner.calls.lock().unwrap(), vec!["clone-ssh"]);
    }

    #[tokio::test]
    async fn test_fallback_failure_propagates() {
        let runner = RecordingRunner {
            failing: vec!["clone-ssh", "clone-https"],
            calls: Mutex::new(Vec::new()),
        };

        let err = runner
            .run_with_fallback(Path::new("."), "clone-ssh", "clone-https")
            .await
            .unwrap_err();

        match err {
            ExecError::Failed { command, .. } => assert_eq!(command, "clone-https"),
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_runner_returns_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let output = ShellRunner::new()
            .run(dir.path(), "echo hello")
            .await
            .unwrap();
        assert_eq!(output, "hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_runner_falls_back_to_stderr() {
        let dir = tempfile::tempdir().unwrap();
        let output = ShellRunner::new()
            .run(dir.path(), "echo warning 1>&2")
            .await
            .unwrap();
        assert_eq!(output, "warning");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_runner_runs_in_cwd() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("marker.txt"), "x").unwrap();
        let output = ShellRunner::new().run(dir.path(), "ls").await.unwrap();
        assert!(output.contains("marker.txt"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_runner_non_zero_exit() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShellRunner::new()
            .run(dir.path(), "echo nope 1>&2; exit 3")
            .await
            .unwrap_err();

        match err {
            ExecError::Failed { code, output, .. } => {
                assert_eq!(code, 3);
                assert_eq!(output, "nope");
            }
            other => panic!("Expected Failed, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_shell_runner_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let err = ShellRunner::new()
            .with_timeout(1)
            .run(dir.path(), "sleep 5")
            .await
            .unwrap_err();
        assert!(matches!(err, ExecError::Timeout { secs: 1, .. }));
    }

    #[test]
    fn test_posix_quote() {
        assert_eq!(posix_quote("kata-ts"), "kata-ts");
        assert_eq!(posix_quote("week 3"), "'week 3'");
        assert_eq!(posix_quote("it's"), "'it'\"'\"'s'");
        assert_eq!(posix_quote(""), "''");
    }

    #[test]
    fn test_cmd_quote() {
        assert_eq!(cmd_quote("kata-ts"), "kata-ts");
        assert_eq!(cmd_quote("week 3"), "\"week 3\"");
        assert_eq!(cmd_quote("it's"), "\"it's\"");
        assert_eq!(cmd_quote("say \"hi\""), "\"say \\\"hi\\\"\"");
        assert_eq!(cmd_quote(""), "\"\"");
    }

    #[test]
    fn test_shell_escape_matches_platform_shell() {
        let quoted = shell_escape("Start lesson week 1");
        if cfg!(windows) {
            assert_eq!(quoted, "\"Start lesson week 1\"");
        } else {
            assert_eq!(quoted, "'Start lesson week 1'");
        }
    }
}
