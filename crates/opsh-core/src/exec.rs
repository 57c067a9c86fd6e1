//! Command execution contract.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;

use crate::directory::{DirectoryChangeError, DirectoryTarget};

/// How a child command ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitState {
    /// Process exited; `None` when killed by a signal.
    Exited(Option<i32>),
    /// Deadline expired and the process was killed.
    TimedOut,
    /// The user interrupted the command and the process was killed.
    Interrupted,
    /// The host shell could not be started.
    SpawnFailed,
}

/// Captured result of one command. Failures are carried as data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub state: ExitState,
}

impl CommandOutput {
    pub fn exited(stdout: String, stderr: String, code: Option<i32>) -> Self {
        Self {
            stdout,
            stderr,
            state: ExitState::Exited(code),
        }
    }

    /// Partial output is discarded in favor of the timeout message.
    pub fn timed_out(limit: Duration) -> Self {
        Self {
            stdout: String::new(),
            stderr: format!("Command timed out after {} seconds\n", limit.as_secs()),
            state: ExitState::TimedOut,
        }
    }

    pub fn interrupted() -> Self {
        Self {
            stdout: String::new(),
            stderr: "Command interrupted\n".to_string(),
            state: ExitState::Interrupted,
        }
    }

    pub fn spawn_failed(message: impl std::fmt::Display) -> Self {
        Self {
            stdout: String::new(),
            stderr: format!("Failed to start shell: {message}\n"),
            state: ExitState::SpawnFailed,
        }
    }

    /// stdout followed by stderr, as recorded in the context buffer.
    pub fn combined(&self) -> String {
        format!("{}{}", self.stdout, self.stderr)
    }

    pub fn success(&self) -> bool {
        self.state == ExitState::Exited(Some(0))
    }
}

/// Runs commands through the host shell and owns the process working directory.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `command` in a child shell under the configured deadline.
    async fn run(&self, command: &str) -> CommandOutput;

    /// Changes the working directory of this process.
    fn change_directory(&self, target: &DirectoryTarget) -> Result<PathBuf, DirectoryChangeError>;

    fn current_dir(&self) -> PathBuf;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_combined_output_order() {
        let output = CommandOutput::exited("out\n".into(), "err\n".into(), Some(1));
        assert_eq!(output.combined(), "out\nerr\n");
        assert!(!output.success());
    }

    #[test]
    fn test_timeout_message() {
        let output = CommandOutput::timed_out(Duration::from_secs(60));
        assert_eq!(output.stderr, "Command timed out after 60 seconds\n");
        assert!(output.stdout.is_empty());
        assert_eq!(output.state, ExitState::TimedOut);
    }
}
