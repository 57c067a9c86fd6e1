//! Per-session counters reported when the shell exits.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};

/// Explicit session state threaded through the loop.
///
/// The working directory is not duplicated here; it belongs to the process.
#[derive(Debug, Clone)]
pub struct SessionState {
    started_at: DateTime<Utc>,
    commands_run: u64,
    last_command: Option<String>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    pub fn starting_at(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            commands_run: 0,
            last_command: None,
        }
    }

    /// Counts an executed command and remembers it.
    pub fn record_command(&mut self, command: &str) {
        self.commands_run += 1;
        self.last_command = Some(command.to_string());
    }

    /// Remembers a resolved command without counting it as run.
    pub fn set_last_command(&mut self, command: &str) {
        self.last_command = Some(command.to_string());
    }

    pub fn commands_run(&self) -> u64 {
        self.commands_run
    }

    pub fn last_command(&self) -> Option<&str> {
        self.last_command.as_deref()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn summary_at(&self, now: DateTime<Utc>) -> SessionSummary {
        let elapsed = (now - self.started_at).to_std().unwrap_or_default();
        SessionSummary {
            elapsed,
            commands_run: self.commands_run,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary_at(Utc::now())
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// End-of-session report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub elapsed: Duration,
    pub commands_run: u64,
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secs = self.elapsed.as_secs();
        write!(
            f,
            "Session: {}m {}s | Commands: {}",
            secs / 60,
            secs % 60,
            self.commands_run
        )
    }
}
