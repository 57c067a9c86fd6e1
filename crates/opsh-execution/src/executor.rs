//! Shell command executor with timeout and interrupt support.

use std::future::Future;
use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use async_trait::async_trait;
use opsh_core::config::DEFAULT_COMMAND_TIMEOUT_SECS;
use opsh_core::directory::{DirectoryChangeError, DirectoryTarget};
use opsh_core::exec::{CommandOutput, CommandRunner};
use opsh_core::{PlatformProfile, ShellDialect};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;

use crate::directory::change_directory;

/// Runs commands through the platform's host shell.
///
/// Commands inherit this process's working directory, which only changes
/// through [`CommandRunner::change_directory`].
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    profile: PlatformProfile,
    timeout: Duration,
}

enum Outcome {
    Exited(std::io::Result<ExitStatus>, String, String),
    TimedOut,
    Interrupted,
}

impl ShellExecutor {
    pub fn new(profile: PlatformProfile) -> Self {
        Self {
            profile,
            timeout: Duration::from_secs(DEFAULT_COMMAND_TIMEOUT_SECS),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn shell_command(&self, command: &str) -> tokio::process::Command {
        let mut cmd = match self.profile.dialect {
            ShellDialect::PowerShell => {
                let mut cmd = tokio::process::Command::new("powershell");
                cmd.args(["-NoProfile", "-NonInteractive", "-Command", command]);
                cmd
            }
            ShellDialect::Posix => {
                let mut cmd = tokio::process::Command::new("sh");
                cmd.args(["-c", command]);
                cmd
            }
        };
        // Own process group so a timeout or interrupt can take down the
        // whole pipeline. A background group cannot read the terminal.
        #[cfg(unix)]
        cmd.process_group(0);
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        cmd
    }

    /// Runs `command`, killing it when the deadline passes or `interrupt`
    /// resolves, whichever comes first.
    pub async fn run_with_interrupt<F>(&self, command: &str, interrupt: F) -> CommandOutput
    where
        F: Future<Output = ()> + Send,
    {
        tracing::debug!(command = %command, timeout = ?self.timeout, "Spawning shell command");

        let mut child = match self.shell_command(command).spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!("Failed to spawn shell for {:?}: {}", command, e);
                return CommandOutput::spawn_failed(e);
            }
        };

        // Taken before waiting; `Child::id` is gone once the shell is reaped
        let pid = child.id();
        let mut stdout_reader = child.stdout.take().map(spawn_reader);
        let mut stderr_reader = child.stderr.take().map(spawn_reader);

        // Background jobs keep the pipes open after the shell exits, so the
        // readers finish under the same deadline as the shell.
        let finished = async {
            let status = child.wait().await;
            let stdout = collect(stdout_reader.as_mut()).await;
            let stderr = collect(stderr_reader.as_mut()).await;
            (status, stdout, stderr)
        };

        let outcome = tokio::select! {
            (status, stdout, stderr) = finished => Outcome::Exited(status, stdout, stderr),
            _ = tokio::time::sleep(self.timeout) => Outcome::TimedOut,
            _ = interrupt => Outcome::Interrupted,
        };

        match outcome {
            Outcome::Exited(status, stdout, stderr) => {
                match status {
                    Ok(status) => {
                        tracing::debug!(code = ?status.code(), "Shell command finished");
                        CommandOutput::exited(stdout, stderr, status.code())
                    }
                    Err(e) => CommandOutput::exited(stdout, format!("{stderr}{e}\n"), None),
                }
            }
            Outcome::TimedOut => {
                tracing::warn!(command = %command, "Command timed out after {:?}", self.timeout);
                terminate(&mut child, pid, stdout_reader, stderr_reader).await;
                CommandOutput::timed_out(self.timeout)
            }
            Outcome::Interrupted => {
                tracing::info!(command = %command, "Command interrupted");
                terminate(&mut child, pid, stdout_reader, stderr_reader).await;
                CommandOutput::interrupted()
            }
        }
    }
}

fn spawn_reader<R>(mut stream: R) -> JoinHandle<Vec<u8>>
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut buf = Vec::new();
        // A read error ends capture; whatever arrived is kept
        let _ = stream.read_to_end(&mut buf).await;
        buf
    })
}

async fn collect(reader: Option<&mut JoinHandle<Vec<u8>>>) -> String {
    match reader {
        Some(handle) => handle
            .await
            .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
            .unwrap_or_default(),
        None => String::new(),
    }
}

/// Kills the shell's process tree, reaps the shell, then drops the readers.
async fn terminate(
    child: &mut tokio::process::Child,
    pid: Option<u32>,
    stdout_reader: Option<JoinHandle<Vec<u8>>>,
    stderr_reader: Option<JoinHandle<Vec<u8>>>,
) {
    if let Some(pid) = pid {
        kill_tree(pid);
    }
    if let Err(e) = child.kill().await {
        tracing::debug!("Kill failed (process may have exited): {}", e);
    }
    for reader in [stdout_reader, stderr_reader].into_iter().flatten() {
        reader.abort();
    }
}

/// Kills every process in the group led by `pid`.
#[cfg(unix)]
fn kill_tree(pid: u32) {
    let Ok(pgid) = libc::pid_t::try_from(pid) else {
        return;
    };
    // SAFETY: killpg only sends a signal; the group was created for this shell
    let rc = unsafe { libc::killpg(pgid, libc::SIGKILL) };
    if rc != 0 {
        tracing::debug!(
            "killpg({}) failed: {}",
            pgid,
            std::io::Error::last_os_error()
        );
    }
}

/// Kills `pid` and its descendants.
#[cfg(windows)]
fn kill_tree(pid: u32) {
    let result = std::process::Command::new("taskkill")
        .args(["/T", "/F", "/PID", &pid.to_string()])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    if let Err(e) = result {
        tracing::debug!("taskkill for {} failed: {}", pid, e);
    }
}

#[cfg(not(any(unix, windows)))]
fn kill_tree(_pid: u32) {}

/// Resolves on Ctrl-C. Never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::debug!("Ctrl-C handler unavailable: {}", e);
        std::future::pending::<()>().await;
    }
}

#[async_trait]
impl CommandRunner for ShellExecutor {
    async fn run(&self, command: &str) -> CommandOutput {
        self.run_with_interrupt(command, ctrl_c()).await
    }

    fn change_directory(&self, target: &DirectoryTarget) -> Result<PathBuf, DirectoryChangeError> {
        change_directory(target, &self.profile)
    }

    fn current_dir(&self) -> PathBuf {
        std::env::current_dir().unwrap_or_else(|_| self.profile.home.clone())
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use opsh_core::OsFamily;
    use opsh_core::exec::ExitState;

    fn executor() -> ShellExecutor {
        ShellExecutor::new(PlatformProfile::for_os(OsFamily::Linux, "/tmp"))
    }

    #[tokio::test]
    async fn test_captures_stdout() {
        let output = executor().run("echo hello").await;
        assert_eq!(output.stdout, "hello\n");
        assert!(output.stderr.is_empty());
        assert!(output.success());
    }

    #[tokio::test]
    async fn test_captures_stderr_and_exit_code() {
        let output = executor().run("echo oops >&2; exit 3").await;
        assert_eq!(output.stderr, "oops\n");
        assert_eq!(output.state, ExitState::Exited(Some(3)));
        assert_eq!(output.combined(), "oops\n");
    }

    #[tokio::test]
    async fn test_invalid_utf8_is_replaced() {
        let output = executor().run("printf 'a\\377b'").await;
        assert_eq!(output.stdout, "a\u{FFFD}b");
    }

    #[tokio::test]
    async fn test_timeout_kills_command() {
        let started = std::time::Instant::now();
        let output = executor()
            .with_timeout(Duration::from_millis(200))
            .run("sleep 5; echo late")
            .await;

        assert_eq!(output.state, ExitState::TimedOut);
        assert!(output.stdout.is_empty());
        assert!(output.stderr.starts_with("Command timed out after"));
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_interrupt_kills_command() {
        let output = executor()
            .run_with_interrupt("sleep 5", tokio::time::sleep(Duration::from_millis(100)))
            .await;
        assert_eq!(output.state, ExitState::Interrupted);
        assert_eq!(output.stderr, "Command interrupted\n");
    }

    #[tokio::test]
    async fn test_background_job_does_not_outlive_deadline() {
        let started = std::time::Instant::now();
        let output = executor()
            .with_timeout(Duration::from_millis(500))
            .run("sleep 8 & echo started")
            .await;

        assert_eq!(output.state, ExitState::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_interrupt_while_background_job_holds_output() {
        let started = std::time::Instant::now();
        let output = executor()
            .run_with_interrupt(
                "sleep 8 & echo started",
                tokio::time::sleep(Duration::from_millis(300)),
            )
            .await;

        assert_eq!(output.state, ExitState::Interrupted);
        assert!(started.elapsed() < Duration::from_secs(4));
    }

    #[tokio::test]
    async fn test_timeout_kills_whole_command_tree() {
        let dir = tempfile::TempDir::new().unwrap();
        let marker = dir.path().join("marker");
        let command = format!("sh -c 'sleep 1; touch {}'; true", marker.display());

        let output = executor()
            .with_timeout(Duration::from_millis(300))
            .run(&command)
            .await;
        assert_eq!(output.state, ExitState::TimedOut);

        tokio::time::sleep(Duration::from_millis(1800)).await;
        assert!(!marker.exists());
    }

    #[tokio::test]
    async fn test_stdin_is_not_the_terminal() {
        let output = executor()
            .with_timeout(Duration::from_secs(5))
            .run("read line; echo \"status $?\"")
            .await;
        assert_eq!(output.stdout, "status 1\n");
    }

    #[tokio::test]
    async fn test_nonexistent_command_reports_through_shell() {
        let output = executor().run("definitely-not-a-command-opsh").await;
        assert_eq!(output.state, ExitState::Exited(Some(127)));
        assert!(!output.stderr.is_empty());
    }
}
