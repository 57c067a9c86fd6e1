//! The interactive read, dispatch, translate, confirm and execute loop.

use std::path::Path;
use std::sync::Arc;

use opsh_core::PlatformProfile;
use opsh_core::TranslationError;
use opsh_core::context::ContextBuffer;
use opsh_core::directory::{DirectoryTarget, parse_directory_change};
use opsh_core::exec::{CommandRunner, ExitState};
use opsh_core::session::{SessionState, SessionSummary};
use opsh_infrastructure::Installation;
use opsh_interaction::CommandResolver;

use crate::auth_setup::{AuthOutcome, AuthSetup};
use crate::builtins::{self, Builtin, Lines};
use crate::console::{Console, InputEvent, Prompt, Tone};
use crate::dispatch::{Action, dispatch};
use crate::interrupt::InterruptSource;

/// Longest error detail shown for an unexpected translation failure.
const MAX_ERROR_CHARS: usize = 100;

/// Collaborators the loop drives.
pub struct SessionServices {
    pub runner: Arc<dyn CommandRunner>,
    pub resolver: CommandResolver,
    pub auth: AuthSetup,
    pub installation: Installation,
    pub interrupt: Arc<dyn InterruptSource>,
}

/// Whether the loop keeps reading after a flow completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    End,
}

enum Confirmation {
    Accepted,
    Declined,
    Interrupted,
    Closed,
}

/// One interactive session.
///
/// Owns the context buffer and counters; the working directory belongs to
/// the process and is read through the runner.
pub struct SessionLoop<C: Console> {
    console: C,
    profile: PlatformProfile,
    services: SessionServices,
    context: ContextBuffer,
    state: SessionState,
}

impl<C: Console> SessionLoop<C> {
    pub fn new(console: C, profile: PlatformProfile, services: SessionServices) -> Self {
        Self {
            console,
            profile,
            services,
            context: ContextBuffer::new(),
            state: SessionState::new(),
        }
    }

    pub fn context(&self) -> &ContextBuffer {
        &self.context
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn into_console(self) -> C {
        self.console
    }

    /// Reads and handles lines until the session ends.
    pub async fn run(&mut self) -> SessionSummary {
        self.console
            .print(Tone::Heading, "OpenSH ready! Type naturally or use !help");
        self.console.blank_line();

        loop {
            let cwd = self.services.runner.current_dir();
            let location = location_label(&cwd);
            match self.console.read_line(Prompt::Command {
                location: &location,
            }) {
                InputEvent::Line(line) => {
                    if self.handle_line(&line).await == Flow::End {
                        break;
                    }
                }
                InputEvent::Interrupted | InputEvent::Eof => {
                    self.exit_flow();
                    break;
                }
            }
        }

        self.state.summary()
    }

    /// Handles one line of input.
    pub async fn handle_line(&mut self, line: &str) -> Flow {
        let action = dispatch(line, &self.profile);
        tracing::debug!(?action, "Dispatched input");

        match action {
            Action::Empty => Flow::Continue,
            Action::Exit => self.exit_flow(),
            Action::Builtin(builtin) => self.builtin_flow(builtin),
            Action::DirectExec(command) => {
                self.execute(&command).await;
                Flow::Continue
            }
            Action::ChangeDirectory(target) => {
                self.change_directory(&target);
                Flow::Continue
            }
            Action::Translate(request) => self.translate_flow(&request).await,
        }
    }

    /// Translates a single request, confirms and runs it. Used by `opsh -c`.
    ///
    /// Returns true if a command was run.
    pub async fn run_once(&mut self, request: &str) -> bool {
        let command = match self.resolve(request).await {
            Some(command) => command,
            None => return false,
        };

        match self.confirm(&command) {
            Confirmation::Accepted => {}
            _ => return false,
        }

        if let Some(target) = parse_directory_change(&command, self.profile.dialect) {
            return match self.services.runner.change_directory(&target) {
                Ok(path) => {
                    self.console
                        .print(Tone::Plain, &format!("Changed to: {}", path.display()));
                    true
                }
                Err(e) => {
                    self.console.print(Tone::Error, &e.to_string());
                    false
                }
            };
        }

        self.execute(&command).await;
        true
    }

    fn exit_flow(&mut self) -> Flow {
        let summary = self.state.summary();
        tracing::info!(commands = summary.commands_run, "Session ended");
        self.console.blank_line();
        self.print_lines(builtins::goodbye(&summary));
        self.console.blank_line();
        Flow::End
    }

    fn builtin_flow(&mut self, builtin: Builtin) -> Flow {
        match builtin {
            Builtin::Help => self.print_lines(builtins::help()),
            Builtin::Version => {
                let label = self.services.auth.auth_label();
                self.print_lines(builtins::version(&self.profile, &label));
            }
            Builtin::Credits => {
                self.console.blank_line();
                self.print_lines(builtins::credits());
                self.console.blank_line();
            }
            Builtin::Auth => match self.services.auth.run(&mut self.console) {
                Ok(AuthOutcome::Configured) => {
                    self.console.print(Tone::Success, "✓ Authentication updated!");
                    self.console.blank_line();
                }
                Ok(AuthOutcome::Skipped | AuthOutcome::Abandoned) => {}
                Err(e) => self.console.print(Tone::Error, &format!("Error: {e}")),
            },
            Builtin::Uninstall => return self.uninstall_flow(),
        }
        Flow::Continue
    }

    fn uninstall_flow(&mut self) -> Flow {
        let answer = match self.console.read_line(Prompt::Question {
            text: "Remove OpenSH? [y/N]",
        }) {
            InputEvent::Line(answer) => answer,
            InputEvent::Interrupted => return Flow::Continue,
            InputEvent::Eof => return self.exit_flow(),
        };
        if !answer.trim().eq_ignore_ascii_case("y") {
            return Flow::Continue;
        }

        match self.services.installation.remove() {
            Ok(_) => {
                self.console.print(Tone::Success, "✓ OpenSH uninstalled");
                Flow::End
            }
            Err(e) => {
                tracing::warn!("Uninstall failed: {}", e);
                self.console
                    .print(Tone::Error, &format!("Uninstall failed: {e}"));
                Flow::Continue
            }
        }
    }

    async fn translate_flow(&mut self, request: &str) -> Flow {
        let command = match self.resolve(request).await {
            Some(command) => command,
            None => return Flow::Continue,
        };

        match self.confirm(&command) {
            Confirmation::Accepted => {
                self.execute(&command).await;
                Flow::Continue
            }
            Confirmation::Declined => {
                self.console.print(Tone::Muted, "Cancelled");
                Flow::Continue
            }
            Confirmation::Interrupted => Flow::Continue,
            Confirmation::Closed => self.exit_flow(),
        }
    }

    /// Calls the translator with the thinking indicator shown.
    ///
    /// Failures and interrupts are reported here and yield `None`.
    async fn resolve(&mut self, request: &str) -> Option<String> {
        let cwd = self.services.runner.current_dir();
        self.console.set_thinking(true);
        let result = tokio::select! {
            result = self.services.resolver.resolve(request, &cwd, &self.profile, &self.context) => Some(result),
            _ = self.services.interrupt.wait() => None,
        };
        self.console.set_thinking(false);

        match result {
            Some(Ok(command)) => {
                self.state.set_last_command(&command);
                Some(command)
            }
            Some(Err(e)) => {
                self.console.print(Tone::Error, &translation_error_message(&e));
                None
            }
            None => {
                tracing::debug!("Translation interrupted");
                self.console.print(Tone::Muted, "Cancelled");
                None
            }
        }
    }

    fn confirm(&mut self, command: &str) -> Confirmation {
        match self.console.read_line(Prompt::Confirm { command }) {
            InputEvent::Line(reply) if reply.trim().is_empty() => Confirmation::Accepted,
            InputEvent::Line(_) => Confirmation::Declined,
            InputEvent::Interrupted => Confirmation::Interrupted,
            InputEvent::Eof => Confirmation::Closed,
        }
    }

    /// Runs a command, or changes directory in-process if it is a `cd`.
    async fn execute(&mut self, command: &str) {
        if let Some(target) = parse_directory_change(command, self.profile.dialect) {
            self.change_directory(&target);
            return;
        }

        tracing::info!(command = %command, "Running command");
        let output = self.services.runner.run(command).await;
        self.console.write_output(&output);

        if output.state == ExitState::Interrupted {
            return;
        }
        self.context.append(command, &output.combined());
        self.state.record_command(command);
    }

    fn change_directory(&mut self, target: &DirectoryTarget) {
        match self.services.runner.change_directory(target) {
            Ok(path) => tracing::debug!("Working directory is now {}", path.display()),
            Err(e) => {
                tracing::debug!("Directory change failed: {}", e);
                self.console.print(Tone::Error, &e.to_string());
            }
        }
    }

    fn print_lines(&mut self, lines: Lines) {
        for (tone, text) in lines {
            self.console.print(tone, &text);
        }
    }
}

/// Message shown when translation fails.
pub fn translation_error_message(err: &TranslationError) -> String {
    match err {
        TranslationError::RateLimited(_) => "Rate limit hit - wait a moment and try again".to_string(),
        e if e.is_auth() => "Auth error - run !auth to update your credentials".to_string(),
        e => {
            let detail: String = e.to_string().chars().take(MAX_ERROR_CHARS).collect();
            format!("Error: {detail}")
        }
    }
}

/// Name shown in the prompt for `cwd`.
pub fn location_label(cwd: &Path) -> String {
    cwd.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| cwd.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_translation_error_messages() {
        assert_eq!(
            translation_error_message(&TranslationError::RateLimited("429".into())),
            "Rate limit hit - wait a moment and try again"
        );
        assert_eq!(
            translation_error_message(&TranslationError::AuthMissing),
            "Auth error - run !auth to update your credentials"
        );
        assert_eq!(
            translation_error_message(&TranslationError::AuthInvalid("bad".into())),
            "Auth error - run !auth to update your credentials"
        );
        assert_eq!(
            translation_error_message(&TranslationError::Network("reset".into())),
            "Error: Network error: reset"
        );
    }

    #[test]
    fn test_long_error_is_truncated() {
        let message = translation_error_message(&TranslationError::Malformed("é".repeat(500)));
        assert_eq!(message.chars().count(), "Error: ".len() + MAX_ERROR_CHARS);
    }

    #[test]
    fn test_location_label() {
        assert_eq!(location_label(Path::new("/home/me/projects")), "projects");
        assert_eq!(location_label(Path::new("/")), "/");
    }
}
