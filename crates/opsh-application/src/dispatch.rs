//! Routing of one input line to the flow that handles it.

use opsh_core::PlatformProfile;
use opsh_core::classifier::{Classification, SHELL_ESCAPE_PREFIX, classify, is_exit_keyword};
use opsh_core::directory::{DirectoryTarget, parse_directory_change};

use crate::builtins::Builtin;

/// What the session loop should do with a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Nothing to do (blank line or a bare `!`).
    Empty,
    Exit,
    Builtin(Builtin),
    /// Run as-is, without translation.
    DirectExec(String),
    ChangeDirectory(DirectoryTarget),
    Translate(String),
}

/// Decides the flow for `line`. Pure; performs no I/O.
pub fn dispatch(line: &str, profile: &PlatformProfile) -> Action {
    let text = line.trim();
    if text.is_empty() {
        return Action::Empty;
    }

    if is_exit_keyword(text) {
        return Action::Exit;
    }

    if let Some(rest) = text.strip_prefix(SHELL_ESCAPE_PREFIX) {
        if let Ok(builtin) = rest.parse::<Builtin>() {
            return Action::Builtin(builtin);
        }
        let rest = rest.trim();
        if rest.is_empty() {
            return Action::Empty;
        }
        return Action::DirectExec(rest.to_string());
    }

    if let Some(target) = parse_directory_change(text, profile.dialect) {
        return Action::ChangeDirectory(target);
    }

    match classify(text, profile) {
        Classification::Literal => Action::DirectExec(text.to_string()),
        Classification::NaturalLanguage => Action::Translate(text.to_string()),
    }
}
