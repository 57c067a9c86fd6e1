//! Directory-change detection and target normalization.
//!
//! A spawned shell cannot change the parent's working directory, so `cd` and
//! its dialect equivalents are recognized here and performed in-process by
//! the executor.

use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use thiserror::Error;

use crate::classifier::starts_with_ignore_case;
use crate::platform::{PlatformProfile, ShellDialect};

/// Where a directory-change command wants to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectoryTarget {
    /// Bare verb, e.g. `cd`.
    Home,
    /// Raw argument as typed, quotes and shorthand not yet expanded.
    Path(String),
}

/// Error for a directory change whose target is unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DirectoryChangeError {
    #[error("cd: {path}: No such file or directory")]
    NotFound { path: String },

    #[error("cd: {path}: Not a directory")]
    NotADirectory { path: String },

    #[error("cd: {path}: {message}")]
    Inaccessible { path: String, message: String },
}

impl DirectoryChangeError {
    pub fn path(&self) -> &str {
        match self {
            Self::NotFound { path } | Self::NotADirectory { path } | Self::Inaccessible { path, .. } => {
                path
            }
        }
    }
}

/// PowerShell `Set-Location` parameter names that may precede the path.
const PATH_PARAMETERS: [&str; 2] = ["-LiteralPath", "-Path"];

/// Parses `command` as a directory change for `dialect`.
///
/// Returns `None` if the command does not start with one of the dialect's
/// directory verbs followed by whitespace or end of input. PowerShell also
/// accepts a path glued to the verb (`cd\\`, `cd..`).
pub fn parse_directory_change(command: &str, dialect: ShellDialect) -> Option<DirectoryTarget> {
    let command = command.trim();

    for verb in dialect.tables().directory_verbs {
        if !starts_with_ignore_case(command, verb) {
            continue;
        }
        let rest = &command[verb.len()..];
        let attached = dialect == ShellDialect::PowerShell && rest.starts_with(['\\', '/', '.']);
        if !rest.is_empty() && !rest.starts_with(char::is_whitespace) && !attached {
            continue;
        }

        let mut argument = rest.trim();
        if dialect == ShellDialect::PowerShell {
            for param in PATH_PARAMETERS {
                if starts_with_ignore_case(argument, param)
                    && argument[param.len()..].starts_with(char::is_whitespace)
                {
                    argument = argument[param.len()..].trim_start();
                    break;
                }
            }
        }

        return Some(if argument.is_empty() {
            DirectoryTarget::Home
        } else {
            DirectoryTarget::Path(argument.to_string())
        });
    }

    None
}

/// Removes one pair of matching surrounding quotes.
pub fn strip_quotes(text: &str) -> &str {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return &text[1..text.len() - 1];
        }
    }
    text
}

static POSIX_VAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("valid POSIX variable pattern")
});

static POWERSHELL_VAR: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\$env:([A-Za-z_][A-Za-z0-9_]*)|%([A-Za-z_][A-Za-z0-9_]*)%|\$\{([A-Za-z_][A-Za-z0-9_]*)\}|\$([A-Za-z_][A-Za-z0-9_]*)")
        .expect("valid PowerShell variable pattern")
});

/// Expands environment-variable references using `lookup`.
///
/// Unknown variables are left as written.
pub fn expand_env_vars<F>(text: &str, dialect: ShellDialect, lookup: F) -> String
where
    F: Fn(&str) -> Option<String>,
{
    let pattern = match dialect {
        ShellDialect::Posix => &*POSIX_VAR,
        ShellDialect::PowerShell => &*POWERSHELL_VAR,
    };

    pattern
        .replace_all(text, |caps: &Captures<'_>| {
            let name = caps
                .iter()
                .skip(1)
                .flatten()
                .next()
                .map(|m| m.as_str())
                .unwrap_or_default();
            lookup(name).unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Expands a leading `~` to the profile's home directory.
pub fn expand_home(text: &str, profile: &PlatformProfile) -> String {
    if text == "~" {
        return profile.home.display().to_string();
    }
    if let Some(rest) = text.strip_prefix("~/").or_else(|| text.strip_prefix("~\\")) {
        return profile.home.join(rest).display().to_string();
    }
    text.to_string()
}

/// Turns a parsed target into the path to change into.
///
/// Quotes are stripped first, then environment variables and `~` are
/// expanded. On Windows forward slashes are normalized to backslashes.
pub fn resolve_target<F>(target: &DirectoryTarget, profile: &PlatformProfile, lookup: F) -> PathBuf
where
    F: Fn(&str) -> Option<String>,
{
    let raw = match target {
        DirectoryTarget::Home => return profile.home.clone(),
        DirectoryTarget::Path(raw) => raw,
    };

    let unquoted = strip_quotes(raw.trim());
    let expanded = expand_env_vars(unquoted, profile.dialect, lookup);
    let mut path = expand_home(&expanded, profile);
    if profile.is_windows() {
        path = path.replace('/', "\\");
    }
    PathBuf::from(path)
}
