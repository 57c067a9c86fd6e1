//! `!`-prefixed builtin commands and their fixed texts.

use opsh_core::PlatformProfile;
use opsh_core::session::SessionSummary;
use strum::{Display, EnumString};

use crate::console::Tone;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROJECT_URL: &str = "https://github.com/ai-dev-2024/OpenSH";
pub const API_KEY_URL: &str = "https://aistudio.google.com/apikey";

const RULE: &str = "─────────────────────────────────────────";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Builtin {
    Help,
    Version,
    Credits,
    Auth,
    Uninstall,
}

pub type Lines = Vec<(Tone, String)>;

pub fn help() -> Lines {
    [
        ("!auth", "Change authentication method"),
        ("!version", "Show version info"),
        ("!credits", "Show credits"),
        ("!uninstall", "Remove OpenSH"),
        ("!help", "Show this help"),
        ("!<cmd>", "Run command directly (bypass AI)"),
        ("exit", "Exit OpenSH"),
        ("Ctrl+C", "Exit OpenSH"),
    ]
    .into_iter()
    .map(|(name, what)| (Tone::Accent, format!("{name:<10} - {what}")))
    .chain(std::iter::once((Tone::Plain, String::new())))
    .collect()
}

pub fn version(profile: &PlatformProfile, auth_label: &str) -> Lines {
    vec![
        (Tone::Plain, String::new()),
        (Tone::Heading, format!("OpenSH v{VERSION}")),
        (
            Tone::Plain,
            format!("Platform: {} ({})", profile.name, profile.shell_name()),
        ),
        (Tone::Plain, format!("Auth: {auth_label}")),
        (Tone::Plain, format!("GitHub: {PROJECT_URL}")),
        (Tone::Plain, String::new()),
    ]
}

pub fn credits() -> Lines {
    vec![
        (Tone::Accent, RULE.to_string()),
        (
            Tone::Heading,
            format!("OpenSH v{VERSION} - Open Natural Language Shell"),
        ),
        (Tone::Plain, "Based on nlsh by Junaid Mahmood".to_string()),
        (Tone::Plain, "https://github.com/junaid-mahmood/nlsh".to_string()),
        (Tone::Warning, "Support: https://ko-fi.com/ai_dev_2024".to_string()),
        (Tone::Accent, RULE.to_string()),
    ]
}

pub fn goodbye(summary: &SessionSummary) -> Lines {
    vec![
        (Tone::Accent, RULE.to_string()),
        (Tone::Plain, summary.to_string()),
        (Tone::Accent, "Goodbye! Thanks for using OpenSH ☕".to_string()),
        (Tone::Accent, RULE.to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsh_core::OsFamily;
    use std::time::Duration;

    fn text(lines: &Lines) -> String {
        lines.iter().map(|(_, l)| l.as_str()).collect::<Vec<_>>().join("\n")
    }

    #[test]
    fn test_builtin_names() {
        assert_eq!("auth".parse::<Builtin>().unwrap(), Builtin::Auth);
        assert_eq!("uninstall".parse::<Builtin>().unwrap(), Builtin::Uninstall);
        assert_eq!(Builtin::Credits.to_string(), "credits");
        assert!("ls".parse::<Builtin>().is_err());
    }

    #[test]
    fn test_help_lists_every_builtin() {
        let help = text(&help());
        for name in ["!auth", "!version", "!credits", "!uninstall", "!help", "!<cmd>", "exit"] {
            assert!(help.contains(name), "missing {name}");
        }
    }

    #[test]
    fn test_version_mentions_platform_and_auth() {
        let profile = PlatformProfile::for_os(OsFamily::Windows, "C:\\Users\\me");
        let version = text(&version(&profile, "api_key"));
        assert!(version.contains(&format!("OpenSH v{VERSION}")));
        assert!(version.contains("Platform: Windows (PowerShell)"));
        assert!(version.contains("Auth: api_key"));
    }

    #[test]
    fn test_goodbye_summary_line() {
        let summary = SessionSummary {
            elapsed: Duration::from_secs(125),
            commands_run: 4,
        };
        assert!(text(&goodbye(&summary)).contains("Session: 2m 5s | Commands: 4"));
    }
}
