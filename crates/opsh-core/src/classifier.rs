//! Literal-command vs natural-language classification.

use crate::platform::PlatformProfile;

/// Inputs that end the session instead of being executed or translated.
pub const EXIT_KEYWORDS: [&str; 4] = ["exit", "quit", "bye", "goodbye"];

/// Prefix that forces literal execution (and marks builtins).
pub const SHELL_ESCAPE_PREFIX: char = '!';

/// Outcome of [`classify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Already shell syntax; run as-is.
    Literal,
    /// Needs translation before it can run.
    NaturalLanguage,
}

/// Returns true if `text` is one of the exit keywords, ignoring case.
pub fn is_exit_keyword(text: &str) -> bool {
    EXIT_KEYWORDS.iter().any(|kw| text.eq_ignore_ascii_case(kw))
}

/// Case-insensitive ASCII prefix test that never splits a UTF-8 sequence.
pub(crate) fn starts_with_ignore_case(text: &str, prefix: &str) -> bool {
    text.get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}

/// Classifies one line of (already trimmed) user input.
///
/// Input starting with [`SHELL_ESCAPE_PREFIX`] is handled by the caller and is
/// not expected here. Exit keywords classify as `NaturalLanguage`: they are a
/// control signal for the session loop, never something to execute.
///
/// Natural-language text that happens to begin with a starter token (for
/// example "grep the logs for errors") classifies as `Literal`.
pub fn classify(text: &str, profile: &PlatformProfile) -> Classification {
    if is_exit_keyword(text) {
        return Classification::NaturalLanguage;
    }

    let tables = profile.tables();

    if tables
        .literal_commands
        .iter()
        .any(|cmd| text.eq_ignore_ascii_case(cmd))
    {
        return Classification::Literal;
    }

    if tables
        .starter_tokens
        .iter()
        .any(|starter| starts_with_ignore_case(text, starter))
    {
        return Classification::Literal;
    }

    Classification::NaturalLanguage
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::OsFamily;

    fn linux() -> PlatformProfile {
        PlatformProfile::for_os(OsFamily::Linux, "/home/me")
    }

    fn windows() -> PlatformProfile {
        PlatformProfile::for_os(OsFamily::Windows, "C:\\Users\\me")
    }

    #[test]
    fn test_literal_table_any_case() {
        for profile in [linux(), windows()] {
            for cmd in profile.tables().literal_commands {
                assert_eq!(classify(cmd, &profile), Classification::Literal, "{cmd}");
                assert_eq!(
                    classify(&cmd.to_uppercase(), &profile),
                    Classification::Literal,
                    "{cmd} upper"
                );
            }
        }
    }

    #[test]
    fn test_starter_prefixes() {
        let profile = linux();
        for input in [
            "git status",
            "sudo apt update",
            "./run.sh",
            "~/bin/tool",
            "$HOME",
            "| grep foo",
            "&& echo hi",
            "; ls",
            "GIT log",
        ] {
            assert_eq!(classify(input, &profile), Classification::Literal, "{input}");
        }
    }

    #[test]
    fn test_powershell_cmdlets() {
        let profile = windows();
        for input in ["Get-ChildItem -Recurse", "get-process", "Set-Location C:\\", ".\\build.ps1"] {
            assert_eq!(classify(input, &profile), Classification::Literal, "{input}");
        }
        // Cmdlet prefixes are not POSIX starters
        assert_eq!(classify("Get-ChildItem", &linux()), Classification::NaturalLanguage);
    }

    #[test]
    fn test_natural_language() {
        let profile = linux();
        for input in [
            "list all python files",
            "show me disk usage",
            "what is my ip address",
            "delete the file I just created",
            "lsof",
        ] {
            assert_eq!(classify(input, &profile), Classification::NaturalLanguage, "{input}");
        }
    }

    #[test]
    fn test_exit_keywords_are_not_literal() {
        for kw in ["exit", "QUIT", "Bye", "goodbye"] {
            assert!(is_exit_keyword(kw));
            assert_eq!(classify(kw, &linux()), Classification::NaturalLanguage);
            assert_eq!(classify(kw, &windows()), Classification::NaturalLanguage);
        }
        assert!(!is_exit_keyword("exit now"));
    }

    #[test]
    fn test_starter_false_positives_are_kept() {
        // Sentences that open with a starter token run as-is
        assert_eq!(classify("grep the logs for errors", &linux()), Classification::Literal);
        assert_eq!(classify("echo is a command right", &linux()), Classification::Literal);
        assert_eq!(classify("git me the latest changes", &windows()), Classification::Literal);
        // "find" is only a bare command, so a sentence starting with it is translated
        assert_eq!(classify("find my lost files", &linux()), Classification::NaturalLanguage);
    }

    #[test]
    fn test_non_ascii_input_does_not_panic() {
        assert_eq!(classify("ñ", &linux()), Classification::NaturalLanguage);
        assert_eq!(classify("日本語のファイルを探す", &windows()), Classification::NaturalLanguage);
    }
}
