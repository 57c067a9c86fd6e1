use std::path::Path;

use opsh_core::context::ContextBuffer;
use opsh_core::{PlatformProfile, ShellDialect};

const POWERSHELL_PREAMBLE: &str = "\
You are a shell command translator. Convert the user's request into a PowerShell command for Windows.
Use PowerShell cmdlets and syntax. Examples:
- List files: Get-ChildItem or dir
- Find files: Get-ChildItem -Recurse -Filter \"*.py\"
- Current directory: Get-Location or pwd
- Remove file: Remove-Item
- Copy file: Copy-Item
- Move file: Move-Item
- Create directory: New-Item -ItemType Directory
- View file: Get-Content or type
- Clear screen: Clear-Host or cls
- Process list: Get-Process
- Kill process: Stop-Process -Name \"name\"
- Network info: ipconfig, Test-NetConnection";

const RULES: &str = "\
Rules:
- Output ONLY the command, nothing else
- No explanations, no markdown, no backticks
- If unclear, make a reasonable assumption
- Prefer simple, common commands
- Use the command history for context (e.g., \"do that again\", \"delete the file I just created\")";

fn preamble(profile: &PlatformProfile) -> String {
    match profile.dialect {
        ShellDialect::PowerShell => POWERSHELL_PREAMBLE.to_string(),
        ShellDialect::Posix => format!(
            "You are a shell command translator. Convert the user's request into a shell command for {} on {}.",
            profile.shell_name(),
            profile.name
        ),
    }
}

/// Builds the translation prompt. The same inputs always give the same prompt.
pub fn build_prompt(
    user_text: &str,
    cwd: &Path,
    profile: &PlatformProfile,
    context: &ContextBuffer,
) -> String {
    format!(
        "{preamble}\nCurrent directory: {cwd}\n\nRecent command history:\n{history}\n\n{RULES}\n\nUser request: {user_text}",
        preamble = preamble(profile),
        cwd = cwd.display(),
        history = context.snapshot(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsh_core::OsFamily;
    use opsh_core::context::EMPTY_CONTEXT_SENTINEL;

    #[test]
    fn test_posix_prompt_layout() {
        let profile = PlatformProfile::for_os(OsFamily::Linux, "/home/me");
        let mut context = ContextBuffer::new();
        context.append("ls", "a.txt\nb.txt");

        let prompt = build_prompt("show hidden files", Path::new("/srv/app"), &profile, &context);

        assert!(prompt.starts_with("You are a shell command translator."));
        assert!(prompt.contains("shell command for bash on Linux."));
        assert!(prompt.contains("Current directory: /srv/app\n"));
        assert!(prompt.contains("Recent command history:\n1. $ ls\n   a.txt\n   b.txt\n"));
        assert!(prompt.contains("- Output ONLY the command, nothing else"));
        assert!(prompt.ends_with("User request: show hidden files"));
    }

    #[test]
    fn test_powershell_prompt_and_empty_context() {
        let profile = PlatformProfile::for_os(OsFamily::Windows, "C:\\Users\\me");
        let prompt = build_prompt("list files", Path::new("C:\\work"), &profile, &ContextBuffer::new());

        assert!(prompt.contains("PowerShell command for Windows"));
        assert!(prompt.contains("Get-ChildItem"));
        assert!(prompt.contains(EMPTY_CONTEXT_SENTINEL));
    }

    #[test]
    fn test_prompt_is_deterministic() {
        let profile = PlatformProfile::for_os(OsFamily::MacOs, "/Users/me");
        let context = ContextBuffer::new();
        let a = build_prompt("x", Path::new("/"), &profile, &context);
        let b = build_prompt("x", Path::new("/"), &profile, &context);
        assert_eq!(a, b);
        assert!(a.contains("zsh on macOS"));
    }
}
