//! Per-dialect capability tables.
//!
//! Both tables are matched case-insensitively. The POSIX and PowerShell tables
//! are defined independently but must cover the same kinds of input: bare
//! commands, tool invocations, path and operator tokens.

/// Static pattern tables for one shell dialect.
#[derive(Debug)]
pub struct DialectTables {
    /// Commands that are run as-is when typed alone.
    pub literal_commands: &'static [&'static str],
    /// Prefixes that mark the input as shell syntax.
    pub starter_tokens: &'static [&'static str],
    /// Verbs that change the working directory; handled in-process.
    pub directory_verbs: &'static [&'static str],
}

pub static POSIX: DialectTables = DialectTables {
    literal_commands: &[
        "ls", "pwd", "clear", "whoami", "date", "cal", "uptime", "top", "htop", "ps", "kill",
        "killall", "jobs", "bg", "fg", "cat", "head", "tail", "less", "more", "touch", "stat",
        "find", "grep", "awk", "sed", "wc", "sort", "uniq", "diff", "tar", "zip", "unzip", "gzip",
        "gunzip", "bzip2", "chmod", "chown", "chgrp", "id", "groups", "passwd", "df", "du",
        "free", "mount", "umount", "ping", "curl", "wget", "ssh", "scp", "netstat", "ifconfig",
        "ip", "apt", "yum", "dnf", "pacman", "brew", "snap", "flatpak", "man", "which", "whereis",
        "history", "alias", "source", "export",
    ],
    starter_tokens: &[
        "cd ", "ls ", "ll ", "cat ", "head ", "tail ", "touch ", "rm ", "cp ", "mv ", "mkdir ",
        "rmdir ", "chmod ", "chown ", "ln ", "echo ", "grep ", "sed ", "awk ", "cut ", "tr ",
        "xargs ", "git ", "npm ", "node ", "npx ", "yarn ", "pnpm ", "python ", "python3 ",
        "pip ", "pip3 ", "cargo ", "rustc ", "go ", "java ", "javac ", "make ", "cmake ", "gcc ",
        "g++ ", "clang ", "brew ", "apt ", "apt-get ", "yum ", "dnf ", "pacman ", "snap ",
        "sudo ", "su ", "ssh ", "scp ", "curl ", "wget ", "docker ", "kubectl ", "aws ",
        "gcloud ", "az ", "vi ", "vim ", "nano ", "emacs ", "code ", "open ", "xdg-open ",
        "export ", "source ", "alias ", "./", "/", "~", "$", ">", ">>", "|", "&&", ";",
    ],
    directory_verbs: &["cd"],
};

pub static POWERSHELL: DialectTables = DialectTables {
    literal_commands: &[
        "dir", "cls", "type", "copy", "move", "del", "md", "rd", "pwd", "ls", "cat", "clear",
        "whoami", "date", "time", "ipconfig", "ping", "netstat", "nslookup", "tracert", "arp",
        "tasklist", "taskkill", "systeminfo", "hostname", "ver", "diskpart", "chkdsk", "format",
        "tree", "fc", "comp", "more", "sort", "find", "findstr", "attrib", "xcopy", "robocopy",
        "where", "set", "path",
    ],
    starter_tokens: &[
        "cd ", "cd\\", "cd/", "dir ", "echo ", "type ", "copy ", "move ", "del ", "ren ",
        "rename ", "md ", "mkdir ", "rd ", "rmdir ", "attrib ", "xcopy ", "robocopy ", "Get-",
        "Set-", "New-", "Remove-", "Copy-", "Move-", "Out-", "Write-", "Read-", "Start-",
        "Stop-", "Invoke-", "Test-", "Select-", "Where-", "ForEach-", "Sort-", "Group-", "git ",
        "npm ", "node ", "npx ", "yarn ", "pnpm ", "python ", "python3 ", "py ", "pip ", "pip3 ",
        "cargo ", "rustc ", "go ", "java ", "javac ", "dotnet ", "nuget ", "curl ", "wget ",
        "ssh ", "scp ", "docker ", "kubectl ", "code ", "notepad ", "explorer ", "./", ".\\",
        "/", "\\", "~", "$", ">", ">>", "|", "&&", ";",
    ],
    directory_verbs: &["cd", "chdir", "Set-Location", "sl"],
};

#[cfg(test)]
mod tests {
    use super::*;

    fn has_starter(tables: &DialectTables, token: &str) -> bool {
        tables.starter_tokens.iter().any(|s| *s == token)
    }

    #[test]
    fn test_operator_tokens_in_both_dialects() {
        for token in ["./", "~", "$", ">", ">>", "|", "&&", ";", "git ", "docker ", "cd "] {
            assert!(has_starter(&POSIX, token), "POSIX missing {token:?}");
            assert!(has_starter(&POWERSHELL, token), "PowerShell missing {token:?}");
        }
    }

    #[test]
    fn test_cd_is_a_directory_verb_everywhere() {
        assert!(POSIX.directory_verbs.contains(&"cd"));
        assert!(POWERSHELL.directory_verbs.contains(&"cd"));
        assert!(POWERSHELL.directory_verbs.contains(&"Set-Location"));
    }

    #[test]
    fn test_literal_commands_are_bare_words() {
        for table in [&POSIX, &POWERSHELL] {
            for cmd in table.literal_commands {
                assert!(!cmd.contains(' '), "{cmd:?} should be a bare word");
            }
        }
    }
}
