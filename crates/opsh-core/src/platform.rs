//! Platform detection.
//!
//! The host OS is resolved once at startup into a [`PlatformProfile`]; every
//! other component reads the profile instead of branching on the OS itself.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::dialect::DialectTables;

/// OS family the shell is running on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum OsFamily {
    #[strum(serialize = "Windows")]
    Windows,
    #[strum(serialize = "macOS")]
    MacOs,
    #[strum(serialize = "Linux")]
    Linux,
}

impl OsFamily {
    /// Maps a `std::env::consts::OS` value to an OS family.
    ///
    /// Unrecognized kernels fall back to `Linux` so they get the POSIX dialect.
    pub fn from_os_name(os: &str) -> Self {
        match os {
            "windows" => OsFamily::Windows,
            "macos" | "ios" => OsFamily::MacOs,
            _ => OsFamily::Linux,
        }
    }

    pub fn dialect(self) -> ShellDialect {
        match self {
            OsFamily::Windows => ShellDialect::PowerShell,
            OsFamily::MacOs | OsFamily::Linux => ShellDialect::Posix,
        }
    }

    /// Name of the interactive shell users of this OS usually run.
    pub fn shell_name(self) -> &'static str {
        match self {
            OsFamily::Windows => "PowerShell",
            OsFamily::MacOs => "zsh",
            OsFamily::Linux => "bash",
        }
    }

    pub fn path_separator(self) -> char {
        match self {
            OsFamily::Windows => '\\',
            OsFamily::MacOs | OsFamily::Linux => '/',
        }
    }
}

/// Target shell grammar for executed commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
pub enum ShellDialect {
    #[strum(serialize = "PowerShell")]
    PowerShell,
    #[strum(serialize = "POSIX")]
    Posix,
}

impl ShellDialect {
    /// Returns the capability tables (literal commands, starter tokens,
    /// directory-change verbs) for this dialect.
    pub fn tables(self) -> &'static DialectTables {
        match self {
            ShellDialect::PowerShell => &crate::dialect::POWERSHELL,
            ShellDialect::Posix => &crate::dialect::POSIX,
        }
    }
}

/// Immutable description of the host platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformProfile {
    pub name: OsFamily,
    pub dialect: ShellDialect,
    pub home: PathBuf,
    pub path_separator: char,
}

impl PlatformProfile {
    /// Detects the running platform. Never fails.
    pub fn detect() -> Self {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from(std::path::MAIN_SEPARATOR_STR));
        Self::for_os(OsFamily::from_os_name(std::env::consts::OS), home)
    }

    /// Builds the profile for a given OS family and home directory.
    pub fn for_os(name: OsFamily, home: impl Into<PathBuf>) -> Self {
        Self {
            name,
            dialect: name.dialect(),
            home: home.into(),
            path_separator: name.path_separator(),
        }
    }

    pub fn shell_name(&self) -> &'static str {
        self.name.shell_name()
    }

    pub fn tables(&self) -> &'static DialectTables {
        self.dialect.tables()
    }

    pub fn is_windows(&self) -> bool {
        self.name == OsFamily::Windows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_name_mapping() {
        assert_eq!(OsFamily::from_os_name("windows"), OsFamily::Windows);
        assert_eq!(OsFamily::from_os_name("macos"), OsFamily::MacOs);
        assert_eq!(OsFamily::from_os_name("linux"), OsFamily::Linux);
        // Unknown kernels get the POSIX default
        assert_eq!(OsFamily::from_os_name("freebsd"), OsFamily::Linux);
        assert_eq!(OsFamily::from_os_name("haiku").dialect(), ShellDialect::Posix);
    }

    #[test]
    fn test_profile_for_windows() {
        let profile = PlatformProfile::for_os(OsFamily::Windows, "C:\\Users\\me");
        assert_eq!(profile.dialect, ShellDialect::PowerShell);
        assert_eq!(profile.path_separator, '\\');
        assert_eq!(profile.shell_name(), "PowerShell");
        assert!(profile.is_windows());
    }

    #[test]
    fn test_profile_for_posix() {
        let mac = PlatformProfile::for_os(OsFamily::MacOs, "/Users/me");
        assert_eq!(mac.dialect, ShellDialect::Posix);
        assert_eq!(mac.shell_name(), "zsh");
        assert_eq!(mac.name.to_string(), "macOS");

        let linux = PlatformProfile::for_os(OsFamily::Linux, "/home/me");
        assert_eq!(linux.shell_name(), "bash");
        assert_eq!(linux.path_separator, '/');
    }

    #[test]
    fn test_detect_matches_build_target() {
        let profile = PlatformProfile::detect();
        assert_eq!(profile.name, OsFamily::from_os_name(std::env::consts::OS));
        assert_eq!(profile.dialect, profile.name.dialect());
    }
}
