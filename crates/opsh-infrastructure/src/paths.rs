//! Unified path management for opsh configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/opsh/              # Config directory (or $OPSH_CONFIG_DIR)
//! ├── config.toml              # Application configuration
//! ├── secret.json              # API keys
//! └── logs/                    # Application logs
//!     └── opsh.log
//!
//! ~/.opsh/                     # Install directory (removed by !uninstall)
//! ~/.local/bin/opsh            # Launcher (~/.opsh/opsh.cmd on Windows)
//! ```

use std::path::{Path, PathBuf};

use opsh_core::PlatformProfile;

/// Environment variable that relocates the config directory.
pub const CONFIG_DIR_ENV: &str = "OPSH_CONFIG_DIR";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for opsh.
pub struct OpshPaths;

impl OpshPaths {
    /// Returns the opsh configuration directory.
    ///
    /// `$OPSH_CONFIG_DIR` wins when set; otherwise the platform config
    /// directory with `opsh` appended (e.g. `~/.config/opsh/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        dirs::config_dir()
            .map(|dir| dir.join("opsh"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to `config.toml`.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the path to `secret.json`.
    ///
    /// # Security Note
    ///
    /// The file is written with 600 permissions on Unix.
    pub fn secret_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("secret.json"))
    }

    /// Returns the path to the logs directory.
    pub fn logs_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }

    /// Directory the installer places opsh into.
    pub fn install_dir(home: &Path) -> PathBuf {
        home.join(".opsh")
    }

    /// Launcher script or symlink on the user's PATH.
    pub fn launcher_path(profile: &PlatformProfile) -> PathBuf {
        if profile.is_windows() {
            Self::install_dir(&profile.home).join("opsh.cmd")
        } else {
            profile.home.join(".local").join("bin").join("opsh")
        }
    }
}
