//! Files laid down by the installer, removed by `!uninstall`.

use std::io;
use std::path::{Path, PathBuf};

use opsh_core::PlatformProfile;

use crate::paths::OpshPaths;

/// Location of an opsh installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Installation {
    install_dir: PathBuf,
    launcher: PathBuf,
}

impl Installation {
    pub fn new(install_dir: impl Into<PathBuf>, launcher: impl Into<PathBuf>) -> Self {
        Self {
            install_dir: install_dir.into(),
            launcher: launcher.into(),
        }
    }

    /// The default layout for `profile`'s home directory.
    pub fn for_profile(profile: &PlatformProfile) -> Self {
        Self::new(
            OpshPaths::install_dir(&profile.home),
            OpshPaths::launcher_path(profile),
        )
    }

    pub fn install_dir(&self) -> &Path {
        &self.install_dir
    }

    pub fn launcher(&self) -> &Path {
        &self.launcher
    }

    /// Deletes the install directory and the launcher.
    ///
    /// Missing pieces are skipped. Returns the paths that were removed.
    pub fn remove(&self) -> io::Result<Vec<PathBuf>> {
        let mut removed = Vec::new();

        if self.install_dir.is_dir() {
            std::fs::remove_dir_all(&self.install_dir)?;
            removed.push(self.install_dir.clone());
        }

        // On Windows the launcher lives inside the install dir and is already gone
        if self.launcher.symlink_metadata().is_ok() {
            std::fs::remove_file(&self.launcher)?;
            removed.push(self.launcher.clone());
        }

        tracing::info!("Uninstalled opsh: removed {:?}", removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use opsh_core::OsFamily;
    use tempfile::TempDir;

    #[test]
    fn test_remove_install_dir_and_launcher() {
        let home = TempDir::new().unwrap();
        let profile = PlatformProfile::for_os(OsFamily::Linux, home.path());
        let installation = Installation::for_profile(&profile);

        std::fs::create_dir_all(installation.install_dir().join("venv")).unwrap();
        std::fs::write(installation.install_dir().join("opsh.py"), "").unwrap();
        std::fs::create_dir_all(installation.launcher().parent().unwrap()).unwrap();
        std::fs::write(installation.launcher(), "#!/bin/sh\n").unwrap();

        let removed = installation.remove().unwrap();

        assert_eq!(removed.len(), 2);
        assert!(!installation.install_dir().exists());
        assert!(!installation.launcher().exists());
        // Sibling files in the launcher directory survive
        assert!(home.path().join(".local").join("bin").exists());
    }

    #[test]
    fn test_remove_when_nothing_installed() {
        let home = TempDir::new().unwrap();
        let installation = Installation::new(home.path().join(".opsh"), home.path().join("opsh"));
        assert!(installation.remove().unwrap().is_empty());
    }

    #[test]
    fn test_windows_launcher_inside_install_dir() {
        let home = TempDir::new().unwrap();
        let profile = PlatformProfile::for_os(OsFamily::Windows, home.path());
        let installation = Installation::for_profile(&profile);
        std::fs::create_dir_all(installation.install_dir()).unwrap();
        std::fs::write(installation.launcher(), "@echo off\n").unwrap();

        let removed = installation.remove().unwrap();
        assert_eq!(removed, vec![installation.install_dir().to_path_buf()]);
    }
}
