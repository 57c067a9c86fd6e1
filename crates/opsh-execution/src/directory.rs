//! In-process directory changes.

use std::io::ErrorKind;
use std::path::PathBuf;

use opsh_core::PlatformProfile;
use opsh_core::directory::{DirectoryChangeError, DirectoryTarget, resolve_target};

/// Changes this process's working directory to `target`.
///
/// Returns the new working directory. On error the directory is unchanged.
pub fn change_directory(
    target: &DirectoryTarget,
    profile: &PlatformProfile,
) -> Result<PathBuf, DirectoryChangeError> {
    let path = resolve_target(target, profile, |name| std::env::var(name).ok());
    let shown = path.display().to_string();

    match std::fs::metadata(&path) {
        Ok(meta) if !meta.is_dir() => {
            return Err(DirectoryChangeError::NotADirectory { path: shown });
        }
        Ok(_) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {
            return Err(DirectoryChangeError::NotFound { path: shown });
        }
        Err(e) => {
            return Err(DirectoryChangeError::Inaccessible {
                path: shown,
                message: e.to_string(),
            });
        }
    }

    std::env::set_current_dir(&path).map_err(|e| DirectoryChangeError::Inaccessible {
        path: shown.clone(),
        message: e.to_string(),
    })?;

    let cwd = std::env::current_dir().unwrap_or(path);
    tracing::debug!("Changed directory to {}", cwd.display());
    Ok(cwd)
}
