#![cfg(unix)]

use opsh_core::directory::{DirectoryChangeError, DirectoryTarget, parse_directory_change};
use opsh_core::exec::CommandRunner;
use opsh_core::{OsFamily, PlatformProfile, ShellDialect};
use opsh_execution::ShellExecutor;
use tempfile::TempDir;

// The working directory is process-wide, so every scenario lives in one test.
#[tokio::test]
async fn test_directory_changes_persist_across_commands() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    let nested = work.path().join("my project");
    std::fs::create_dir(&nested).unwrap();
    std::fs::write(work.path().join("notes.txt"), "x").unwrap();

    let executor = ShellExecutor::new(PlatformProfile::for_os(OsFamily::Linux, home.path()));
    let canonical = |p: &std::path::Path| p.canonicalize().unwrap();

    // Plain path
    let target = DirectoryTarget::Path(work.path().display().to_string());
    let cwd = executor.change_directory(&target).unwrap();
    assert_eq!(cwd, canonical(work.path()));

    // The next command runs in the new directory
    let output = executor.run("pwd").await;
    assert_eq!(output.stdout.trim(), canonical(work.path()).display().to_string());

    // Quoted relative path with a space
    let target = parse_directory_change("cd \"my project\"", ShellDialect::Posix).unwrap();
    let cwd = executor.change_directory(&target).unwrap();
    assert_eq!(cwd, canonical(&nested));
    assert_eq!(executor.current_dir(), canonical(&nested));

    // Missing directory leaves cwd untouched
    let target = DirectoryTarget::Path("does-not-exist".into());
    let err = executor.change_directory(&target).unwrap_err();
    assert!(matches!(err, DirectoryChangeError::NotFound { .. }));
    assert_eq!(err.to_string(), "cd: does-not-exist: No such file or directory");
    assert_eq!(executor.current_dir(), canonical(&nested));

    // A file is not a directory
    let target = DirectoryTarget::Path("../notes.txt".into());
    let err = executor.change_directory(&target).unwrap_err();
    assert!(matches!(err, DirectoryChangeError::NotADirectory { .. }));

    // Bare cd goes home
    let target = parse_directory_change("cd", ShellDialect::Posix).unwrap();
    let cwd = executor.change_directory(&target).unwrap();
    assert_eq!(cwd, canonical(home.path()));

    // Tilde expands against the profile home
    std::fs::create_dir(home.path().join("docs")).unwrap();
    let target = DirectoryTarget::Path("~/docs".into());
    let cwd = executor.change_directory(&target).unwrap();
    assert_eq!(cwd, canonical(&home.path().join("docs")));

    // Leave the temp dirs before they are removed
    std::env::set_current_dir(std::env::temp_dir()).unwrap();
}
