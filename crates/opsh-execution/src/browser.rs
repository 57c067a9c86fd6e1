//! Opens URLs with the platform's default handler.

use std::io;
use std::process::{Command, Stdio};

use opsh_core::{OsFamily, PlatformProfile};

/// Program and arguments that open `url` on `os`.
pub fn open_command(os: OsFamily, url: &str) -> (&'static str, Vec<String>) {
    match os {
        OsFamily::MacOs => ("open", vec![url.to_string()]),
        OsFamily::Linux => ("xdg-open", vec![url.to_string()]),
        // The empty string is the window title `start` expects first
        OsFamily::Windows => (
            "cmd",
            vec!["/C".into(), "start".into(), String::new(), url.to_string()],
        ),
    }
}

/// Launches the browser without waiting for it.
pub fn open_url(profile: &PlatformProfile, url: &str) -> io::Result<()> {
    let (program, args) = open_command(profile.name, url);
    Command::new(program)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .map(|_| ())
        .inspect_err(|e| tracing::warn!("Could not open {} with {}: {}", url, program, e))
}
