//! Launches the companion live-reload process (browser-sync) when watch mode
//! starts.
//!
//! The companion serves the output directory and refreshes connected
//! browsers when files change; it runs as an independent OS process and is
//! never managed beyond the initial launch. The launch strategy is
//! platform-specific: on macOS the companion gets its own Terminal window,
//! on other Unixes it is spawned detached, and elsewhere the launch is a
//! no-op. Failure to launch is reported as a warning and never fails the
//! build; the site is fully usable without the companion.

use std::path::Path;

/// Launches the live-reload companion for `build_root`. Best-effort.
pub fn launch(build_root: &Path) {
    if let Err(err) = spawn(build_root) {
        eprintln!("Warning: could not start live-reload companion: {}", err);
    }
}

#[cfg(target_os = "macos")]
fn spawn(build_root: &Path) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    let command = format!(
        "cd {} && browser-sync start --config bs-config.mjs",
        build_root.display()
    );
    let script = format!(
        "tell application \"Terminal\" to do script \"{}\"",
        command.replace('"', "\\\"")
    );
    Command::new("osascript")
        .arg("-e")
        .arg(script)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

#[cfg(all(unix, not(target_os = "macos")))]
fn spawn(build_root: &Path) -> std::io::Result<()> {
    use std::process::{Command, Stdio};

    Command::new("browser-sync")
        .args(["start", "--config", "bs-config.mjs"])
        .current_dir(build_root)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    Ok(())
}

#[cfg(not(unix))]
fn spawn(_build_root: &Path) -> std::io::Result<()> {
    println!("Live reload is not supported on this platform; skipping.");
    Ok(())
}
