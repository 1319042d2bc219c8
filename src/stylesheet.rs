//! Invokes the external CSS toolchain (Tailwind via `npx`) against the
//! rendered HTML. This must run after the HTML is on disk so the toolchain
//! can see which classes the pages actually use. The tool is strictly
//! additive: by the time it runs, the HTML is already written, which is why
//! a toolchain failure tolerates partial output where nothing else does.

use std::fmt;
use std::io;
use std::process::{Command, ExitStatus, Stdio};

use crate::config::Config;

/// Compiles `input.css` at the build root into `public/styles.css`, scanning
/// the rendered HTML for class usage. The subprocess's own output is
/// suppressed; failure surfaces through the exit status.
pub fn compile(config: &Config) -> Result<()> {
    let status = Command::new("npx")
        .arg("tailwindcss")
        .arg("-i")
        .arg("input.css")
        .arg("-o")
        .arg(config.output_directory.join("styles.css"))
        .arg("--content")
        .arg(format!("{}/**/*.html", config.output_directory.display()))
        .current_dir(&config.build_root)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(Error::Spawn)?;

    if status.success() {
        Ok(())
    } else {
        Err(Error::Failed { status })
    }
}

/// The result of a fallible stylesheet compilation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a failure of the external CSS toolchain.
#[derive(Debug)]
pub enum Error {
    /// Returned when the toolchain process can't be started at all, e.g.
    /// `npx` isn't installed.
    Spawn(io::Error),

    /// Returned when the toolchain exits non-zero.
    Failed { status: ExitStatus },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Spawn(err) => write!(f, "starting CSS toolchain: {}", err),
            Error::Failed { status } => {
                write!(f, "CSS toolchain exited with {}", status)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Spawn(err) => Some(err),
            Error::Failed { status: _ } => None,
        }
    }
}
