//! Persists rendered documents to the output directory.
//!
//! The output directory is wholly owned by the build: it is deleted (absence
//! ignored) and recreated empty before anything is written, so no file from
//! a previous build can survive. The build is deliberately not incremental
//! at this layer; full replacement eliminates stale-file problems at the
//! cost of always rewriting everything.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Clears the output directory and writes each rendered document to
/// `{output_directory}/{url}.html`. URL uniqueness is enforced upstream by
/// the content loader, so no two documents collide here.
pub fn write(output_directory: &Path, documents: &[(String, String)]) -> Result<()> {
    clean(output_directory)?;
    fs::create_dir_all(output_directory).map_err(|err| Error::Io {
        path: output_directory.to_owned(),
        err,
    })?;

    for (url, html) in documents {
        let path = output_directory.join(format!("{}.html", url));
        fs::write(&path, html).map_err(|err| Error::Io { path, err })?;
    }
    Ok(())
}

fn clean(dir: &Path) -> Result<()> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(err) => match err.kind() {
            io::ErrorKind::NotFound => Ok(()),
            _ => Err(Error::Clean {
                path: dir.to_owned(),
                err,
            }),
        },
    }
}

/// The result of a fallible output-writing operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error clearing or writing the output directory.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O problems while cleaning the output directory.
    Clean { path: PathBuf, err: io::Error },

    /// Returned for I/O problems while writing output files.
    Io { path: PathBuf, err: io::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Clean { path, err } => {
                write!(f, "cleaning directory '{}': {}", path.display(), err)
            }
            Error::Io { path, err } => {
                write!(f, "writing '{}': {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Clean { path: _, err } => Some(err),
            Error::Io { path: _, err } => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn documents(urls: &[&str]) -> Vec<(String, String)> {
        urls.iter()
            .map(|url| (url.to_string(), format!("<p>{}</p>", url)))
            .collect()
    }

    #[test]
    fn test_write_one_file_per_document() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("public");
        write(&output, &documents(&["a", "b"])).unwrap();

        assert_eq!(fs::read_to_string(output.join("a.html")).unwrap(), "<p>a</p>");
        assert_eq!(fs::read_to_string(output.join("b.html")).unwrap(), "<p>b</p>");
        assert_eq!(fs::read_dir(&output).unwrap().count(), 2);
    }

    #[test]
    fn test_write_replaces_previous_output_wholesale() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("public");
        fs::create_dir_all(output.join("nested")).unwrap();
        fs::write(output.join("stale.html"), "old").unwrap();
        fs::write(output.join("nested/deep.html"), "old").unwrap();

        write(&output, &documents(&["fresh"])).unwrap();

        assert!(!output.join("stale.html").exists());
        assert!(!output.join("nested").exists());
        assert!(output.join("fresh.html").exists());
    }

    #[test]
    fn test_write_tolerates_absent_output_directory() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("never-created/public");
        write(&output, &documents(&["a"])).unwrap();
        assert!(output.join("a.html").exists());
    }
}
