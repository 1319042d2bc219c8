//! Exports the [`build_site`] function which stitches together the
//! high-level steps of one build: loading content records
//! ([`crate::content`]), rendering them through the site template
//! ([`crate::render`]), writing the output directory ([`crate::write`]),
//! compiling the stylesheet ([`crate::stylesheet`]), and copying image
//! assets ([`crate::assets`]).
//!
//! The steps run strictly in that order. Loading and rendering complete
//! before the output directory is touched, so a validation or render failure
//! leaves the previous site intact on disk. The stylesheet step must follow
//! the HTML write because the CSS toolchain scans the rendered pages for
//! class usage.

use std::fmt;
use std::io;
use std::time::Instant;

use crate::config::Config;
use crate::render::BuildClock;
use crate::{assets, content, render, stylesheet, write};

/// Per-invocation build options.
#[derive(Clone, Copy, Debug, Default)]
pub struct Options {
    /// Set in watch mode. The only pipeline effect is the debug artifact:
    /// the loaded content collection is additionally dumped to
    /// `content_data.json` for inspection.
    pub watch: bool,
}

/// Runs one full build. All errors are fatal and unrecoverable within one
/// invocation; there is no partial-success mode.
pub fn build_site(config: &Config, options: &Options) -> Result<()> {
    let started = Instant::now();

    let records = content::load(config)?;
    if options.watch {
        content::dump_debug_artifact(config, &records);
    }

    // The clock is captured once and shared across every record so that
    // timestamp-derived content is consistent across the whole site.
    let now = BuildClock::capture();
    let documents = render::render(&records, config, &now)?;

    write::write(&config.output_directory, &documents)?;

    stylesheet::compile(config)?;

    assets::copy_images(config).map_err(Error::Assets)?;

    println!("Done! Build time: {} ms\n", started.elapsed().as_millis());
    Ok(())
}

/// The result of a fallible build.
pub type Result<T> = std::result::Result<T, Error>;

/// The error type for building a site: loading, rendering, writing, or the
/// external CSS toolchain.
#[derive(Debug)]
pub enum Error {
    /// Returned for errors loading or validating content files.
    Content(content::Error),

    /// Returned for errors loading the template or rendering records.
    Render(render::Error),

    /// Returned for errors writing the output directory.
    Write(write::Error),

    /// Returned when the external CSS toolchain fails.
    Toolchain(stylesheet::Error),

    /// Returned for I/O problems while copying static assets.
    Assets(io::Error),
}

impl fmt::Display for Error {
    /// Implements [`fmt::Display`] for [`Error`].
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Content(err) => err.fmt(f),
            Error::Render(err) => err.fmt(f),
            Error::Write(err) => err.fmt(f),
            Error::Toolchain(err) => err.fmt(f),
            Error::Assets(err) => write!(f, "copying assets: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements [`std::error::Error`] for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Content(err) => Some(err),
            Error::Render(err) => Some(err),
            Error::Write(err) => Some(err),
            Error::Toolchain(err) => Some(err),
            Error::Assets(err) => Some(err),
        }
    }
}

impl From<content::Error> for Error {
    /// Converts [`content::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: content::Error) -> Error {
        Error::Content(err)
    }
}

impl From<render::Error> for Error {
    /// Converts [`render::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: render::Error) -> Error {
        Error::Render(err)
    }
}

impl From<write::Error> for Error {
    /// Converts [`write::Error`]s into [`Error`]. This allows us to use the
    /// `?` operator.
    fn from(err: write::Error) -> Error {
        Error::Write(err)
    }
}

impl From<stylesheet::Error> for Error {
    /// Converts [`stylesheet::Error`]s into [`Error`]. This allows us to use
    /// the `?` operator.
    fn from(err: stylesheet::Error) -> Error {
        Error::Toolchain(err)
    }
}
