//! Defines the [`ContentRecord`] and [`Error`] types and the logic for
//! loading content records from the file system into memory.
//!
//! Loading is an all-or-nothing batch operation: the content directory is
//! scanned recursively for markdown files, each file is split into a YAML
//! header and a markdown body, and the first file that fails to parse or
//! validate aborts the whole load with a diagnostic naming the file. Partial
//! results are never returned, so a build can never observe half a site.

use std::{
    collections::{BTreeMap, HashMap},
    fmt, fs,
    path::{Path, PathBuf},
};

use pulldown_cmark::{html, Options, Parser};
use serde::Serialize;
use serde_yaml::Value as YamlValue;
use walkdir::WalkDir;

use crate::config::{Config, DEBUG_ARTIFACT, MARKDOWN_EXTENSION};
use crate::typography;

/// The delimiter separating the YAML header from the markdown body.
const FENCE: &str = "---";

/// One parsed content file. Records are created fresh on every build and
/// discarded once the output is written; nothing persists across builds.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ContentRecord {
    /// The template fragment this record renders against. The base template
    /// delegates to `{page}.html`; a record without a `page` field never
    /// gets this far.
    pub page: String,

    /// The source file's stem; the output file is written as `{url}.html`.
    pub url: String,

    /// The explicit `title` field if present, otherwise derived from the
    /// file stem. Either way the title is entity-unescaped and beautified.
    pub title: String,

    /// The markdown body converted to HTML with smart punctuation.
    pub html: String,

    /// The remaining header fields, preserved for template consumption only.
    /// Nothing outside the render context touches these.
    #[serde(flatten)]
    pub extra: BTreeMap<String, YamlValue>,
}

/// Walks the content directory and returns the full ordered collection of
/// content records. Traversal is sorted by file name so the collection (and
/// therefore the `posts` template context) is reproducible for a given
/// filesystem state. Two records resolving to the same `url` would silently
/// overwrite one another in the output, so a collision fails the load.
pub fn load(config: &Config) -> Result<Vec<ContentRecord>> {
    let mut records: Vec<ContentRecord> = Vec::new();
    let mut seen: HashMap<String, PathBuf> = HashMap::new();

    for result in WalkDir::new(&config.content_directory).sort_by_file_name() {
        let entry = result?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(MARKDOWN_EXTENSION) {
            continue;
        }

        let record = load_file(path)?;
        if let Some(first) = seen.insert(record.url.clone(), path.to_owned()) {
            return Err(Error::DuplicateUrl {
                url: record.url,
                first,
                second: path.to_owned(),
            });
        }
        records.push(record);
    }

    Ok(records)
}

/// Serializes the loaded collection to `content_data.json` at the build root
/// for inspection. Diagnostic only: a failure here is reported as a warning
/// and never fails the build.
pub fn dump_debug_artifact(config: &Config, records: &[ContentRecord]) {
    let path = config.debug_artifact_path();
    match serde_json::to_string_pretty(records) {
        Ok(json) => match fs::write(&path, json) {
            Ok(()) => println!("Created {} for debugging.", DEBUG_ARTIFACT),
            Err(err) => eprintln!("Warning: could not write {}: {}", path.display(), err),
        },
        Err(err) => eprintln!("Warning: could not serialize content data: {}", err),
    }
}

fn load_file(path: &Path) -> Result<ContentRecord> {
    let text = fs::read_to_string(path).map_err(|err| Error::Io {
        path: path.to_owned(),
        err,
    })?;
    parse_record(path, &text)
}

/// Parses one content file: splits the frontmatter fence, deserializes the
/// header into a generic key-value map, extracts and validates the typed
/// fields, and converts the body to HTML.
fn parse_record(path: &Path, text: &str) -> Result<ContentRecord> {
    let (header, body) = split_frontmatter(text).map_err(|fence| match fence {
        Fence::MissingStart => Error::MissingStartFence {
            path: path.to_owned(),
        },
        Fence::MissingEnd => Error::MissingEndFence {
            path: path.to_owned(),
        },
    })?;

    let mut metadata: BTreeMap<String, YamlValue> =
        serde_yaml::from_str(header).map_err(|err| Error::Header {
            path: path.to_owned(),
            err,
        })?;

    let page = match metadata.remove("page") {
        Some(YamlValue::String(page)) if !page.is_empty() => page,
        _ => {
            return Err(Error::MissingPage {
                path: path.to_owned(),
            })
        }
    };

    let url = match path.file_stem().and_then(|stem| stem.to_str()) {
        Some(stem) => stem.to_owned(),
        None => {
            return Err(Error::InvalidFileName {
                path: path.to_owned(),
            })
        }
    };

    let title = match metadata.remove("title") {
        Some(YamlValue::String(title)) if !title.is_empty() => typography::beautify(&title),
        _ => typography::beautify(&typography::title_case(&url)),
    };

    Ok(ContentRecord {
        page,
        url,
        title,
        html: markdown_to_html(body),
        extra: metadata,
    })
}

enum Fence {
    MissingStart,
    MissingEnd,
}

fn split_frontmatter(input: &str) -> std::result::Result<(&str, &str), Fence> {
    if !input.starts_with(FENCE) {
        return Err(Fence::MissingStart);
    }
    match input[FENCE.len()..].find(FENCE) {
        None => Err(Fence::MissingEnd),
        Some(offset) => {
            let header_stop = FENCE.len() + offset;
            Ok((
                &input[FENCE.len()..header_stop],
                &input[header_stop + FENCE.len()..],
            ))
        }
    }
}

fn markdown_to_html(markdown: &str) -> String {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_FOOTNOTES);
    options.insert(Options::ENABLE_SMART_PUNCTUATION);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut out = String::new();
    html::push_html(&mut out, Parser::new_ext(markdown, options));
    out
}

/// The result of a fallible content-loading operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading or validating a content file. Every variant
/// names the offending file.
#[derive(Debug)]
pub enum Error {
    /// Returned for I/O errors while walking the content directory.
    Walk(walkdir::Error),

    /// Returned for I/O errors reading a content file.
    Io { path: PathBuf, err: std::io::Error },

    /// Returned when a content file doesn't begin with the `---` fence.
    MissingStartFence { path: PathBuf },

    /// Returned when the closing `---` fence is missing.
    MissingEndFence { path: PathBuf },

    /// Returned when the YAML header fails to parse.
    Header {
        path: PathBuf,
        err: serde_yaml::Error,
    },

    /// Returned when the header has no non-empty `page` field.
    MissingPage { path: PathBuf },

    /// Returned when a source file's name isn't valid UTF-8.
    InvalidFileName { path: PathBuf },

    /// Returned when two content files resolve to the same output URL.
    DuplicateUrl {
        url: String,
        first: PathBuf,
        second: PathBuf,
    },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Walk(err) => err.fmt(f),
            Error::Io { path, err } => {
                write!(f, "{}: {}", path.display(), err)
            }
            Error::MissingStartFence { path } => {
                write!(f, "{}: content file must begin with `---`", path.display())
            }
            Error::MissingEndFence { path } => {
                write!(f, "{}: missing closing `---`", path.display())
            }
            Error::Header { path, err } => {
                write!(f, "{}: invalid YAML header: {}", path.display(), err)
            }
            Error::MissingPage { path } => {
                write!(f, "{}: YAML header has no `page` defined", path.display())
            }
            Error::InvalidFileName { path } => {
                write!(f, "{}: file name is not valid UTF-8", path.display())
            }
            Error::DuplicateUrl { url, first, second } => {
                write!(
                    f,
                    "duplicate URL `{}`: {} and {} would overwrite each other",
                    url,
                    first.display(),
                    second.display()
                )
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Walk(err) => Some(err),
            Error::Io { path: _, err } => Some(err),
            Error::Header { path: _, err } => Some(err),
            _ => None,
        }
    }
}

impl From<walkdir::Error> for Error {
    /// Converts a [`walkdir::Error`] into an [`Error`]. This allows us to
    /// use the `?` operator while walking the content directory.
    fn from(err: walkdir::Error) -> Error {
        Error::Walk(err)
    }
}
