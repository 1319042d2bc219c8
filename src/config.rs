//! Defines the [`Config`] type: the fixed directory layout of a site project,
//! anchored at the invocation root. The layout is conventional rather than
//! configurable; a `Config` exists so that every component receives its paths
//! explicitly instead of reaching for process-wide constants.

use std::path::PathBuf;

/// The extension of content source files.
pub const MARKDOWN_EXTENSION: &str = "md";

/// The top-level template every page is rendered through.
pub const BASE_TEMPLATE: &str = "base.html";

/// The name of the watch-mode debug artifact written at the build root.
pub const DEBUG_ARTIFACT: &str = "content_data.json";

/// The directory layout of one site project. All paths are derived from the
/// build root at startup and passed by reference into each component.
#[derive(Clone, Debug)]
pub struct Config {
    /// The invocation root: where the templates live, where the CSS
    /// toolchain runs, and where the debug artifact is written.
    pub build_root: PathBuf,

    /// The directory scanned recursively for `*.md` content files.
    pub content_directory: PathBuf,

    /// The directory holding `base.html` and the per-page-type fragments.
    pub templates_directory: PathBuf,

    /// The output directory. Wholly owned by the build: destroyed and
    /// recreated on every invocation.
    pub output_directory: PathBuf,
}

impl Config {
    /// Builds the conventional layout relative to `root`:
    /// `content/`, `templates/`, and `public/`.
    pub fn from_root(root: impl Into<PathBuf>) -> Config {
        let build_root = root.into();
        Config {
            content_directory: build_root.join("content"),
            templates_directory: build_root.join("templates"),
            output_directory: build_root.join("public"),
            build_root,
        }
    }

    /// The directory of static image assets copied verbatim into the output.
    pub fn images_source_directory(&self) -> PathBuf {
        self.content_directory.join("images")
    }

    /// Where image assets land in the output.
    pub fn images_output_directory(&self) -> PathBuf {
        self.output_directory.join("images")
    }

    /// The path of the watch-mode debug artifact.
    pub fn debug_artifact_path(&self) -> PathBuf {
        self.build_root.join(DEBUG_ARTIFACT)
    }

    /// The name of the output directory, used by the watcher's ignore filter
    /// so the build never observes its own writes.
    pub fn output_directory_name(&self) -> &str {
        self.output_directory
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("public")
    }
}
