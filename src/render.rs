//! Renders content records into output documents.
//!
//! The engine loads a single top-level template (`base.html`) once per build
//! and renders it once per record. Dispatch on page type happens inside the
//! template: the context carries a `content_template` value of
//! `{page}.html` and the base template is expected to
//! `{% include content_template %}`. The engine itself never branches on the
//! `page` field.
//!
//! Rendering is deterministic given identical inputs and a fixed
//! [`BuildClock`]: the clock is captured once per build invocation and shared
//! across every record, so a footer year or similar datum is consistent
//! across the whole site.

use std::fmt;

use chrono::{DateTime, Datelike, Local};
use minijinja::{context, path_loader, AutoEscape, Environment};
use serde::Serialize;

use crate::config::{Config, BASE_TEMPLATE};
use crate::content::ContentRecord;

/// The build timestamp, captured once per build and visible to templates as
/// `now`. Carrying pre-formatted fields keeps rendering free of any clock
/// reads, which is what makes byte-identical rebuilds possible under a fixed
/// clock.
#[derive(Clone, Debug, Serialize)]
pub struct BuildClock {
    /// The calendar year, for footers and copyright lines.
    pub year: i32,

    /// `YYYY-MM-DD`.
    pub date: String,

    /// `YYYY-MM-DD HH:MM:SS`.
    pub datetime: String,
}

impl BuildClock {
    /// Captures the current local time.
    pub fn capture() -> BuildClock {
        BuildClock::from_datetime(Local::now())
    }

    /// Builds a clock from an explicit timestamp. Tests inject a fixed time
    /// through this to assert byte-identical output.
    pub fn from_datetime(now: DateTime<Local>) -> BuildClock {
        BuildClock {
            year: now.year(),
            date: now.format("%Y-%m-%d").to_string(),
            datetime: now.format("%Y-%m-%d %H:%M:%S").to_string(),
        }
    }
}

/// Renders every record through the base template, producing one
/// `(url, html)` pair per record in collection order. A missing template, an
/// undefined fragment, or a rendering-time error aborts the whole build.
pub fn render(
    records: &[ContentRecord],
    config: &Config,
    now: &BuildClock,
) -> Result<Vec<(String, String)>> {
    let mut env = Environment::new();
    env.set_loader(path_loader(&config.templates_directory));
    // Record bodies are already HTML; templates receive them raw, so
    // auto-escaping stays off for every template in the directory.
    env.set_auto_escape_callback(|_| AutoEscape::None);

    let template = env.get_template(BASE_TEMPLATE).map_err(Error::Template)?;

    let mut documents = Vec::with_capacity(records.len());
    for record in records {
        let html = template
            .render(context! {
                content_template => format!("{}.html", record.page),
                page => record,
                posts => records,
                now => now,
            })
            .map_err(|err| Error::Render {
                url: record.url.clone(),
                err,
            })?;
        documents.push((record.url.clone(), html));
    }
    Ok(documents)
}

/// The result of a fallible rendering operation.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error loading the site template or rendering a record.
#[derive(Debug)]
pub enum Error {
    /// Returned when the base template can't be loaded or parsed.
    Template(minijinja::Error),

    /// Returned when rendering a specific record fails, e.g. because its
    /// `page` names a fragment that doesn't exist.
    Render { url: String, err: minijinja::Error },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Template(err) => write!(f, "loading template: {}", err),
            Error::Render { url, err } => write!(f, "rendering `{}`: {}", url, err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Template(err) => Some(err),
            Error::Render { url: _, err } => Some(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::TempDir;

    fn record(url: &str, page: &str, title: &str, html: &str) -> ContentRecord {
        ContentRecord {
            page: page.to_owned(),
            url: url.to_owned(),
            title: title.to_owned(),
            html: html.to_owned(),
            extra: BTreeMap::new(),
        }
    }

    fn clock() -> BuildClock {
        BuildClock {
            year: 2026,
            date: "2026-08-23".to_owned(),
            datetime: "2026-08-23 12:00:00".to_owned(),
        }
    }

    fn site(templates: &[(&str, &str)]) -> (TempDir, Config) {
        let dir = TempDir::new().unwrap();
        let config = Config::from_root(dir.path());
        fs::create_dir_all(&config.templates_directory).unwrap();
        for (name, text) in templates {
            fs::write(config.templates_directory.join(name), text).unwrap();
        }
        (dir, config)
    }

    #[test]
    fn test_render_dispatches_on_page_field() {
        let (_dir, config) = site(&[
            (
                "base.html",
                "<title>{{ page.title }}</title>{% include content_template %}",
            ),
            ("post.html", "<article>{{ page.html }}</article>"),
            ("index.html", "<nav>{{ posts | length }} posts</nav>"),
        ]);

        let records = vec![
            record("home", "index", "Home", ""),
            record("a", "post", "A", "<h1>Hi</h1>"),
        ];
        let documents = render(&records, &config, &clock()).unwrap();

        assert_eq!(documents[0].0, "home");
        assert!(documents[0].1.contains("<nav>2 posts</nav>"));
        assert_eq!(documents[1].0, "a");
        assert!(documents[1].1.contains("<article><h1>Hi</h1></article>"));
    }

    #[test]
    fn test_render_is_deterministic_with_fixed_clock() {
        let (_dir, config) = site(&[
            (
                "base.html",
                "{% include content_template %}<footer>{{ now.year }}</footer>",
            ),
            ("post.html", "{{ page.html }}"),
        ]);

        let records = vec![record("a", "post", "A", "<p>body</p>")];
        let first = render(&records, &config, &clock()).unwrap();
        let second = render(&records, &config, &clock()).unwrap();
        assert_eq!(first, second);
        assert!(first[0].1.contains("<footer>2026</footer>"));
    }

    #[test]
    fn test_missing_base_template_is_an_error() {
        let (_dir, config) = site(&[("post.html", "{{ page.html }}")]);
        let records = vec![record("a", "post", "A", "")];
        assert!(matches!(
            render(&records, &config, &clock()),
            Err(Error::Template(_))
        ));
    }

    #[test]
    fn test_undefined_fragment_is_an_error() {
        let (_dir, config) = site(&[("base.html", "{% include content_template %}")]);
        let records = vec![record("a", "nonexistent", "A", "")];
        match render(&records, &config, &clock()) {
            Err(Error::Render { url, .. }) => assert_eq!(url, "a"),
            other => panic!("expected Render error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_html_body_is_not_escaped() {
        let (_dir, config) = site(&[
            ("base.html", "{% include content_template %}"),
            ("post.html", "{{ page.html }}"),
        ]);
        let records = vec![record("a", "post", "A", "<em>raw</em>")];
        let documents = render(&records, &config, &clock()).unwrap();
        assert_eq!(documents[0].1, "<em>raw</em>");
    }
}
