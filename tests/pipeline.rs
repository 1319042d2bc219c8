//! End-to-end pipeline tests: load content, render through templates, write
//! output. The external CSS toolchain and the live-reload companion are
//! collaborators outside the pipeline and are not exercised here.

use std::fs;
use std::path::Path;

use tempfile::TempDir;

use skald::config::Config;
use skald::content;
use skald::render::{self, BuildClock};
use skald::write;

fn fixed_clock() -> BuildClock {
    BuildClock {
        year: 2026,
        date: "2026-08-23".to_owned(),
        datetime: "2026-08-23 12:00:00".to_owned(),
    }
}

fn write_file(path: &Path, text: &str) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, text).unwrap();
}

/// Builds the two-file site used throughout: `a.md` with an explicit title
/// and a heading body, `b.md` with a derived title and a paragraph body.
fn scaffold() -> (TempDir, Config) {
    let dir = TempDir::new().unwrap();
    let config = Config::from_root(dir.path());

    write_file(
        &config.content_directory.join("a.md"),
        "---\npage: post\ntitle: \"A\"\n---\n# Hi",
    );
    write_file(&config.content_directory.join("b.md"), "---\npage: post\n---\nBye");

    write_file(
        &config.templates_directory.join("base.html"),
        "<!doctype html><title>{{ page.title }}</title>\
         {% include content_template %}\
         <footer>{{ now.year }}</footer>",
    );
    write_file(
        &config.templates_directory.join("post.html"),
        "<article>{{ page.html }}</article>",
    );

    (dir, config)
}

fn run_pipeline(config: &Config, clock: &BuildClock) {
    let records = content::load(config).unwrap();
    let documents = render::render(&records, config, clock).unwrap();
    write::write(&config.output_directory, &documents).unwrap();
}

#[test]
fn test_two_file_site_end_to_end() {
    let (_dir, config) = scaffold();
    run_pipeline(&config, &fixed_clock());

    let a = fs::read_to_string(config.output_directory.join("a.html")).unwrap();
    assert!(a.contains("<title>A</title>"));
    assert!(a.contains("<h1>Hi</h1>"));
    assert!(a.contains("<footer>2026</footer>"));

    let b = fs::read_to_string(config.output_directory.join("b.html")).unwrap();
    assert!(b.contains("<title>B</title>"));
    assert!(b.contains("<p>Bye</p>"));
}

#[test]
fn test_output_contains_exactly_one_file_per_record() {
    let (_dir, config) = scaffold();

    // Plant a leftover from a "previous build"; it must not survive.
    write_file(&config.output_directory.join("stale.html"), "old");
    run_pipeline(&config, &fixed_clock());

    let mut names: Vec<String> = fs::read_dir(&config.output_directory)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, vec!["a.html", "b.html"]);
}

#[test]
fn test_rebuild_is_byte_identical_under_fixed_clock() {
    let (_dir, config) = scaffold();
    let clock = fixed_clock();

    run_pipeline(&config, &clock);
    let first_a = fs::read(config.output_directory.join("a.html")).unwrap();
    let first_b = fs::read(config.output_directory.join("b.html")).unwrap();

    run_pipeline(&config, &clock);
    assert_eq!(fs::read(config.output_directory.join("a.html")).unwrap(), first_a);
    assert_eq!(fs::read(config.output_directory.join("b.html")).unwrap(), first_b);
}

#[test]
fn test_validation_failure_aborts_before_any_output() {
    let (_dir, config) = scaffold();
    write_file(
        &config.content_directory.join("broken.md"),
        "---\ntitle: \"no page field\"\n---\nbody",
    );

    assert!(content::load(&config).is_err());
    // The load failed, so nothing downstream ran and no output exists.
    assert!(!config.output_directory.exists());
}

#[test]
fn test_index_page_sees_the_whole_collection() {
    let (_dir, config) = scaffold();
    write_file(
        &config.content_directory.join("home.md"),
        "---\npage: index\ntitle: \"Home\"\n---\n",
    );
    write_file(
        &config.templates_directory.join("index.html"),
        "<ul>{% for post in posts %}<li>{{ post.title }}</li>{% endfor %}</ul>",
    );

    run_pipeline(&config, &fixed_clock());

    let home = fs::read_to_string(config.output_directory.join("home.html")).unwrap();
    assert!(home.contains("<li>A</li>"));
    assert!(home.contains("<li>B</li>"));
    assert!(home.contains("<li>Home</li>"));
}
