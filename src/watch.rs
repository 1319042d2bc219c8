//! File system watcher for the rebuild-on-change loop.
//!
//! Subscribes to recursive change notifications on the build root and the
//! content root, filters out noise (its own output, VCS metadata, editor
//! artifacts, the debug dump), debounces the rest, and re-runs the full
//! build pipeline in-process on every qualifying change until interrupted.
//!
//! Rebuilds run inline in the event loop thread, so they are serialized by
//! construction: a second qualifying event arriving mid-rebuild queues on
//! the channel and coalesces with any others into at most one pending
//! rebuild. A failed rebuild is logged and the watcher returns to idle; only
//! an interrupt signal stops it.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::RecvTimeoutError;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Local;
use notify::event::ModifyKind;
use notify::{EventKind, RecursiveMode, Watcher};

use crate::build;
use crate::config::{Config, DEBUG_ARTIFACT};

const DEBOUNCE_MS: u64 = 300;
const IDLE_TIMEOUT_MS: u64 = 1000;

/// Path substrings that never trigger a rebuild: VCS metadata, OS and editor
/// droppings, intermediate stylesheet sources, the debug artifact, the
/// binary's own build directory, and a sentinel folder name users can apply
/// to anything else they want left alone. The output directory name is added
/// per-config in [`ignore_patterns`].
const IGNORED_SUBSTRINGS: &[&str] = &[
    ".git",
    ".DS_Store",
    ".obsidian",
    ".nowatch",
    ".css.map",
    ".scss",
    DEBUG_ARTIFACT,
    "/target/",
];

/// Watches the build root and the content root, rebuilding on every
/// qualifying change. Blocks until interrupted; stops the OS-level
/// subscriptions cleanly before returning.
pub fn watch(config: &Config) -> Result<()> {
    let running = Arc::new(AtomicBool::new(true));
    {
        let running = Arc::clone(&running);
        ctrlc::set_handler(move || running.store(false, Ordering::SeqCst))?;
    }

    let (tx, rx) = std::sync::mpsc::channel();
    let mut watcher = notify::recommended_watcher(tx)?;
    // The content root sits under the build root in the conventional layout,
    // which duplicates its events; the debouncer's keyed-by-path coalescing
    // absorbs the duplicates.
    watcher.watch(&config.build_root, RecursiveMode::Recursive)?;
    watcher.watch(&config.content_directory, RecursiveMode::Recursive)?;

    let patterns = ignore_patterns(config);
    let mut debouncer = Debouncer::new();

    println!("\nWatching for changes. Press ctrl-c to stop.");

    while running.load(Ordering::SeqCst) {
        match rx.recv_timeout(debouncer.timeout()) {
            Ok(Ok(event)) => {
                if let Some(kind) = kind_label(&event.kind) {
                    for path in event.paths {
                        if qualifies(&path, &patterns) {
                            debouncer.add(path, kind);
                        }
                    }
                }
            }
            Ok(Err(err)) => eprintln!("Watch error: {}", err),
            Err(RecvTimeoutError::Timeout) => {
                if debouncer.ready() {
                    rebuild(config, &debouncer.take());
                }
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    // Dropping the watcher stops the underlying OS subscriptions.
    drop(watcher);
    println!("Watcher stopped.");
    Ok(())
}

/// A change qualifies if no ignore pattern matches its path and it is not a
/// directory-level event.
fn qualifies(path: &Path, patterns: &[String]) -> bool {
    !is_ignored(path, patterns) && !path.is_dir()
}

fn is_ignored(path: &Path, patterns: &[String]) -> bool {
    let path = path.to_string_lossy();
    patterns.iter().any(|pattern| path.contains(pattern.as_str()))
}

fn ignore_patterns(config: &Config) -> Vec<String> {
    let mut patterns: Vec<String> = IGNORED_SUBSTRINGS
        .iter()
        .map(|pattern| pattern.to_string())
        .collect();
    patterns.push(config.output_directory_name().to_owned());
    patterns
}

fn kind_label(kind: &EventKind) -> Option<&'static str> {
    match kind {
        EventKind::Create(_) => Some("created"),
        EventKind::Modify(ModifyKind::Name(_)) => Some("moved"),
        EventKind::Modify(_) => Some("modified"),
        EventKind::Remove(_) => Some("deleted"),
        _ => None,
    }
}

/// Logs the coalesced changes and runs one full build. A failure is logged
/// and the watcher keeps running; the watcher process must outlive
/// individual rebuild failures.
fn rebuild(config: &Config, changes: &[(PathBuf, &'static str)]) {
    let stamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    for (path, kind) in changes {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        println!("\n{} -- {} has been {}. Building the site...", stamp, name, kind);
    }

    if let Err(err) = build::build_site(config, &build::Options { watch: true }) {
        eprintln!("Error: {}", err);
    }
}

/// Batches rapid file events: changes accumulate keyed by path until no new
/// event has arrived for the debounce window, then flush as one rebuild.
struct Debouncer {
    pending: BTreeMap<PathBuf, &'static str>,
    last_event: Option<Instant>,
}

impl Debouncer {
    fn new() -> Debouncer {
        Debouncer {
            pending: BTreeMap::new(),
            last_event: None,
        }
    }

    fn add(&mut self, path: PathBuf, kind: &'static str) {
        self.pending.insert(path, kind);
        self.last_event = Some(Instant::now());
    }

    fn ready(&self) -> bool {
        !self.pending.is_empty()
            && self
                .last_event
                .is_some_and(|t| t.elapsed() >= Duration::from_millis(DEBOUNCE_MS))
    }

    fn take(&mut self) -> Vec<(PathBuf, &'static str)> {
        self.last_event = None;
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    fn timeout(&self) -> Duration {
        if self.pending.is_empty() {
            Duration::from_millis(IDLE_TIMEOUT_MS)
        } else {
            Duration::from_millis(DEBOUNCE_MS)
        }
    }
}

/// The result of starting the watcher.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents an error setting up the watch subscriptions or the interrupt
/// handler. Rebuild failures are not errors at this level; they are logged
/// inside the loop.
#[derive(Debug)]
pub enum Error {
    /// Returned when the OS-level watcher can't be created or a root can't
    /// be subscribed.
    Notify(notify::Error),

    /// Returned when the interrupt handler can't be installed.
    Interrupt(ctrlc::Error),
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Notify(err) => write!(f, "starting watcher: {}", err),
            Error::Interrupt(err) => write!(f, "installing interrupt handler: {}", err),
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Notify(err) => Some(err),
            Error::Interrupt(err) => Some(err),
        }
    }
}

impl From<notify::Error> for Error {
    /// Converts a [`notify::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator during watcher setup.
    fn from(err: notify::Error) -> Error {
        Error::Notify(err)
    }
}

impl From<ctrlc::Error> for Error {
    /// Converts a [`ctrlc::Error`] into an [`Error`]. This allows us to use
    /// the `?` operator when installing the interrupt handler.
    fn from(err: ctrlc::Error) -> Error {
        Error::Interrupt(err)
    }
}
