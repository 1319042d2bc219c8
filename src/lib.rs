//! The library code for the `skald` static site generator. The architecture
//! can be generally broken down into three distinct steps:
//!
//! 1. Loading content records from markdown source files on disk
//!    ([`crate::content`])
//! 2. Rendering each record through the site template ([`crate::render`])
//! 3. Writing the rendered documents to the output directory
//!    ([`crate::write`])
//!
//! The three steps are strictly sequential: loading completes fully before
//! rendering begins, and rendering completes fully before anything touches
//! the output directory. Because the output directory is destroyed and
//! recreated on every build, a build either produces a complete site or no
//! new site at all.
//!
//! On top of the pipeline sit two thin collaborators (an external CSS
//! toolchain, [`crate::stylesheet`], and a verbatim asset copy,
//! [`crate::assets`]) and one long-lived component: the change watcher
//! ([`crate::watch`]), which re-runs the whole pipeline on qualifying
//! filesystem events until interrupted.

#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]

pub mod assets;
pub mod build;
pub mod config;
pub mod content;
pub mod livereload;
pub mod render;
pub mod stylesheet;
pub mod typography;
pub mod watch;
pub mod write;
