//! Copies static image assets verbatim into the output directory.
//!
//! Runs after the output writer, so the freshly recreated output directory
//! is guaranteed to exist. Only regular files directly under
//! `content/images` are copied; the content tree is never modified.

use std::fs;
use std::io;

use crate::config::Config;

/// Copies `content/images/*` into `public/images/`. The target directory is
/// always created; a missing source directory just means there is nothing to
/// copy.
pub fn copy_images(config: &Config) -> io::Result<()> {
    let target = config.images_output_directory();
    fs::create_dir_all(&target)?;

    let source = config.images_source_directory();
    if !source.is_dir() {
        return Ok(());
    }

    for entry in fs::read_dir(&source)? {
        let entry = entry?;
        if entry.file_type()?.is_file() {
            fs::copy(entry.path(), target.join(entry.file_name()))?;
        }
    }
    Ok(())
}
