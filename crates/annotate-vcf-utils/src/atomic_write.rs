//! Atomic file operations
//!
//! - Temporary file creation with fsync, then rename into place
//! - Cross-filesystem fallback (copy, fsync, replace) for moves between mounts

use anyhow::{Context, Result};
use std::fs::{self, File};
use std::io::{self, ErrorKind, Write};
use std::path::Path;

use tempfile::NamedTempFile;

/// Result of an atomic write or move
#[derive(Debug, Clone, Default)]
pub struct AtomicWriteResult {
    /// Whether cross-filesystem fallback was used
    pub used_cross_filesystem_fallback: bool,
    /// Any warnings generated during the operation
    pub warnings: Vec<String>,
}

/// Atomically write content to a file using temp file + fsync + rename.
///
/// Readers of `path` see either the previous content or the new content.
pub fn write_file_atomic(path: &Path, content: &str) -> Result<AtomicWriteResult> {
    let parent = parent_dir(path);
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create parent directory: {}", parent.display()))?;

    let mut temp_file = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in: {}", parent.display()))?;

    temp_file
        .write_all(content.as_bytes())
        .context("Failed to write content to temporary file")?;
    temp_file
        .as_file()
        .sync_all()
        .context("Failed to fsync temporary file")?;

    temp_file
        .persist(path)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to atomically write file: {}", path.display()))?;

    Ok(AtomicWriteResult::default())
}

/// Move `from` to `to`, replacing any existing file at `to`.
///
/// A plain rename is tried first. When the two paths are on different
/// filesystems the file is copied next to `to`, fsynced, renamed over `to`,
/// and only then is `from` removed.
pub fn relocate_file(from: &Path, to: &Path) -> Result<AtomicWriteResult> {
    let mut result = AtomicWriteResult::default();

    match fs::rename(from, to) {
        Ok(()) => {}
        Err(e) if is_cross_filesystem_error(&e) => {
            result.used_cross_filesystem_fallback = true;
            result
                .warnings
                .push("Used cross-filesystem fallback (copy, fsync, replace)".to_string());
            cross_filesystem_copy(from, to)?;
            fs::remove_file(from)
                .with_context(|| format!("Failed to remove source file: {}", from.display()))?;
        }
        Err(e) => {
            return Err(e).with_context(|| {
                format!("Failed to move {} to {}", from.display(), to.display())
            });
        }
    }

    Ok(result)
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    }
}

fn is_cross_filesystem_error(err: &io::Error) -> bool {
    err.kind() == ErrorKind::CrossesDevices
}

fn cross_filesystem_copy(from: &Path, to: &Path) -> Result<()> {
    let parent = parent_dir(to);
    let mut temp_file = NamedTempFile::new_in(parent)
        .with_context(|| format!("Failed to create temporary file in: {}", parent.display()))?;

    let mut source =
        File::open(from).with_context(|| format!("Failed to open: {}", from.display()))?;
    io::copy(&mut source, temp_file.as_file_mut())
        .with_context(|| format!("Failed to copy {}", from.display()))?;
    temp_file
        .as_file()
        .sync_all()
        .context("Failed to fsync copied file")?;

    temp_file
        .persist(to)
        .map_err(|e| e.error)
        .with_context(|| format!("Failed to replace target file: {}", to.display()))?;
    Ok(())
}
