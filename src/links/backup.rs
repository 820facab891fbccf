//! Timestamped copies of files displaced by new links.
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;

/// `chrono` format of the timestamp embedded in backup names.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Copy `path` into `backup_dir` under a name stamped with the local time.
///
/// Returns the path of the copy. The original is left in place.
///
/// # Errors
///
/// Returns the I/O error if the directory cannot be created or the copy fails.
pub fn backup_file(path: &Path, backup_dir: &Path) -> io::Result<PathBuf> {
    backup_file_at(path, backup_dir, chrono::Local::now().naive_local())
}

/// [`backup_file`] with an explicit timestamp.
///
/// # Errors
///
/// See [`backup_file`].
pub fn backup_file_at(path: &Path, backup_dir: &Path, at: NaiveDateTime) -> io::Result<PathBuf> {
    let destination = backup_dir.join(backup_name(path, at));
    fs::create_dir_all(backup_dir)?;
    fs::copy(path, &destination)?;
    Ok(destination)
}

/// `{stem}_backup_{timestamp}{.ext}` for the final component of `path`.
///
/// Dot files such as `.bashrc` have no extension and keep their full name
/// as the stem.
#[must_use]
pub fn backup_name(path: &Path, at: NaiveDateTime) -> String {
    let stem = path
        .file_stem()
        .map_or_else(String::new, |s| s.to_string_lossy().into_owned());
    let ext = path
        .extension()
        .map_or_else(String::new, |e| format!(".{}", e.to_string_lossy()));
    format!("{stem}_backup_{}{ext}", at.format(TIMESTAMP_FORMAT))
}
