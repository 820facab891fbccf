//! Domain-specific error types for the link engine.
//!
//! Library modules return the typed errors below; command handlers at the
//! CLI boundary convert them to [`anyhow::Error`] via `?`.
//!
//! ```text
//! PathError:     home/working directory cannot be determined
//! LinkError:     constructing, applying or removing one link
//! ManifestError: reading, parsing, validating, applying a manifest
//! ```
//!
//! A user declining an overwrite or backup is *not* an error; it is reported
//! as [`Construction::Skipped`](crate::links::Construction::Skipped).

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the path resolver.
#[derive(Error, Debug)]
pub enum PathError {
    /// The host OS could not report the user's home directory.
    #[error("could not determine the home directory")]
    NoHomeDir,

    /// The current working directory is unavailable.
    #[error("could not determine the working directory: {0}")]
    NoWorkingDir(#[source] std::io::Error),
}

/// Errors from constructing, applying or removing a single link.
#[derive(Error, Debug)]
pub enum LinkError {
    /// The target or link path could not be resolved.
    #[error("invalid path ({role}) '{raw}': {source}")]
    InvalidPath {
        /// `"target"` or `"link"`.
        role: &'static str,
        /// The path as given by the user.
        raw: String,
        /// Why resolution failed.
        source: PathError,
    },

    /// The link target does not exist.
    #[error("invalid target path '{}': does not exist", .0.display())]
    InvalidTarget(PathBuf),

    /// A real directory occupies the link path; never resolved automatically.
    #[error("existing directory at link path '{}'", .0.display())]
    ExistingDirectory(PathBuf),

    /// Nothing exists at the path given for removal.
    #[error("no symlink exists at '{}'", .0.display())]
    NotFound(PathBuf),

    /// The path given for removal is not a symlink; it is left alone.
    #[error("'{}' is not a symlink, refusing to remove it", .0.display())]
    NotASymlink(PathBuf),

    /// Copying a conflicting file into the backup directory failed.
    #[error("could not back up '{}': {source}", .path.display())]
    Backup {
        /// The file that was being backed up.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// No backup directory was given and the default one is unknown.
    #[error("could not determine the backup directory: {0}")]
    BackupDir(#[source] PathError),

    /// A filesystem operation failed.
    #[error("{action} '{}': {source}", .path.display())]
    Io {
        /// What was being attempted, e.g. `"create symlink"`.
        action: &'static str,
        /// The path involved.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl LinkError {
    /// Wrap an I/O error with the action and the path it concerned.
    pub fn io(action: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            action,
            path: path.into(),
            source,
        }
    }
}

/// Errors from loading, validating and applying manifests.
#[derive(Error, Debug)]
pub enum ManifestError {
    /// The manifest file could not be read.
    #[error("could not read manifest file '{}': {source}", .path.display())]
    Read {
        /// Manifest path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The manifest is not valid JSON for the expected shape.
    #[error("could not parse manifest: {0}")]
    Parse(#[from] serde_json::Error),

    /// An entry violates a manifest invariant.
    #[error("links[{index}]: {message}")]
    Invalid {
        /// Zero-based entry index.
        index: usize,
        /// What is wrong with the entry.
        message: String,
    },

    /// Applying an entry failed; the remaining entries were not processed.
    #[error("links[{index}]: {source}")]
    Entry {
        /// Zero-based entry index.
        index: usize,
        /// The link failure.
        source: LinkError,
    },

    /// Writing a generated manifest failed.
    #[error("could not write manifest '{}': {source}", .path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl ManifestError {
    pub(crate) fn invalid(index: usize, message: impl Into<String>) -> Self {
        Self::Invalid {
            index,
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use std::error::Error as StdError;
    use std::io;

    #[test]
    fn invalid_target_display() {
        let e = LinkError::InvalidTarget(PathBuf::from("/nope"));
        assert_eq!(
            e.to_string(),
            "invalid target path '/nope': does not exist"
        );
    }

    #[test]
    fn existing_directory_display() {
        let e = LinkError::ExistingDirectory(PathBuf::from("/home/u/.config"));
        assert_eq!(
            e.to_string(),
            "existing directory at link path '/home/u/.config'"
        );
    }

    #[test]
    fn io_error_keeps_source() {
        let e = LinkError::io(
            "create symlink",
            "/tmp/x",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(e.to_string().starts_with("create symlink '/tmp/x'"));
        assert!(e.source().is_some());
    }

    #[test]
    fn invalid_path_names_role() {
        let e = LinkError::InvalidPath {
            role: "link",
            raw: "~/x".to_string(),
            source: PathError::NoHomeDir,
        };
        assert_eq!(
            e.to_string(),
            "invalid path (link) '~/x': could not determine the home directory"
        );
    }

    #[test]
    fn manifest_invalid_names_index() {
        let e = ManifestError::invalid(3, "missing target");
        assert_eq!(e.to_string(), "links[3]: missing target");
    }

    #[test]
    fn manifest_entry_wraps_link_error() {
        let e = ManifestError::Entry {
            index: 1,
            source: LinkError::InvalidTarget(PathBuf::from("a.txt")),
        };
        assert!(e.to_string().starts_with("links[1]: invalid target path"));
        assert!(e.source().is_some());
    }

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn all_error_types_are_send_sync() {
        assert_send_sync::<PathError>();
        assert_send_sync::<LinkError>();
        assert_send_sync::<ManifestError>();
    }

    #[test]
    fn link_error_converts_to_anyhow() {
        let e = LinkError::NotFound(PathBuf::from("x"));
        let _anyhow_err: anyhow::Error = e.into();
    }
}
