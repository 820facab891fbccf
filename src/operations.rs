//! Read-only filesystem probing behind an injectable trait.
//!
//! The link engine asks [`FileSystemOps::probe`] what currently sits at a
//! path. Production code uses [`SystemFileSystemOps`]; unit tests swap in a
//! mock to exercise failures the real filesystem cannot produce on demand.

use std::io;
use std::path::{Path, PathBuf};

/// Snapshot of what exists at one path, taken without following symlinks.
///
/// Never cached: every probe reflects the filesystem at the time of the call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathInfo {
    /// Something (file, directory or symlink) exists at the path.
    pub exists: bool,
    /// The entry itself is a directory. Always `false` for symlinks.
    pub is_dir: bool,
    /// The entry is a symbolic link.
    pub is_symlink: bool,
    /// Raw link text as stored in the symlink; `Some` only for symlinks.
    pub symlink_target: Option<PathBuf>,
}

impl PathInfo {
    /// Info for a path where nothing exists.
    #[must_use]
    pub fn missing() -> Self {
        Self::default()
    }
}

/// Abstraction over the filesystem questions the link engine asks.
#[cfg_attr(test, mockall::automock)]
pub trait FileSystemOps: Send + Sync {
    /// Describe the entry at `path`.
    ///
    /// # Errors
    ///
    /// Returns the underlying error for any stat failure other than
    /// "not found", and for an unreadable symlink.
    fn probe(&self, path: &Path) -> io::Result<PathInfo>;
}

/// Production [`FileSystemOps`] implementation that delegates to [`std::fs`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemFileSystemOps;

impl FileSystemOps for SystemFileSystemOps {
    fn probe(&self, path: &Path) -> io::Result<PathInfo> {
        let meta = match std::fs::symlink_metadata(path) {
            Ok(meta) => meta,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(PathInfo::missing()),
            Err(e) => return Err(e),
        };
        let is_symlink = meta.file_type().is_symlink();
        let symlink_target = if is_symlink {
            Some(std::fs::read_link(path)?)
        } else {
            None
        };
        Ok(PathInfo {
            exists: true,
            is_dir: meta.is_dir(),
            is_symlink,
            symlink_target,
        })
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn probe_missing_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let info = SystemFileSystemOps.probe(&dir.path().join("nope")).unwrap();
        assert_eq!(info, PathInfo::missing());
    }

    #[test]
    fn probe_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f.txt");
        std::fs::write(&file, "x").unwrap();
        let info = SystemFileSystemOps.probe(&file).unwrap();
        assert!(info.exists);
        assert!(!info.is_dir && !info.is_symlink);
        assert_eq!(info.symlink_target, None);
    }

    #[test]
    fn probe_directory() {
        let dir = tempfile::tempdir().unwrap();
        let info = SystemFileSystemOps.probe(dir.path()).unwrap();
        assert!(info.exists && info.is_dir && !info.is_symlink);
    }

    #[cfg(unix)]
    #[test]
    fn probe_symlink_reports_raw_target() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink("relative/target", &link).unwrap();
        let info = SystemFileSystemOps.probe(&link).unwrap();
        assert!(info.exists && info.is_symlink && !info.is_dir);
        assert_eq!(info.symlink_target, Some(PathBuf::from("relative/target")));
    }

    #[cfg(unix)]
    #[test]
    fn probe_does_not_follow_symlink_to_directory() {
        let dir = tempfile::tempdir().unwrap();
        let link = dir.path().join("link");
        std::os::unix::fs::symlink(dir.path(), &link).unwrap();
        let info = SystemFileSystemOps.probe(&link).unwrap();
        assert!(info.is_symlink);
        assert!(!info.is_dir, "directory symlink must not report is_dir");
    }

    #[cfg(unix)]
    #[test]
    fn probe_below_a_file_surfaces_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("f");
        std::fs::write(&file, "x").unwrap();
        // ENOTDIR is neither success nor "not found"
        let err = SystemFileSystemOps.probe(&file.join("child")).unwrap_err();
        assert_ne!(err.kind(), io::ErrorKind::NotFound);
    }
}
