//! Platform symlink syscalls.
use std::io;
use std::path::Path;

/// Create a symlink at `link` pointing to `target`.
///
/// Windows distinguishes file and directory links, so `is_dir` picks the
/// flavour there; Unix ignores it.
pub(crate) fn create(target: &Path, link: &Path, is_dir: bool) -> io::Result<()> {
    #[cfg(unix)]
    {
        let _ = is_dir;
        std::os::unix::fs::symlink(target, link)
    }

    #[cfg(windows)]
    {
        if is_dir {
            std::os::windows::fs::symlink_dir(target, link)
        } else {
            std::os::windows::fs::symlink_file(target, link)
        }
    }
}

/// Remove the symlink at `path` without touching what it points to.
///
/// Directory symlinks on Windows must go through `remove_dir`.
pub(crate) fn remove(path: &Path) -> io::Result<()> {
    let meta = std::fs::symlink_metadata(path)?;
    if is_dir_like(&meta) {
        std::fs::remove_dir(path)
    } else {
        std::fs::remove_file(path)
    }
}

/// `symlink_metadata().is_dir()` is `false` for directory symlinks on
/// Windows, so check the raw `FILE_ATTRIBUTE_DIRECTORY` bit there.
fn is_dir_like(meta: &std::fs::Metadata) -> bool {
    #[cfg(windows)]
    {
        use std::os::windows::fs::MetadataExt;
        meta.file_attributes() & 0x10 != 0 // FILE_ATTRIBUTE_DIRECTORY
    }
    #[cfg(not(windows))]
    {
        meta.is_dir()
    }
}
