//! Process-wide configuration: resolution options and well-known directories.
//!
//! trovl has no configuration file of its own; the manifest is the only
//! declarative input. Options come from the command line and directories from
//! the XDG variables, falling back to the platform defaults.
pub mod options;

pub use options::{Policy, ResolutionOptions};

use std::path::PathBuf;

use crate::error::PathError;

/// Application directory name used under the config and cache roots.
pub const APP_NAME: &str = "trovl";

/// File name of the default manifest inside [`config_dir`].
pub const DEFAULT_MANIFEST: &str = "manifest.json";

/// Return `$XDG_CONFIG_HOME/trovl`, falling back to `~/.config/trovl`.
///
/// The fallback is the same on every OS. The directory is not created.
///
/// # Errors
///
/// Returns [`PathError::NoHomeDir`] if the variable is unset and the home
/// directory is unknown.
pub fn config_dir() -> Result<PathBuf, PathError> {
    if let Some(xdg) = non_empty_var("XDG_CONFIG_HOME") {
        return Ok(PathBuf::from(xdg).join(APP_NAME));
    }
    let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
    Ok(home.join(".config").join(APP_NAME))
}

/// Return `$XDG_CACHE_HOME/trovl`, falling back to the OS cache directory.
///
/// The directory is not created.
///
/// # Errors
///
/// Returns [`PathError::NoHomeDir`] if neither source is available.
pub fn cache_dir() -> Result<PathBuf, PathError> {
    if let Some(xdg) = non_empty_var("XDG_CACHE_HOME") {
        return Ok(PathBuf::from(xdg).join(APP_NAME));
    }
    let base = dirs::cache_dir().ok_or(PathError::NoHomeDir)?;
    Ok(base.join(APP_NAME))
}

/// Default manifest location.
///
/// # Errors
///
/// See [`config_dir`].
pub fn default_manifest_path() -> Result<PathBuf, PathError> {
    Ok(config_dir()?.join(DEFAULT_MANIFEST))
}

/// Default directory for backups of files displaced by new links.
///
/// # Errors
///
/// See [`cache_dir`].
pub fn default_backup_dir() -> Result<PathBuf, PathError> {
    Ok(cache_dir()?.join("backups"))
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

/// Serializes environment-variable manipulation across parallel test threads.
#[cfg(test)]
pub(crate) static TEST_ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
