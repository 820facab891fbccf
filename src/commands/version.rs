//! Command: print version information.
use std::io::Write as _;

use anyhow::Result;

/// Version string stamped by the build script, or the crate version.
#[must_use]
pub fn version() -> &'static str {
    option_env!("TROVL_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}

/// Print the trovl version to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run() -> Result<()> {
    writeln!(std::io::stdout().lock(), "trovl {}", version())?;
    Ok(())
}
