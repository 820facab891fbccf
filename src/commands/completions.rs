//! Command: print a shell completion script.
use std::io::Write;

use anyhow::Result;
use clap::CommandFactory as _;

use crate::cli::{Cli, CompletionsOpts};

/// Write the completion script for `opts.shell` to `out`.
///
/// # Errors
///
/// Returns an error if `out` cannot be flushed.
pub fn write(opts: &CompletionsOpts, out: &mut impl Write) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    clap_complete::generate(opts.shell, &mut cmd, name, out);
    out.flush()?;
    Ok(())
}

/// Print the completion script to stdout.
///
/// # Errors
///
/// Returns an error if stdout cannot be written.
pub fn run(opts: &CompletionsOpts) -> Result<()> {
    write(opts, &mut std::io::stdout().lock())
}
