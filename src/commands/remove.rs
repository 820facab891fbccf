//! Remove command implementation.
use std::sync::Arc;

use anyhow::Result;

use crate::cli::{GlobalOpts, RemoveOpts};
use crate::context::Context;
use crate::links;
use crate::logging::{EntryStatus, Logger};

/// Run the remove command.
///
/// # Errors
///
/// Returns an error if any of the links could not be removed.
pub fn run(global: &GlobalOpts, opts: &RemoveOpts, log: &Arc<Logger>) -> Result<()> {
    let result = execute(&super::context(global, log), opts);
    super::finish(log, result)
}

/// Remove every listed symlink, carrying on past failures.
///
/// # Errors
///
/// Returns an error naming how many removals failed.
pub fn execute(ctx: &Context, opts: &RemoveOpts) -> Result<()> {
    ctx.log.stage("Removing symlinks");
    let mut failed = 0usize;
    for link in &opts.links {
        match links::remove_by_path(ctx, link) {
            Ok(path) => {
                let status = if ctx.options.dry_run {
                    EntryStatus::DryRun
                } else {
                    EntryStatus::Ok
                };
                ctx.log
                    .record_entry(&path.display().to_string(), status, None);
            }
            Err(e) => {
                failed += 1;
                ctx.log.error(&format!("could not remove {link}: {e}"));
                ctx.log
                    .record_entry(link, EntryStatus::Failed, Some(&e.to_string()));
            }
        }
    }
    if failed > 0 {
        anyhow::bail!("{failed} of {} link(s) could not be removed", opts.links.len());
    }
    Ok(())
}
