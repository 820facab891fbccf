pub mod add;
pub mod apply;
pub mod completions;
pub mod generate;
pub mod remove;
pub mod version;

use std::sync::Arc;

use anyhow::Result;

use crate::cli::GlobalOpts;
use crate::context::Context;
use crate::logging::{Log, Logger};

/// Build the engine context for a command from the global flags.
#[must_use]
pub fn context(global: &GlobalOpts, log: &Arc<Logger>) -> Context {
    Context::new(global.resolution_options(), Arc::clone(log) as Arc<dyn Log>)
}

/// Print the summary and bail if any entry failed.
///
/// `result` is the command's own outcome; its error wins over the count.
///
/// # Errors
///
/// Returns the command's error, or an error naming the number of failed
/// entries.
pub fn finish(log: &Logger, result: Result<()>) -> Result<()> {
    log.print_summary();
    result?;
    let count = log.failure_count();
    if count > 0 {
        anyhow::bail!("{count} link(s) failed");
    }
    Ok(())
}
