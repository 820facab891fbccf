//! Apply and plan command implementation.
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::{ApplyOpts, GlobalOpts};
use crate::config;
use crate::context::Context;
use crate::logging::Logger;
use crate::manifest::{self, ApplyReport, Manifest};

/// Run the apply command (or `plan`, when `global.dry_run` is set).
///
/// # Errors
///
/// Returns an error if a manifest cannot be loaded or an entry fails.
pub fn run(global: &GlobalOpts, opts: &ApplyOpts, log: &Arc<Logger>) -> Result<()> {
    let result = execute(&super::context(global, log), opts).map(|_| ());
    super::finish(log, result)
}

/// Apply each manifest in turn, stopping at the first failing one.
///
/// With no manifests given the default manifest is used.
///
/// # Errors
///
/// Returns an error if a manifest cannot be located, read, or validated, or
/// if applying one of its entries fails.
pub fn execute(ctx: &Context, opts: &ApplyOpts) -> Result<Vec<ApplyReport>> {
    let paths = manifest_paths(ctx, &opts.manifests)?;
    let mut reports = Vec::with_capacity(paths.len());
    for path in paths {
        let verb = if ctx.options.dry_run {
            "Planning"
        } else {
            "Applying"
        };
        ctx.log.stage(&format!("{verb} {}", path.display()));
        let manifest = Manifest::load(&path)
            .with_context(|| format!("could not load manifest {}", path.display()))?;
        ctx.log
            .debug(&format!("{} entries", manifest.entries.len()));
        let report = manifest::apply(ctx, &manifest)
            .with_context(|| format!("could not apply manifest {}", path.display()))?;
        ctx.log.info(&format!(
            "{} linked, {} n/a, {} declined, {} dry-run (of {})",
            report.linked,
            report.not_applicable,
            report.declined,
            report.dry_run,
            report.total()
        ));
        reports.push(report);
    }
    Ok(reports)
}

fn manifest_paths(ctx: &Context, raw: &[String]) -> Result<Vec<PathBuf>> {
    if raw.is_empty() {
        return Ok(vec![config::default_manifest_path()?]);
    }
    raw.iter()
        .map(|p| {
            ctx.resolver
                .resolve(p, false)
                .with_context(|| format!("invalid manifest path {p}"))
        })
        .collect()
}
