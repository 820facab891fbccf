use crate::context::Context;
use crate::error::{LinkError, ManifestError};
use crate::links::{self, Construction, Skip};
use crate::logging::EntryStatus;

use super::Manifest;

/// What happened to the entries of one manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Links created.
    pub linked: usize,
    /// Entries that do not target the running platform.
    pub not_applicable: usize,
    /// Entries whose conflict was declined.
    pub declined: usize,
    /// Entries a dry run would have linked or found in conflict.
    pub dry_run: usize,
    /// Indices of the declined entries, in order.
    pub declined_indices: Vec<usize>,
}

impl ApplyReport {
    /// Number of entries looked at.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.linked + self.not_applicable + self.declined + self.dry_run
    }
}

enum Outcome {
    Linked,
    DryRun,
    Skipped(Skip),
}

/// Link every entry of `manifest` that applies to the context's platform.
///
/// Entries are processed in order. Declined conflicts and entries for other
/// platforms are skipped; any other failure stops the run.
///
/// # Errors
///
/// Returns [`ManifestError::Entry`] with the index of the entry that failed.
/// Entries before it have already been applied.
pub fn apply(ctx: &Context, manifest: &Manifest) -> Result<ApplyReport, ManifestError> {
    let os = ctx.platform.os;
    let mut report = ApplyReport::default();

    for (index, entry) in manifest.entries.iter().enumerate() {
        let Some(link) = entry.link_for(os) else {
            ctx.log
                .debug(&format!("links[{index}]: does not apply to {os}"));
            ctx.log
                .record_entry(&entry.label(), EntryStatus::NotApplicable, None);
            report.not_applicable += 1;
            continue;
        };
        let label = format!("{link} -> {}", entry.target);
        ctx.log.debug(&format!("links[{index}]: {label}"));

        let entry_ctx = ctx.with_relative(entry.relative);
        match link_one(&entry_ctx, &entry.target, link) {
            Ok(Outcome::Linked) => {
                ctx.log.record_entry(&label, EntryStatus::Ok, None);
                report.linked += 1;
            }
            Ok(Outcome::DryRun) => {
                ctx.log.record_entry(&label, EntryStatus::DryRun, None);
                report.dry_run += 1;
            }
            Ok(Outcome::Skipped(skip)) if skip.is_declined() => {
                ctx.log
                    .record_entry(&label, EntryStatus::Skipped, Some(skip.reason()));
                report.declined += 1;
                report.declined_indices.push(index);
            }
            Ok(Outcome::Skipped(skip)) => {
                ctx.log
                    .record_entry(&label, EntryStatus::DryRun, Some(skip.reason()));
                report.dry_run += 1;
            }
            Err(source) => {
                let message = source.to_string();
                ctx.log
                    .record_entry(&label, EntryStatus::Failed, Some(&message));
                return Err(ManifestError::Entry { index, source });
            }
        }
    }

    Ok(report)
}

fn link_one(ctx: &Context, target: &str, link: &str) -> Result<Outcome, LinkError> {
    match links::construct(ctx, target, link)? {
        Construction::Ready(spec) => {
            links::apply(ctx, spec)?;
            Ok(if ctx.options.dry_run {
                Outcome::DryRun
            } else {
                Outcome::Linked
            })
        }
        Construction::Skipped(skip) => Ok(Outcome::Skipped(skip)),
    }
}
