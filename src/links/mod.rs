//! The link engine: decide whether a link can be placed, then place it.
//!
//! [`construct`] inspects the filesystem, settles conflicts with the
//! configured [`Policy`](crate::config::Policy) or the decision provider, and
//! hands back a [`LinkSpec`] that [`apply`] turns into a real symlink.
//! [`remove_by_path`] undoes a link without touching its target.
pub mod backup;
pub mod prompt;

mod apply;
mod construct;
mod symlink;

pub use apply::{apply, remove_by_path};
pub use construct::construct;
pub use prompt::{DecisionProvider, ScriptedDecisions, TerminalPrompt};

use std::fmt;
use std::path::PathBuf;

/// Whether a link points at a file or a directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkKind {
    /// The target is a file (or anything that is not a directory).
    File,
    /// The target is a directory.
    Directory,
}

/// A link that is safe to create: the target exists and the mount is free.
///
/// Produced by [`construct`] and consumed by [`apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkSpec {
    /// Canonical path of the real file or directory.
    pub target: PathBuf,
    /// Canonical path where the symlink goes.
    pub mount: PathBuf,
    /// What the target is.
    pub kind: LinkKind,
}

impl fmt::Display for LinkSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.mount.display(), self.target.display())
    }
}

/// Outcome of [`construct`] that is not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Construction {
    /// Nothing is in the way; apply it.
    Ready(LinkSpec),
    /// No link will be created, for the given reason.
    Skipped(Skip),
}

/// Why [`construct`] declined to produce a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Skip {
    /// Dry run found something at the mount and reported what it would do.
    DryRunConflict,
    /// An existing symlink was not to be overwritten.
    DeclinedOverwrite,
    /// An existing file was not to be backed up and replaced.
    DeclinedBackup,
}

impl Skip {
    /// Short description for logs and summaries.
    #[must_use]
    pub const fn reason(self) -> &'static str {
        match self {
            Self::DryRunConflict => "conflict at link path",
            Self::DeclinedOverwrite => "declined overwrite",
            Self::DeclinedBackup => "declined backup",
        }
    }

    /// Whether this skip came from a decision rather than a dry run.
    #[must_use]
    pub const fn is_declined(self) -> bool {
        matches!(self, Self::DeclinedOverwrite | Self::DeclinedBackup)
    }
}
