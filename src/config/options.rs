//! Options that steer conflict resolution.
use std::path::PathBuf;

/// How to answer a yes/no conflict question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Policy {
    /// Ask the decision provider.
    #[default]
    Ask,
    /// Answer yes without asking.
    Always,
    /// Answer no without asking.
    Never,
}

impl Policy {
    /// Build a policy from a pair of mutually exclusive "yes"/"no" flags.
    ///
    /// The command layer rejects both flags at once, so `yes` wins only as a
    /// tie-break for programmatic callers.
    #[must_use]
    pub const fn from_flags(yes: bool, no: bool) -> Self {
        match (yes, no) {
            (true, _) => Self::Always,
            (false, true) => Self::Never,
            (false, false) => Self::Ask,
        }
    }

    /// The preset answer, or `None` when the user must be asked.
    #[must_use]
    pub const fn preset(self) -> Option<bool> {
        match self {
            Self::Ask => None,
            Self::Always => Some(true),
            Self::Never => Some(false),
        }
    }
}

/// Process-wide configuration for conflict resolution.
///
/// Owned by the command layer and passed by reference into the engine,
/// which never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionOptions {
    /// Keep paths relative instead of resolving them against the working directory.
    pub use_relative: bool,
    /// What to do when a symlink already occupies the link path.
    pub overwrite: Policy,
    /// What to do when an ordinary file occupies the link path.
    pub backup: Policy,
    /// Where backups go; `None` selects the default backup directory.
    pub backup_dir: Option<PathBuf>,
    /// Run every decision but skip all filesystem mutation.
    pub dry_run: bool,
}

impl ResolutionOptions {
    /// Copy of these options with relative mode additionally enabled when `relative` is set.
    #[must_use]
    pub fn with_relative(&self, relative: bool) -> Self {
        Self {
            use_relative: self.use_relative || relative,
            ..self.clone()
        }
    }
}
