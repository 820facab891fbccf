//! Core logging types: entry records, status, and the [`Log`] trait.

/// Outcome of one manifest entry (or single-link command) for the summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryRecord {
    /// Human-readable entry name, usually `link -> target`.
    pub name: String,
    /// Final status of the entry.
    pub status: EntryStatus,
    /// Optional detail (skip reason, error description).
    pub message: Option<String>,
}

/// Status of a processed entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// The link was created.
    Ok,
    /// The entry does not apply to the running platform.
    NotApplicable,
    /// The user (or a never-policy) declined the conflicting change.
    Skipped,
    /// Dry run: the decision was made but nothing was changed.
    DryRun,
    /// The entry failed; processing stopped here.
    Failed,
}

/// Abstraction over logging backends.
///
/// [`Logger`](super::Logger) writes through `tracing`;
/// [`BufferedLog`](super::BufferedLog) keeps everything in memory. The engine
/// only ever sees `&dyn Log`, handed to it explicitly.
pub trait Log: Send + Sync {
    /// Log a stage header (major section).
    fn stage(&self, msg: &str);
    /// Log an informational message.
    fn info(&self, msg: &str);
    /// Log a debug message.
    fn debug(&self, msg: &str);
    /// Log a warning message.
    fn warn(&self, msg: &str);
    /// Log an error message.
    fn error(&self, msg: &str);
    /// Log what a dry run would have done.
    fn dry_run(&self, msg: &str);
    /// Record an entry result for the summary.
    fn record_entry(&self, name: &str, status: EntryStatus, message: Option<&str>);
}
