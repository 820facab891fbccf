//! In-memory logger that captures messages for later inspection.
use std::sync::Mutex;

use super::types::{EntryRecord, EntryStatus, Log};

/// Severity of a buffered message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Stage header.
    Stage,
    /// Informational.
    Info,
    /// Debug detail.
    Debug,
    /// Warning.
    Warn,
    /// Error.
    Error,
    /// Dry-run action.
    DryRun,
}

/// A single buffered log message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    /// Severity it was logged at.
    pub level: Level,
    /// Text as given to the logger.
    pub text: String,
}

/// Implement the display methods of [`Log`] by buffering each message at the
/// matching [`Level`].
macro_rules! buffer_log_methods {
    ($($method:ident => $level:ident),+ $(,)?) => {
        $(
            fn $method(&self, msg: &str) {
                self.push(Level::$level, msg);
            }
        )+
    };
}

/// Logger that keeps everything in memory; nothing reaches the console or
/// the log file.
#[derive(Debug, Default)]
pub struct BufferedLog {
    messages: Mutex<Vec<Message>>,
    entries: Mutex<Vec<EntryRecord>>,
}

impl BufferedLog {
    /// Create an empty buffer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&self, level: Level, msg: &str) {
        if let Ok(mut guard) = self.messages.lock() {
            guard.push(Message {
                level,
                text: msg.to_string(),
            });
        }
    }

    /// All buffered messages in the order they were logged.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// All recorded entry results.
    #[must_use]
    pub fn entries(&self) -> Vec<EntryRecord> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Whether any message at `level` contains `needle`.
    #[must_use]
    pub fn contains(&self, level: Level, needle: &str) -> bool {
        self.messages
            .lock()
            .is_ok_and(|g| g.iter().any(|m| m.level == level && m.text.contains(needle)))
    }
}

impl Log for BufferedLog {
    buffer_log_methods! {
        stage   => Stage,
        info    => Info,
        debug   => Debug,
        warn    => Warn,
        error   => Error,
        dry_run => DryRun,
    }

    fn record_entry(&self, name: &str, status: EntryStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(EntryRecord {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }
}
