// Shared helpers for integration tests.
//
// Provides a temporary-directory-backed sandbox and a fluent builder so each
// integration test can set up an isolated filesystem and a non-interactive
// engine context without repeating boilerplate.
//
// Used by all integration test binaries that declare `mod common;`.
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use trovl::config::ResolutionOptions;
use trovl::context::Context;
use trovl::links::{DecisionProvider, ScriptedDecisions};
use trovl::logging::{BufferedLog, Log};

/// An isolated sandbox backed by a [`tempfile::TempDir`].
///
/// Holds the engine context wired to in-memory logging and scripted
/// answers; backups go to `<sandbox>/backups`.
pub struct Sandbox {
    /// Temporary directory everything lives in.
    pub root: tempfile::TempDir,
    /// Engine context for the test.
    pub ctx: Context,
    /// Captured log output.
    pub log: Arc<BufferedLog>,
    /// Answers given (and questions asked) during the test.
    pub decisions: Arc<ScriptedDecisions>,
}

impl Sandbox {
    /// Absolute path of `rel` inside the sandbox.
    pub fn path(&self, rel: &str) -> PathBuf {
        self.root.path().join(rel)
    }

    /// `path(rel)` as a string, the way the CLI receives it.
    pub fn arg(&self, rel: &str) -> String {
        self.path(rel).to_str().expect("utf-8 temp path").to_string()
    }

    /// Backup directory used by this sandbox.
    pub fn backup_dir(&self) -> PathBuf {
        self.path("backups")
    }

    /// Names of the files in the backup directory.
    pub fn backups(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.backup_dir()) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .map(|e| e.expect("dir entry").file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    /// Every path under the sandbox, relative and sorted, with symlink
    /// targets and file contents, for before/after comparisons.
    pub fn snapshot(&self) -> Vec<String> {
        let mut out = Vec::new();
        walk(self.root.path(), self.root.path(), &mut out);
        out.sort();
        out
    }
}

fn walk(base: &Path, dir: &Path, out: &mut Vec<String>) {
    for entry in std::fs::read_dir(dir).expect("read sandbox dir") {
        let path = entry.expect("dir entry").path();
        let rel = path.strip_prefix(base).expect("under base").display().to_string();
        let meta = std::fs::symlink_metadata(&path).expect("metadata");
        if meta.file_type().is_symlink() {
            let target = std::fs::read_link(&path).expect("read link");
            out.push(format!("{rel} -> {}", target.display()));
        } else if meta.is_dir() {
            out.push(format!("{rel}/"));
            walk(base, &path, out);
        } else {
            let contents = std::fs::read_to_string(&path).unwrap_or_default();
            out.push(format!("{rel} = {contents}"));
        }
    }
}

/// Fluent builder for [`Sandbox`].
pub struct SandboxBuilder {
    root: tempfile::TempDir,
    options: ResolutionOptions,
    answers: Vec<bool>,
}

impl SandboxBuilder {
    /// Begin building an empty sandbox with default options.
    pub fn new() -> Self {
        Self {
            root: tempfile::tempdir().expect("create temp dir"),
            options: ResolutionOptions::default(),
            answers: Vec::new(),
        }
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn with_file(self, rel: &str, content: &str) -> Self {
        let path = self.root.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("create parent dir");
        }
        std::fs::write(&path, content).expect("write file");
        self
    }

    /// Create the directory `rel`.
    pub fn with_dir(self, rel: &str) -> Self {
        std::fs::create_dir_all(self.root.path().join(rel)).expect("create dir");
        self
    }

    /// Create a symlink at `rel` whose text is `target`.
    #[cfg(unix)]
    pub fn with_symlink(self, rel: &str, target: &str) -> Self {
        std::os::unix::fs::symlink(target, self.root.path().join(rel)).expect("create symlink");
        self
    }

    /// Replace the resolution options; the backup directory is kept in the sandbox.
    pub fn with_options(mut self, options: ResolutionOptions) -> Self {
        self.options = options;
        self
    }

    /// Answers the scripted decision provider gives, in order.
    pub fn answering(mut self, answers: &[bool]) -> Self {
        self.answers = answers.to_vec();
        self
    }

    /// Finish the sandbox.
    pub fn build(self) -> Sandbox {
        let mut options = self.options;
        options.backup_dir = Some(self.root.path().join("backups"));
        let log = Arc::new(BufferedLog::new());
        let decisions = Arc::new(ScriptedDecisions::new(self.answers));
        let ctx = Context::new(options, Arc::clone(&log) as Arc<dyn Log>)
            .with_decisions(Arc::clone(&decisions) as Arc<dyn DecisionProvider>);
        Sandbox {
            root: self.root,
            ctx,
            log,
            decisions,
        }
    }
}

/// Serialises tests that change the process working directory.
static CWD_LOCK: Mutex<()> = Mutex::new(());

/// Working-directory change that is undone on drop.
pub struct CwdGuard {
    previous: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl CwdGuard {
    /// Make `dir` the working directory until the guard is dropped.
    pub fn enter(dir: &Path) -> Self {
        let lock = CWD_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
        let previous = std::env::current_dir().expect("current dir");
        std::env::set_current_dir(dir).expect("enter sandbox");
        Self {
            previous,
            _lock: lock,
        }
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.previous);
    }
}
