use std::sync::Arc;

use crate::config::ResolutionOptions;
use crate::links::{DecisionProvider, TerminalPrompt};
use crate::logging::Log;
use crate::operations::{FileSystemOps, SystemFileSystemOps};
use crate::paths::PathResolver;
use crate::platform::Platform;

/// Everything a link operation needs, passed explicitly.
#[derive(Clone)]
pub struct Context {
    /// Conflict-resolution options from the command line.
    pub options: ResolutionOptions,
    /// Logger for output and entry recording.
    pub log: Arc<dyn Log>,
    /// Filesystem probing (injectable for testing).
    pub fs_ops: Arc<dyn FileSystemOps>,
    /// Where undecided conflicts are asked.
    pub decisions: Arc<dyn DecisionProvider>,
    /// Platform used for manifest routing.
    pub platform: Platform,
    /// Path conventions of the host.
    pub resolver: PathResolver,
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("options", &self.options)
            .field("log", &"<dyn Log>")
            .field("fs_ops", &"<dyn FileSystemOps>")
            .field("decisions", &"<dyn DecisionProvider>")
            .field("platform", &self.platform)
            .field("resolver", &self.resolver)
            .finish()
    }
}

impl Context {
    /// Context for the running platform with the real filesystem and a
    /// terminal prompt.
    #[must_use]
    pub fn new(options: ResolutionOptions, log: Arc<dyn Log>) -> Self {
        let platform = Platform::detect();
        Self {
            options,
            log,
            fs_ops: Arc::new(SystemFileSystemOps),
            decisions: Arc::new(TerminalPrompt),
            platform,
            resolver: PathResolver::new(platform.os),
        }
    }

    /// Copy of this context with a different decision provider.
    #[must_use]
    pub fn with_decisions(&self, decisions: Arc<dyn DecisionProvider>) -> Self {
        Self {
            decisions,
            ..self.clone()
        }
    }

    /// Copy of this context with a different [`FileSystemOps`] implementation.
    #[must_use]
    pub fn with_fs_ops(&self, fs_ops: Arc<dyn FileSystemOps>) -> Self {
        Self {
            fs_ops,
            ..self.clone()
        }
    }

    /// Copy of this context routing manifests for `platform`.
    ///
    /// Path conventions stay those of the host.
    #[must_use]
    pub fn with_platform(&self, platform: Platform) -> Self {
        Self {
            platform,
            ..self.clone()
        }
    }

    /// Copy of this context with relative mode also enabled when `relative` is set.
    #[must_use]
    pub fn with_relative(&self, relative: bool) -> Self {
        Self {
            options: self.options.with_relative(relative),
            ..self.clone()
        }
    }
}

/// Context on the real filesystem with in-memory logging and scripted answers.
#[cfg(test)]
pub(crate) fn test_context(
    options: ResolutionOptions,
    answers: impl IntoIterator<Item = bool>,
) -> (
    Context,
    Arc<crate::logging::BufferedLog>,
    Arc<crate::links::ScriptedDecisions>,
) {
    let log = Arc::new(crate::logging::BufferedLog::new());
    let decisions = Arc::new(crate::links::ScriptedDecisions::new(answers));
    let ctx = Context::new(options, Arc::clone(&log) as Arc<dyn Log>)
        .with_decisions(Arc::clone(&decisions) as Arc<dyn DecisionProvider>);
    (ctx, log, decisions)
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::links::ScriptedDecisions;
    use crate::logging::BufferedLog;
    use crate::platform::Os;

    fn ctx() -> Context {
        Context::new(ResolutionOptions::default(), Arc::new(BufferedLog::new()))
    }

    #[test]
    fn new_targets_running_platform() {
        assert_eq!(ctx().platform, Platform::detect());
    }

    #[test]
    fn with_relative_keeps_other_options() {
        let mut base = ctx();
        base.options.dry_run = true;
        let relative = base.with_relative(true);
        assert!(relative.options.use_relative);
        assert!(relative.options.dry_run);
        assert!(!base.options.use_relative);
    }

    #[test]
    fn with_platform_switches_routing() {
        let other = ctx().with_platform(Platform::new(Os::Windows));
        assert_eq!(other.platform.os, Os::Windows);
    }

    #[test]
    fn with_decisions_replaces_provider() {
        let decisions = Arc::new(ScriptedDecisions::new([true]));
        let ctx = ctx().with_decisions(Arc::clone(&decisions) as Arc<dyn DecisionProvider>);
        assert!(ctx.decisions.confirm("go?"));
        assert_eq!(decisions.asked(), vec!["go?"]);
    }

    #[test]
    fn debug_hides_trait_objects() {
        let s = format!("{:?}", ctx());
        assert!(s.contains("<dyn Log>"));
        assert!(s.contains("<dyn DecisionProvider>"));
    }
}
