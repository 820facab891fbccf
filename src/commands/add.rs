//! Add command implementation.
use std::sync::Arc;

use anyhow::{Context as _, Result, bail};

use crate::cli::{AddOpts, GlobalOpts};
use crate::context::Context;
use crate::links::{self, Construction, Skip};
use crate::logging::Logger;

/// Run the add command.
///
/// # Errors
///
/// Returns an error if the link cannot be created or the conflict was declined.
pub fn run(global: &GlobalOpts, opts: &AddOpts, log: &Arc<Logger>) -> Result<()> {
    execute(&super::context(global, log), opts)
}

/// Create one link with an explicit context.
///
/// A dry run that finds a conflict succeeds after reporting it; a declined
/// conflict is an error so the exit status shows that nothing happened.
///
/// # Errors
///
/// Returns an error if construction or creation fails, or the conflict was
/// declined.
pub fn execute(ctx: &Context, opts: &AddOpts) -> Result<()> {
    ctx.log
        .stage(&format!("Linking {} -> {}", opts.link, opts.target));
    let construction = links::construct(ctx, &opts.target, &opts.link)
        .with_context(|| format!("could not add link {}", opts.link))?;
    match construction {
        Construction::Ready(spec) => {
            let label = spec.to_string();
            links::apply(ctx, spec).with_context(|| format!("could not create {label}"))
        }
        Construction::Skipped(Skip::DryRunConflict) => Ok(()),
        Construction::Skipped(skip) => bail!("{}, no action taken", skip.reason()),
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::{Policy, ResolutionOptions};
    use crate::context::test_context;
    use std::fs;

    fn opts(target: &std::path::Path, link: &std::path::Path) -> AddOpts {
        AddOpts {
            target: target.to_str().unwrap().to_string(),
            link: link.to_str().unwrap().to_string(),
        }
    }

    #[test]
    fn declined_backup_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("t");
        let link = dir.path().join("l");
        fs::write(&target, "x").unwrap();
        fs::write(&link, "old").unwrap();
        let options = ResolutionOptions {
            backup: Policy::Never,
            ..ResolutionOptions::default()
        };
        let (ctx, _log, _) = test_context(options, []);

        let err = execute(&ctx, &opts(&target, &link)).unwrap_err();

        assert_eq!(err.to_string(), "declined backup, no action taken");
        assert_eq!(fs::read_to_string(&link).unwrap(), "old");
    }

    #[test]
    fn dry_run_conflict_succeeds() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("t");
        let link = dir.path().join("l");
        fs::write(&target, "x").unwrap();
        fs::write(&link, "old").unwrap();
        let options = ResolutionOptions {
            dry_run: true,
            ..ResolutionOptions::default()
        };
        let (ctx, _log, _) = test_context(options, []);

        execute(&ctx, &opts(&target, &link)).unwrap();
        assert_eq!(fs::read_to_string(&link).unwrap(), "old");
    }

    #[test]
    fn missing_target_has_context() {
        let dir = tempfile::tempdir().unwrap();
        let (ctx, _log, _) = test_context(ResolutionOptions::default(), []);
        let err = execute(&ctx, &opts(&dir.path().join("nope"), &dir.path().join("l")))
            .unwrap_err();
        assert!(err.to_string().starts_with("could not add link"));
        assert!(format!("{err:#}").contains("does not exist"));
    }
}
