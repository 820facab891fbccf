//! Generate command implementation.
use std::sync::Arc;

use anyhow::{Context as _, Result};

use crate::cli::{GenerateOpts, GlobalOpts};
use crate::config;
use crate::context::Context;
use crate::logging::Logger;
use crate::manifest;

/// Run the generate command.
///
/// # Errors
///
/// Returns an error if a destination cannot be resolved or written.
pub fn run(global: &GlobalOpts, opts: &GenerateOpts, log: &Arc<Logger>) -> Result<()> {
    execute(&super::context(global, log), opts)
}

/// Write the example manifest to every requested path, or to the default
/// manifest location when none is given.
///
/// Paths are resolved in relative mode. A dry run only reports.
///
/// # Errors
///
/// Returns an error if a path cannot be resolved or written.
pub fn execute(ctx: &Context, opts: &GenerateOpts) -> Result<()> {
    let paths = if opts.paths.is_empty() {
        vec![config::default_manifest_path()?]
    } else {
        opts.paths
            .iter()
            .map(|p| {
                ctx.resolver
                    .resolve(p, true)
                    .with_context(|| format!("invalid manifest path {p}"))
            })
            .collect::<Result<_>>()?
    };

    for path in paths {
        if ctx.options.dry_run {
            ctx.log
                .dry_run(&format!("would generate manifest {}", path.display()));
            continue;
        }
        manifest::generate(&path)?;
        ctx.log
            .info(&format!("generated manifest {}", path.display()));
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::ResolutionOptions;
    use crate::context::test_context;
    use crate::manifest::{Manifest, Platforms};

    #[test]
    fn writes_every_path() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.json");
        let b = dir.path().join("sub").join("b.json");
        let (ctx, _log, _) = test_context(ResolutionOptions::default(), []);
        let opts = GenerateOpts {
            paths: vec![
                a.to_str().unwrap().to_string(),
                b.to_str().unwrap().to_string(),
            ],
        };

        execute(&ctx, &opts).unwrap();

        for path in [a, b] {
            let m = Manifest::load(&path).unwrap();
            assert_eq!(m.entries.len(), 1);
            assert!(matches!(m.entries.first().map(|e| &e.platforms), Some(Platforms::All)));
        }
    }

    #[test]
    fn dry_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("m.json");
        let options = ResolutionOptions {
            dry_run: true,
            ..ResolutionOptions::default()
        };
        let (ctx, _log, _) = test_context(options, []);
        let opts = GenerateOpts {
            paths: vec![path.to_str().unwrap().to_string()],
        };

        execute(&ctx, &opts).unwrap();
        assert!(!path.exists());
    }
}
