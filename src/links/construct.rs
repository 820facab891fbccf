use std::path::{Path, PathBuf};

use crate::config::{self, Policy};
use crate::context::Context;
use crate::error::LinkError;
use crate::operations::PathInfo;

use super::{Construction, LinkKind, LinkSpec, Skip, backup, symlink};

/// Decide whether a link from `mount` to `target` can be placed.
///
/// Both paths are resolved with the context's relative mode. A missing
/// mount yields [`Construction::Ready`] straight away. Anything already at
/// the mount is settled first:
///
/// - a symlink is overwritten if the overwrite policy (or the decision
///   provider) agrees;
/// - an ordinary file is copied into the backup directory and removed if the
///   backup policy (or the decision provider) agrees;
/// - a directory is always an error.
///
/// In a dry run conflicts are only reported, except that a directory still
/// fails.
///
/// # Errors
///
/// Returns [`LinkError::InvalidPath`] if a path cannot be resolved,
/// [`LinkError::InvalidTarget`] if the target is missing,
/// [`LinkError::ExistingDirectory`] for a directory at the mount, and
/// [`LinkError::Backup`] or [`LinkError::Io`] when clearing the mount fails.
pub fn construct(ctx: &Context, target: &str, mount: &str) -> Result<Construction, LinkError> {
    let opts = &ctx.options;
    let target = resolve(ctx, "target", target)?;
    let mount = resolve(ctx, "link", mount)?;

    let target_info = probe(ctx, &target)?;
    // a dangling symlink exists itself but has nothing to link to
    if !target_info.exists || (target_info.is_symlink && !target.exists()) {
        return Err(LinkError::InvalidTarget(target));
    }
    let kind = if target_info.is_dir || (target_info.is_symlink && target.is_dir()) {
        LinkKind::Directory
    } else {
        LinkKind::File
    };

    let mount_info = probe(ctx, &mount)?;
    let spec = LinkSpec {
        target,
        mount,
        kind,
    };
    if !mount_info.exists {
        return Ok(Construction::Ready(spec));
    }
    if mount_info.is_dir {
        return Err(LinkError::ExistingDirectory(spec.mount));
    }

    if opts.dry_run {
        let action = if mount_info.is_symlink {
            planned("overwrite symlink", opts.overwrite)
        } else {
            planned("back up file", opts.backup)
        };
        ctx.log
            .dry_run(&format!("conflict at {}: {action}", spec.mount.display()));
        return Ok(Construction::Skipped(Skip::DryRunConflict));
    }

    if mount_info.is_symlink {
        let question = overwrite_question(&spec, &mount_info);
        if !decide(ctx, opts.overwrite, &question) {
            ctx.log.warn(&format!(
                "kept existing symlink {}, no action taken",
                spec.mount.display()
            ));
            return Ok(Construction::Skipped(Skip::DeclinedOverwrite));
        }
        ctx.log
            .info(&format!("overwriting symlink {}", spec.mount.display()));
        symlink::remove(&spec.mount)
            .map_err(|e| LinkError::io("remove existing symlink", &spec.mount, e))?;
        return Ok(Construction::Ready(spec));
    }

    let question = format!(
        "File {} already exists. Back it up and replace it with a link?",
        spec.mount.display()
    );
    if !decide(ctx, opts.backup, &question) {
        ctx.log.warn(&format!(
            "kept existing file {}, no action taken",
            spec.mount.display()
        ));
        return Ok(Construction::Skipped(Skip::DeclinedBackup));
    }

    let backup_dir = match &opts.backup_dir {
        Some(dir) => dir.clone(),
        None => config::default_backup_dir().map_err(LinkError::BackupDir)?,
    };
    let copy = backup::backup_file(&spec.mount, &backup_dir).map_err(|source| {
        LinkError::Backup {
            path: spec.mount.clone(),
            source,
        }
    })?;
    ctx.log.info(&format!(
        "backed up {} to {}",
        spec.mount.display(),
        copy.display()
    ));
    std::fs::remove_file(&spec.mount)
        .map_err(|e| LinkError::io("remove backed-up file", &spec.mount, e))?;

    Ok(Construction::Ready(spec))
}

fn resolve(ctx: &Context, role: &'static str, raw: &str) -> Result<PathBuf, LinkError> {
    ctx.resolver
        .resolve(raw, ctx.options.use_relative)
        .map_err(|source| LinkError::InvalidPath {
            role,
            raw: raw.to_string(),
            source,
        })
}

fn probe(ctx: &Context, path: &Path) -> Result<PathInfo, LinkError> {
    ctx.fs_ops
        .probe(path)
        .map_err(|e| LinkError::io("inspect", path, e))
}

/// Apply `policy`, asking the decision provider only when it is [`Policy::Ask`].
fn decide(ctx: &Context, policy: Policy, question: &str) -> bool {
    policy.preset().map_or_else(
        || ctx.decisions.confirm(question),
        |answer| {
            ctx.log.debug(&format!("{question} {}", if answer { "yes" } else { "no" }));
            answer
        },
    )
}

fn planned(action: &str, policy: Policy) -> String {
    match policy {
        Policy::Always => format!("would {action}"),
        Policy::Never => format!("would not {action}"),
        Policy::Ask => format!("would ask to {action}"),
    }
}

fn overwrite_question(spec: &LinkSpec, existing: &PathInfo) -> String {
    let current = existing.symlink_target.as_deref().map(|raw| {
        // relative link text is relative to the link's own directory
        spec.mount
            .parent()
            .map_or_else(|| raw.to_path_buf(), |dir| dir.join(raw))
    });
    match current {
        Some(current) if same_path(&current, &spec.target) => format!(
            "Symlink {} already points to {}. Overwrite it?",
            spec.mount.display(),
            spec.target.display()
        ),
        Some(current) => format!(
            "Symlink {} points to another target ({}). Overwrite it?",
            spec.mount.display(),
            current.display()
        ),
        None => format!("Symlink {} already exists. Overwrite it?", spec.mount.display()),
    }
}

fn same_path(a: &Path, b: &Path) -> bool {
    let a = crate::paths::clean(dunce::simplified(a));
    let b = crate::paths::clean(dunce::simplified(b));
    if cfg!(windows) {
        a.to_string_lossy()
            .eq_ignore_ascii_case(&b.to_string_lossy())
    } else {
        a == b
    }
}

#[cfg(test)]
#[allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;
    use crate::config::ResolutionOptions;
    use crate::context::test_context;
    use crate::links::prompt::MockDecisionProvider;
    use crate::links::{DecisionProvider, apply};
    use crate::logging::Level;
    use crate::operations::{FileSystemOps, MockFileSystemOps};
    use std::fs;
    use std::io;
    use std::sync::Arc;

    struct Fixture {
        dir: tempfile::TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                dir: tempfile::tempdir().unwrap(),
            }
        }

        fn file(&self, name: &str, contents: &str) -> PathBuf {
            let path = self.dir.path().join(name);
            fs::write(&path, contents).unwrap();
            path
        }

        fn path(&self, name: &str) -> PathBuf {
            self.dir.path().join(name)
        }
    }

    fn s(p: &Path) -> &str {
        p.to_str().unwrap()
    }

    fn ready(c: Construction) -> LinkSpec {
        match c {
            Construction::Ready(spec) => spec,
            Construction::Skipped(skip) => panic!("expected Ready, got Skipped({skip:?})"),
        }
    }

    fn with_policies(overwrite: Policy, backup: Policy) -> ResolutionOptions {
        ResolutionOptions {
            overwrite,
            backup,
            ..ResolutionOptions::default()
        }
    }

    #[test]
    fn missing_mount_is_ready() {
        let fx = Fixture::new();
        let target = fx.file("target.txt", "x");
        let mount = fx.path("link.txt");
        let (ctx, _log, decisions) = test_context(ResolutionOptions::default(), []);

        let spec = ready(construct(&ctx, s(&target), s(&mount)).unwrap());

        assert_eq!(spec.target, target);
        assert_eq!(spec.mount, mount);
        assert_eq!(spec.kind, LinkKind::File);
        assert!(decisions.asked().is_empty());
    }

    #[test]
    fn directory_target_has_directory_kind() {
        let fx = Fixture::new();
        let target = fx.path("d");
        fs::create_dir(&target).unwrap();
        let (ctx, _log, _) = test_context(ResolutionOptions::default(), []);
        let spec = ready(construct(&ctx, s(&target), s(&fx.path("l"))).unwrap());
        assert_eq!(spec.kind, LinkKind::Directory);
    }

    #[test]
    fn missing_target_is_invalid() {
        let fx = Fixture::new();
        let (ctx, _log, _) = test_context(ResolutionOptions::default(), []);
        let err = construct(&ctx, s(&fx.path("nope")), s(&fx.path("l"))).unwrap_err();
        assert!(matches!(err, LinkError::InvalidTarget(p) if p == fx.path("nope")));
    }

    #[cfg(unix)]
    #[test]
    fn dangling_symlink_target_is_invalid() {
        let fx = Fixture::new();
        let target = fx.path("broken");
        std::os::unix::fs::symlink(fx.path("nowhere"), &target).unwrap();
        let (ctx, _log, _) = test_context(ResolutionOptions::default(), []);

        let err = construct(&ctx, s(&target), s(&fx.path("l"))).unwrap_err();

        assert!(matches!(err, LinkError::InvalidTarget(p) if p == target));
        assert!(fs::symlink_metadata(fx.path("l")).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn symlink_target_to_a_file_is_ready() {
        let fx = Fixture::new();
        let real = fx.file("real", "x");
        let target = fx.path("alias");
        std::os::unix::fs::symlink(&real, &target).unwrap();
        let (ctx, _log, _) = test_context(ResolutionOptions::default(), []);

        let spec = ready(construct(&ctx, s(&target), s(&fx.path("l"))).unwrap());

        assert_eq!(spec.target, target);
        assert_eq!(spec.kind, LinkKind::File);
    }

    #[test]
    fn directory_at_mount_fails_for_every_policy() {
        let fx = Fixture::new();
        let target = fx.file("t", "x");
        let mount = fx.path("occupied");
        fs::create_dir(&mount).unwrap();
        let policies = [Policy::Ask, Policy::Always, Policy::Never];
        for overwrite in policies {
            for backup in policies {
                for dry_run in [false, true] {
                    let options = ResolutionOptions {
                        dry_run,
                        ..with_policies(overwrite, backup)
                    };
                    let (ctx, _log, decisions) = test_context(options, [true, true]);
                    let err = construct(&ctx, s(&target), s(&mount)).unwrap_err();
                    assert!(matches!(err, LinkError::ExistingDirectory(_)));
                    assert!(decisions.asked().is_empty());
                }
            }
        }
        assert!(mount.is_dir());
    }

    #[cfg(unix)]
    #[test]
    fn overwrite_always_is_idempotent() {
        let fx = Fixture::new();
        let target = fx.file("t.txt", "x");
        let mount = fx.path("l.txt");
        let (ctx, _log, _) = test_context(with_policies(Policy::Always, Policy::Never), []);

        for _ in 0..2 {
            let spec = ready(construct(&ctx, s(&target), s(&mount)).unwrap());
            apply(&ctx, spec).unwrap();
        }

        assert_eq!(fs::read_link(&mount).unwrap(), target);
        let entries = fs::read_dir(fx.dir.path()).unwrap().count();
        assert_eq!(entries, 2, "only the target and one link");
    }

    #[cfg(unix)]
    #[test]
    fn asks_before_overwriting_and_mentions_same_target() {
        let fx = Fixture::new();
        let target = fx.file("t", "x");
        let mount = fx.path("l");
        std::os::unix::fs::symlink(&target, &mount).unwrap();
        let (ctx, _log, decisions) = test_context(ResolutionOptions::default(), [true]);

        ready(construct(&ctx, s(&target), s(&mount)).unwrap());

        let asked = decisions.asked();
        assert_eq!(asked.len(), 1);
        assert!(asked[0].contains("already points to"), "{}", asked[0]);
        assert!(fs::symlink_metadata(&mount).is_err(), "old link removed");
    }

    #[cfg(unix)]
    #[test]
    fn prompt_names_other_target() {
        let fx = Fixture::new();
        let target = fx.file("t", "x");
        let other = fx.file("other", "y");
        let mount = fx.path("l");
        std::os::unix::fs::symlink("other", &mount).unwrap();
        let (ctx, _log, decisions) = test_context(ResolutionOptions::default(), [false]);

        let outcome = construct(&ctx, s(&target), s(&mount)).unwrap();

        assert_eq!(outcome, Construction::Skipped(Skip::DeclinedOverwrite));
        let asked = decisions.asked();
        assert!(asked[0].contains("another target"), "{}", asked[0]);
        assert!(asked[0].contains(s(&other)), "{}", asked[0]);
        assert_eq!(fs::read_link(&mount).unwrap(), PathBuf::from("other"));
    }

    #[cfg(unix)]
    #[test]
    fn overwrite_never_skips_without_asking() {
        let fx = Fixture::new();
        let target = fx.file("t", "x");
        let mount = fx.path("l");
        std::os::unix::fs::symlink(&target, &mount).unwrap();

        let mut decisions = MockDecisionProvider::new();
        decisions.expect_confirm().never();
        let (ctx, _log, _) = test_context(with_policies(Policy::Never, Policy::Ask), []);
        let ctx = ctx.with_decisions(Arc::new(decisions) as Arc<dyn DecisionProvider>);

        let outcome = construct(&ctx, s(&target), s(&mount)).unwrap();
        assert_eq!(outcome, Construction::Skipped(Skip::DeclinedOverwrite));
    }

    #[test]
    fn file_at_mount_is_backed_up_then_removed() {
        let fx = Fixture::new();
        let target = fx.file("t", "new");
        let mount = fx.file("existing.conf", "old");
        let backups = fx.path("backups");
        let options = ResolutionOptions {
            backup_dir: Some(backups.clone()),
            ..ResolutionOptions::default()
        };
        let (ctx, log, decisions) = test_context(options, [true]);

        let spec = ready(construct(&ctx, s(&target), s(&mount)).unwrap());

        assert_eq!(spec.mount, mount);
        assert!(!mount.exists(), "original removed after backup");
        assert!(decisions.asked()[0].contains("Back it up"));
        let copies: Vec<_> = fs::read_dir(&backups).unwrap().map(Result::unwrap).collect();
        assert_eq!(copies.len(), 1);
        let name = copies[0].file_name().to_string_lossy().into_owned();
        assert!(name.starts_with("existing_backup_"), "{name}");
        assert!(name.ends_with(".conf"), "{name}");
        assert_eq!(fs::read_to_string(copies[0].path()).unwrap(), "old");
        assert!(log.contains(Level::Info, "backed up"));
    }

    #[test]
    fn failed_backup_leaves_original() {
        let fx = Fixture::new();
        let target = fx.file("t", "new");
        let mount = fx.file("keep.txt", "old");
        // a file where the backup directory should be makes the copy fail
        let blocker = fx.file("blocker", "");
        let options = ResolutionOptions {
            backup: Policy::Always,
            backup_dir: Some(blocker),
            ..ResolutionOptions::default()
        };
        let (ctx, _log, _) = test_context(options, []);

        let err = construct(&ctx, s(&target), s(&mount)).unwrap_err();

        assert!(matches!(err, LinkError::Backup { .. }), "{err}");
        assert_eq!(fs::read_to_string(&mount).unwrap(), "old");
    }

    #[test]
    fn declined_backup_keeps_file() {
        let fx = Fixture::new();
        let target = fx.file("t", "new");
        let mount = fx.file("keep.txt", "old");
        let (ctx, log, _) = test_context(ResolutionOptions::default(), [false]);

        let outcome = construct(&ctx, s(&target), s(&mount)).unwrap();

        assert_eq!(outcome, Construction::Skipped(Skip::DeclinedBackup));
        assert_eq!(fs::read_to_string(&mount).unwrap(), "old");
        assert!(log.contains(Level::Warn, "no action taken"));
    }

    #[test]
    fn dry_run_reports_conflict_without_touching_anything() {
        let fx = Fixture::new();
        let target = fx.file("t", "new");
        let mount = fx.file("keep.txt", "old");
        let options = ResolutionOptions {
            dry_run: true,
            backup: Policy::Always,
            ..ResolutionOptions::default()
        };
        let (ctx, log, decisions) = test_context(options, [true]);

        let outcome = construct(&ctx, s(&target), s(&mount)).unwrap();

        assert_eq!(outcome, Construction::Skipped(Skip::DryRunConflict));
        assert!(log.contains(Level::DryRun, "would back up file"));
        assert!(decisions.asked().is_empty());
        assert_eq!(fs::read_to_string(&mount).unwrap(), "old");
    }

    #[test]
    fn probe_failure_surfaces_as_io_error() {
        let mut fs_ops = MockFileSystemOps::new();
        fs_ops
            .expect_probe()
            .returning(|_| Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied")));
        let (ctx, _log, _) = test_context(ResolutionOptions::default(), []);
        let ctx = ctx.with_fs_ops(Arc::new(fs_ops) as Arc<dyn FileSystemOps>);

        let err = construct(&ctx, "/a", "/b").unwrap_err();
        assert!(matches!(err, LinkError::Io { action: "inspect", .. }), "{err}");
    }

    #[test]
    fn mocked_symlink_at_mount_in_dry_run() {
        let mut fs_ops = MockFileSystemOps::new();
        fs_ops.expect_probe().returning(|path| {
            Ok(if path.ends_with("mount") {
                PathInfo {
                    exists: true,
                    is_symlink: true,
                    symlink_target: Some(PathBuf::from("/elsewhere")),
                    ..PathInfo::default()
                }
            } else {
                PathInfo {
                    exists: true,
                    ..PathInfo::default()
                }
            })
        });
        let options = ResolutionOptions {
            dry_run: true,
            overwrite: Policy::Always,
            ..ResolutionOptions::default()
        };
        let (ctx, log, _) = test_context(options, []);
        let ctx = ctx.with_fs_ops(Arc::new(fs_ops) as Arc<dyn FileSystemOps>);

        let outcome = construct(&ctx, "/srv/target", "/srv/mount").unwrap();

        assert_eq!(outcome, Construction::Skipped(Skip::DryRunConflict));
        assert!(log.contains(Level::DryRun, "would overwrite symlink"));
    }

    #[test]
    fn relative_mode_keeps_paths_relative() {
        let mut fs_ops = MockFileSystemOps::new();
        fs_ops.expect_probe().returning(|path| {
            Ok(PathInfo {
                exists: path == Path::new("dots/vimrc"),
                ..PathInfo::default()
            })
        });
        let options = ResolutionOptions {
            use_relative: true,
            ..ResolutionOptions::default()
        };
        let (ctx, _log, _) = test_context(options, []);
        let ctx = ctx.with_fs_ops(Arc::new(fs_ops) as Arc<dyn FileSystemOps>);

        let spec = ready(construct(&ctx, "./dots//vimrc", "home/../.vimrc").unwrap());
        assert_eq!(spec.target, PathBuf::from("dots/vimrc"));
        assert_eq!(spec.mount, PathBuf::from(".vimrc"));
    }

    #[test]
    fn planned_wording_follows_policy() {
        assert_eq!(planned("back up file", Policy::Always), "would back up file");
        assert_eq!(planned("back up file", Policy::Never), "would not back up file");
        assert_eq!(
            planned("overwrite symlink", Policy::Ask),
            "would ask to overwrite symlink"
        );
    }
}
