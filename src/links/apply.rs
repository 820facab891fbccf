use std::fs;
use std::path::PathBuf;

use crate::context::Context;
use crate::error::LinkError;

use super::{LinkKind, LinkSpec, symlink};

/// Create the symlink described by `spec`, including missing parent
/// directories of the mount.
///
/// In a dry run only the intended link is logged.
///
/// # Errors
///
/// Returns [`LinkError::Io`] if a parent directory or the symlink cannot be
/// created.
pub fn apply(ctx: &Context, spec: LinkSpec) -> Result<(), LinkError> {
    if ctx.options.dry_run {
        ctx.log.dry_run(&format!("would link {spec}"));
        return Ok(());
    }

    if let Some(parent) = spec.mount.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .map_err(|e| LinkError::io("create parent directory", parent, e))?;
    }
    symlink::create(&spec.target, &spec.mount, spec.kind == LinkKind::Directory)
        .map_err(|e| LinkError::io("create symlink", &spec.mount, e))?;
    ctx.log.info(&format!("linked {spec}"));
    Ok(())
}

/// Remove the symlink at `path`, leaving its target alone.
///
/// The path is resolved in relative mode. Whether the link's target exists
/// does not matter. Returns the resolved path.
///
/// # Errors
///
/// Returns [`LinkError::NotFound`] if nothing is there,
/// [`LinkError::NotASymlink`] if something other than a symlink is there,
/// and [`LinkError::Io`] if the removal fails.
pub fn remove_by_path(ctx: &Context, path: &str) -> Result<PathBuf, LinkError> {
    let resolved = ctx
        .resolver
        .resolve(path, true)
        .map_err(|source| LinkError::InvalidPath {
            role: "link",
            raw: path.to_string(),
            source,
        })?;
    let info = ctx
        .fs_ops
        .probe(&resolved)
        .map_err(|e| LinkError::io("inspect", &resolved, e))?;
    if !info.exists {
        return Err(LinkError::NotFound(resolved));
    }
    if !info.is_symlink {
        return Err(LinkError::NotASymlink(resolved));
    }

    if ctx.options.dry_run {
        ctx.log
            .dry_run(&format!("would remove symlink {}", resolved.display()));
        return Ok(resolved);
    }
    symlink::remove(&resolved).map_err(|e| LinkError::io("remove symlink", &resolved, e))?;
    ctx.log
        .info(&format!("removed symlink {}", resolved.display()));
    Ok(resolved)
}
