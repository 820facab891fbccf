//! trovl: cross-platform symlink manager.
//!
//! Creates, removes and bulk-applies symbolic links, either one at a time or
//! from a declarative JSON manifest with per-platform targeting. Conflicts
//! with what already sits at a link path are settled by overwriting old
//! symlinks, backing up ordinary files, or asking.
//!
//! The public API is organised into layers:
//!
//! - **[`paths`]** and **[`operations`]**: resolve raw paths and probe the filesystem
//! - **[`links`]**: construct, create and remove single links
//! - **[`manifest`]**: load, validate, route and apply manifests
//! - **[`commands`]**: top-level subcommand orchestration
#![deny(clippy::or_fun_call)]
#![deny(clippy::bool_to_int_with_if)]

pub mod cli;
pub mod commands;
pub mod config;
pub mod context;
pub mod error;
pub mod exec;
pub mod links;
pub mod logging;
pub mod manifest;
pub mod operations;
pub mod paths;
pub mod platform;
