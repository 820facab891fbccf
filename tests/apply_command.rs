#![allow(
    clippy::expect_used,
    clippy::unwrap_used,
    clippy::wildcard_imports,
    clippy::indexing_slicing
)]
//! Integration tests for the `apply`, `plan` and `generate` commands.
//!
//! These tests write manifests into temporary directories and apply them,
//! verifying that:
//! - applicable entries are linked and others skipped
//! - platform overrides steer where the link goes
//! - a plan (dry run) leaves the filesystem untouched
//! - relative entries resolve against the working directory
//! - a generated manifest loads back with every platform targeted

mod common;

use std::fs;

use trovl::cli::{ApplyOpts, GenerateOpts};
use trovl::commands;
use trovl::config::{Policy, ResolutionOptions};
use trovl::manifest::{Manifest, Platforms};
use trovl::platform::{Os, Platform};

/// Write a manifest with `links` into the sandbox and return its path argument.
fn write_manifest(sandbox: &common::Sandbox, links: &serde_json::Value) -> String {
    let doc = serde_json::json!({ "links": links });
    fs::write(sandbox.path("manifest.json"), doc.to_string()).unwrap();
    sandbox.arg("manifest.json")
}

fn apply_opts(manifest: String) -> ApplyOpts {
    ApplyOpts {
        manifests: vec![manifest],
    }
}

/// Entries for the running platform are linked; others are not applicable.
#[cfg(unix)]
#[test]
fn applies_entries_for_the_running_platform() {
    let sandbox = common::SandboxBuilder::new()
        .with_file("dots/a", "a")
        .with_file("dots/b", "b")
        .build();
    let manifest = write_manifest(
        &sandbox,
        &serde_json::json!([
            {"target": sandbox.arg("dots/a"), "link": sandbox.arg("home/a")},
            {"target": sandbox.arg("dots/b"), "link": sandbox.arg("home/b"), "platforms": ["windows"]},
        ]),
    );
    let ctx = sandbox.ctx.with_platform(Platform::new(Os::Linux));

    let reports = commands::apply::execute(&ctx, &apply_opts(manifest)).unwrap();

    assert_eq!(reports[0].linked, 1);
    assert_eq!(reports[0].not_applicable, 1);
    assert_eq!(fs::read_link(sandbox.path("home/a")).unwrap(), sandbox.path("dots/a"));
    assert!(!sandbox.path("home/b").exists());
}

/// The override for the routed platform wins over the default link.
#[cfg(unix)]
#[test]
fn override_routes_the_link() {
    let sandbox = common::SandboxBuilder::new().with_file("dots/vimrc", "x").build();
    let manifest = write_manifest(
        &sandbox,
        &serde_json::json!([{
            "target": sandbox.arg("dots/vimrc"),
            "link": sandbox.arg(".vimrc"),
            "platform_overrides": {"windows": {"link": sandbox.arg("_vimrc")}},
        }]),
    );

    let windows = sandbox.ctx.with_platform(Platform::new(Os::Windows));
    commands::apply::execute(&windows, &apply_opts(manifest.clone())).unwrap();
    assert!(fs::symlink_metadata(sandbox.path("_vimrc")).is_ok());
    assert!(fs::symlink_metadata(sandbox.path(".vimrc")).is_err());

    let linux = sandbox.ctx.with_platform(Platform::new(Os::Linux));
    commands::apply::execute(&linux, &apply_opts(manifest)).unwrap();
    assert!(fs::symlink_metadata(sandbox.path(".vimrc")).is_ok());
}

/// Backing up an existing file lets the batch continue to later entries.
#[cfg(unix)]
#[test]
fn backup_then_link_in_a_batch() {
    let sandbox = common::SandboxBuilder::new()
        .with_file("dots/gitconfig", "new")
        .with_file("home/.gitconfig", "old")
        .with_options(ResolutionOptions {
            backup: Policy::Always,
            ..ResolutionOptions::default()
        })
        .build();
    let manifest = write_manifest(
        &sandbox,
        &serde_json::json!([
            {"target": sandbox.arg("dots/gitconfig"), "link": sandbox.arg("home/.gitconfig")},
            {"target": sandbox.arg("dots/gitconfig"), "link": sandbox.arg("home/second")},
        ]),
    );

    let reports = commands::apply::execute(&sandbox.ctx, &apply_opts(manifest)).unwrap();

    assert_eq!(reports[0].linked, 2);
    assert_eq!(fs::read_to_string(sandbox.path("home/.gitconfig")).unwrap(), "new");
    let backups = sandbox.backups();
    assert_eq!(backups.len(), 1);
    assert!(backups[0].starts_with(".gitconfig_backup_"), "{backups:?}");
}

/// Planning a manifest full of conflicts changes nothing.
#[cfg(unix)]
#[test]
fn plan_never_mutates() {
    let sandbox = common::SandboxBuilder::new()
        .with_file("dots/t", "x")
        .with_file("home/file", "keep")
        .with_symlink("home-link", "elsewhere")
        .with_options(ResolutionOptions {
            dry_run: true,
            overwrite: Policy::Always,
            backup: Policy::Always,
            ..ResolutionOptions::default()
        })
        .build();
    let manifest = write_manifest(
        &sandbox,
        &serde_json::json!([
            {"target": sandbox.arg("dots/t"), "link": sandbox.arg("home/file")},
            {"target": sandbox.arg("dots/t"), "link": sandbox.arg("home-link")},
            {"target": sandbox.arg("dots/t"), "link": sandbox.arg("fresh/link")},
        ]),
    );
    let before = sandbox.snapshot();

    let reports = commands::apply::execute(&sandbox.ctx, &apply_opts(manifest)).unwrap();

    assert_eq!(reports[0].dry_run, 3);
    assert_eq!(sandbox.snapshot(), before);
    assert!(sandbox.decisions.asked().is_empty());
}

/// Relative manifest paths resolve against the working directory.
#[cfg(unix)]
#[test]
fn relative_entries_resolve_against_the_working_directory() {
    let sandbox = common::SandboxBuilder::new()
        .with_file("a.txt", "hello")
        .with_file("manifest.json", r#"{"links":[{"target":"a.txt","link":"b.txt"}]}"#)
        .build();
    let _cwd = common::CwdGuard::enter(sandbox.root.path());
    let cwd = std::env::current_dir().unwrap();

    let reports =
        commands::apply::execute(&sandbox.ctx, &apply_opts("manifest.json".to_string())).unwrap();

    assert_eq!(reports[0].linked, 1);
    assert_eq!(fs::read_link(cwd.join("b.txt")).unwrap(), cwd.join("a.txt"));
    assert_eq!(fs::read_to_string(cwd.join("b.txt")).unwrap(), "hello");
}

/// A failing entry stops the batch and names its index.
#[test]
fn failing_entry_aborts_with_index() {
    let sandbox = common::SandboxBuilder::new().with_file("t", "x").build();
    let manifest = write_manifest(
        &sandbox,
        &serde_json::json!([
            {"target": sandbox.arg("missing"), "link": sandbox.arg("l")},
        ]),
    );

    let err = commands::apply::execute(&sandbox.ctx, &apply_opts(manifest)).unwrap_err();

    assert!(format!("{err:#}").contains("links[0]: invalid target path"), "{err:#}");
}

/// `generate` output is a valid manifest targeting every platform.
#[test]
fn generated_manifest_round_trips() {
    let sandbox = common::SandboxBuilder::new().build();
    let opts = GenerateOpts {
        paths: vec![sandbox.arg("config/trovl/manifest.json")],
    };

    commands::generate::execute(&sandbox.ctx, &opts).unwrap();

    let text = fs::read_to_string(sandbox.path("config/trovl/manifest.json")).unwrap();
    assert!(text.contains("\"$schema\""));
    let manifest = Manifest::load(&sandbox.path("config/trovl/manifest.json")).unwrap();
    assert_eq!(manifest.entries.len(), 1);
    assert_eq!(manifest.entries[0].platforms, Platforms::All);
    assert_eq!(manifest.entries[0].link_for(Os::Linux), Some("example_override"));
    assert_eq!(manifest.entries[0].link_for(Os::Darwin), Some("example_symlink"));
}
