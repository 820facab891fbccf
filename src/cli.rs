use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{Policy, ResolutionOptions};
use crate::logging::Verbosity;

/// Top-level CLI entry point for trovl.
#[derive(Parser, Debug)]
#[command(
    name = "trovl",
    about = "Cross-platform symlink manager driven by a declarative manifest",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[command(flatten)]
    pub global: GlobalOpts,
}

/// Options shared across all subcommands.
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Show informational output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Show debug output
    #[arg(long, global = true)]
    pub debug: bool,

    /// Preview changes without touching the filesystem
    #[arg(short = 'd', long, global = true)]
    pub dry_run: bool,

    /// Keep paths relative instead of resolving them against the working directory
    #[arg(short = 'r', long, global = true)]
    pub relative: bool,

    /// Overwrite existing symlinks without asking
    #[arg(long, global = true, conflicts_with = "overwrite_no")]
    pub overwrite_yes: bool,

    /// Never overwrite existing symlinks
    #[arg(long, global = true)]
    pub overwrite_no: bool,

    /// Back up and replace existing files without asking
    #[arg(long, global = true, conflicts_with = "backup_no")]
    pub backup_yes: bool,

    /// Never replace existing files
    #[arg(long, global = true)]
    pub backup_no: bool,

    /// Directory for backups (default: $XDG_CACHE_HOME/trovl/backups)
    #[arg(long, global = true, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,
}

impl GlobalOpts {
    /// Conflict-resolution options for the engine.
    #[must_use]
    pub fn resolution_options(&self) -> ResolutionOptions {
        ResolutionOptions {
            use_relative: self.relative,
            overwrite: Policy::from_flags(self.overwrite_yes, self.overwrite_no),
            backup: Policy::from_flags(self.backup_yes, self.backup_no),
            backup_dir: self.backup_dir.clone(),
            dry_run: self.dry_run,
        }
    }

    /// Console verbosity for these flags.
    #[must_use]
    pub const fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.verbose, self.debug, self.dry_run)
    }
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create a single symlink at LINK pointing to TARGET
    #[command(visible_alias = "link")]
    Add(AddOpts),
    /// Remove symlinks, leaving their targets alone
    #[command(visible_alias = "rm")]
    Remove(RemoveOpts),
    /// Create every link listed in one or more manifests
    Apply(ApplyOpts),
    /// Show what `apply` would do without changing anything
    Plan(ApplyOpts),
    /// Write an example manifest
    #[command(visible_alias = "gen")]
    Generate(GenerateOpts),
    /// Print a shell completion script
    Completions(CompletionsOpts),
    /// Print version information
    Version,
}

impl Command {
    /// Subcommand name, used for the log file.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Add(_) => "add",
            Self::Remove(_) => "remove",
            Self::Apply(_) => "apply",
            Self::Plan(_) => "plan",
            Self::Generate(_) => "generate",
            Self::Completions(_) => "completions",
            Self::Version => "version",
        }
    }
}

/// Options for the `add` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct AddOpts {
    /// Existing file or directory the link points to
    pub target: String,
    /// Where to place the symlink
    pub link: String,
}

/// Options for the `remove` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct RemoveOpts {
    /// Symlinks to remove
    #[arg(required = true)]
    pub links: Vec<String>,
}

/// Options for the `apply` and `plan` subcommands.
#[derive(Parser, Debug, Clone)]
pub struct ApplyOpts {
    /// Manifest files (default: $XDG_CONFIG_HOME/trovl/manifest.json)
    pub manifests: Vec<String>,
}

/// Options for the `generate` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct GenerateOpts {
    /// Where to write the manifest (default: $XDG_CONFIG_HOME/trovl/manifest.json)
    pub paths: Vec<String>,
}

/// Options for the `completions` subcommand.
#[derive(Parser, Debug, Clone)]
pub struct CompletionsOpts {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
