use std::sync::Arc;

use anyhow::Result;
use clap::Parser;

use trovl::cli::{Cli, Command, GlobalOpts};
use trovl::commands;
use trovl::logging::{self, Logger};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = Cli::parse();
    let mut global = args.global;
    let name = args.command.name();

    match args.command {
        Command::Add(opts) => commands::add::run(&global, &opts, &init(&global, name)),
        Command::Remove(opts) => commands::remove::run(&global, &opts, &init(&global, name)),
        Command::Apply(opts) => commands::apply::run(&global, &opts, &init(&global, name)),
        Command::Plan(opts) => {
            global.dry_run = true;
            commands::apply::run(&global, &opts, &init(&global, name))
        }
        Command::Generate(opts) => {
            commands::generate::run(&global, &opts, &init(&global, name))
        }
        Command::Completions(opts) => commands::completions::run(&opts),
        Command::Version => commands::version::run(),
    }
}

/// Install the subscriber and create the logger for `command`.
fn init(global: &GlobalOpts, command: &str) -> Arc<Logger> {
    logging::init_subscriber(global.verbosity(), command);
    Arc::new(Logger::new(command))
}
