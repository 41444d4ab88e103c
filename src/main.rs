use clap::Parser;
use flattener::commands;
use flattener::config::{Cli, Command, ProfileStore};
use std::process::ExitCode;

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    if let Err(e) = flattener::logging::init(cli.verbose) {
        eprintln!("warning: logging disabled: {}", e);
    }

    match &cli.command {
        Command::Run(args) => {
            // Plain runs never touch the profile directory
            let store = if args.needs_profile_store() {
                Some(cli.profile_store()?)
            } else {
                None
            };
            let result = commands::run::run(args, store.as_ref().map(|s| s as &dyn ProfileStore))?;
            if result.has_errors() {
                return Ok(ExitCode::from(2));
            }
        }
        Command::Profile { action } => commands::profile::run(action, &cli.profile_store()?)?,
    }

    Ok(ExitCode::SUCCESS)
}
