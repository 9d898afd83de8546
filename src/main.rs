use anyhow::Result;
use clap::Parser;

use homeenv_cli::{cli, commands, logging};

fn main() -> Result<()> {
    let _ = enable_ansi_support::enable_ansi_support();
    let args = cli::Cli::parse();
    logging::init(args.verbose);
    let log = logging::Logger::new();

    match args.command {
        cli::Command::Install(opts) => commands::install::run(&args.global, &opts, &log),
        cli::Command::Profile => commands::profile::run(&args.global, &log),
        cli::Command::List => commands::list::run(&args.global, &log),
        cli::Command::Edit(opts) => commands::edit::run(&args.global, &opts, &log),
        cli::Command::Version => {
            let version = option_env!("HOMEENV_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"));
            println!("homeenv {version}");
            Ok(())
        }
    }
}
