//! plugpack - packages a WordPress plugin folder into an update-ready ZIP.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod progress;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    logging::init(cli.verbose, cli.quiet);

    let formatter = output::create_formatter(cli.json, cli.verbose, cli.quiet);

    match &cli.command {
        cli::Commands::Build(args) => {
            commands::build::execute(args, &*formatter, cli.quiet || cli.json)
        }
        cli::Commands::Verify(args) => commands::verify::execute(args, &*formatter),
        cli::Commands::List(args) => commands::list::execute(args, &*formatter),
        cli::Commands::Completion { shell } => {
            commands::completion::execute(*shell);
            Ok(())
        }
    }
}
