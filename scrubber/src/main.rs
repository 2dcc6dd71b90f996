// scrubber/src/main.rs
//! Scrubber entry point.
//!
//! Parses arguments, initializes logging and dispatches to the subcommand.

use anyhow::Result;
use clap::Parser;
use log::debug;

use scrubber::cli::{Cli, Commands};
use scrubber::logger;
use scrubber::{run_filters, run_sanitize};

fn main() -> Result<()> {
    let args = Cli::parse();

    logger::init_logger(logger::level_for_flags(args.quiet, args.debug));
    debug!("Parsed arguments: {:?}", args);

    match args.command {
        Commands::Sanitize(cmd) => run_sanitize(cmd.into()),
        Commands::Filters(cmd) => run_filters(&cmd),
    }
}
