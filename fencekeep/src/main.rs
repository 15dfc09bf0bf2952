// fencekeep/src/main.rs
//! fencekeep entry point.
//!
//! Parses the command line, sets up logging and dispatches to a subcommand.

use anyhow::Result;
use clap::Parser;
use std::process::ExitCode;

use fencekeep::cli::{Cli, Commands};
use fencekeep::{logger, run_blocks, run_check, run_sanitize};

fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    logger::init_logger(logger::level_from_flags(args.quiet, args.debug));

    match &args.command {
        Commands::Sanitize(cmd) => run_sanitize(cmd).map(|()| ExitCode::SUCCESS),
        Commands::Check(cmd) => run_check(cmd),
        Commands::Blocks(cmd) => run_blocks(cmd).map(|()| ExitCode::SUCCESS),
    }
}
