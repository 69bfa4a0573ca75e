//! `overlaps` CLI: rank shared busy time across ICS calendars from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # Rank every overlap between three calendars
//! overlaps rank alice.ics bob.ics carol.ics
//!
//! # Show times in Paris and also write a CSV export
//! overlaps rank --tz Europe/Paris --csv ranking.csv alice.ics bob.ics carol.ics
//!
//! # Keep each distinct interval once per participant group, emit JSON
//! overlaps rank --policy distinct --format json *.ics
//!
//! # Find time when nobody is busy
//! overlaps free --from 2025-05-02T08:00:00Z --to 2025-05-02T18:00:00Z --min-minutes 30 *.ics
//! ```

mod cli;
mod config;
mod free_cmd;
mod logging;
mod rank_cmd;

use std::process;

use anyhow::Result;
use clap::Parser;

use crate::cli::{Cli, Command};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = config::load(cli.config.as_deref())?;
    match cli.command {
        Command::Rank(args) => rank_cmd::run(args, &config),
        Command::Free(args) => free_cmd::run(args, &config),
    }
}
