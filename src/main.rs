//! # omssa-inspect
//!
//! A command-line tool for inspecting OMSSA search results.
//!
//! ## Usage
//!
//! ```bash
//! # Counts, optionally with the modification tables
//! omssa-inspect summary run.omx --mods mods.xml --usermods usermods.xml
//!
//! # Peptides matched to a protein
//! omssa-inspect protein run.omx "sp|P02769|ALBU_BOVIN"
//!
//! # Peptides and hits of spectrum 12
//! omssa-inspect spectrum run.omx 12
//! ```

use anyhow::Result;
use clap::Parser;

mod cli;

fn main() -> Result<()> {
    let cli = cli::Cli::parse();

    // Initialize logging based on verbosity
    cli::init_logging(cli.verbosity());

    cli::dispatch(cli)
}
