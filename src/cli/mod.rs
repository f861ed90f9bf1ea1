use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use omssa::index::{AlignmentPolicy, IndexConfig};

mod config;
mod protein;
mod spectrum;
mod summary;

pub use config::Config;

/// omssa-inspect - Inspect OMSSA search results (.omx)
#[derive(Parser)]
#[command(name = "omssa-inspect")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Skip hit sets that do not align with a request spectrum instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print counts for a result file
    Summary {
        /// Input .omx file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Base modification file (mods.xml)
        #[arg(long, value_name = "FILE")]
        mods: Option<PathBuf>,

        /// User modification file (usermods.xml)
        #[arg(long, value_name = "FILE")]
        usermods: Option<PathBuf>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Print the peptides matched to one protein
    Protein {
        /// Input .omx file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Protein accession
        #[arg(value_name = "ACCESSION")]
        accession: String,
    },

    /// Print the peptides and hits of the spectra with a given key
    Spectrum {
        /// Input .omx file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Spectrum key within its request
        #[arg(value_name = "NUMBER")]
        number: usize,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    let index_config = index_config(&config, cli.lenient);

    match cli.command {
        Commands::Summary {
            file,
            mods,
            usermods,
            json,
        } => summary::run(
            file,
            mods.or(config.modifications.base),
            usermods.or(config.modifications.user),
            index_config,
            json,
        ),
        Commands::Protein { file, accession } => protein::run(file, &accession, index_config),
        Commands::Spectrum { file, number } => spectrum::run(file, number, index_config),
    }
}

/// The `--lenient` flag overrides the config file's alignment policy
fn index_config(config: &Config, lenient: bool) -> IndexConfig {
    if lenient {
        IndexConfig {
            alignment: AlignmentPolicy::Lenient,
        }
    } else {
        config.index
    }
}
