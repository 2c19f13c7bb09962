//! Deepfield CLI - inspect body catalogs and play scripted games.

// Allow print in the CLI binary
#![allow(clippy::print_stdout, clippy::print_stderr)]

mod cli;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{fmt, EnvFilter};

/// Deepfield - a hidden-grid strategy rules engine
#[derive(Parser, Debug)]
#[command(name = "deepfield")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Log engine decisions at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Print a body catalog
    Catalog {
        /// Catalog JSON file (default: the stock catalog)
        #[arg(long)]
        file: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Play a scripted scenario and report the outcome
    Play {
        /// Scenario JSON file
        #[arg(required = true)]
        scenario: PathBuf,

        /// Game config TOML file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Catalog JSON file (default: the stock catalog)
        #[arg(long)]
        catalog: Option<PathBuf>,

        /// Output format: text or json
        #[arg(short, long, default_value = "text")]
        format: cli::OutputFormat,
    },

    /// Validate a catalog JSON file
    Validate {
        /// Catalog JSON file to validate
        #[arg(required = true)]
        catalog: PathBuf,
    },
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if verbose { "deepfield=debug" } else { "deepfield=info" })
    });
    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let result = match args.command {
        Commands::Catalog { file, format } => cli::catalog::execute(file, format),

        Commands::Play {
            scenario,
            config,
            catalog,
            format,
        } => cli::play::execute(&scenario, config, catalog, format),

        Commands::Validate { catalog } => cli::validate::execute(&catalog),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
