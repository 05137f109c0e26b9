//! civic-forms
//!
//! Command-line checks for Civic Ledger form schemas.
//!
//! ## Usage
//!
//! ```bash
//! civic-forms check assets/forms/
//! civic-forms validate --schema receipt.toml --values receipt.json
//! civic-forms info assets/forms/journal_entry.toml
//! ```

use civic_cli::commands::{CheckArgs, InfoArgs, ValidateArgs, check, info, validate};
use civic_cli::{load_config, output};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "civic-forms")]
#[command(about = "Check and validate Civic Ledger form schemas", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Engine configuration file (TOML)
    #[arg(long, global = true, value_name = "FILE", env = "CIVIC_LEDGER_CONFIG")]
    config: Option<PathBuf>,

    /// Verbosity level (can be repeated)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Check schema files or directories of them
    Check(CheckArgs),

    /// Validate a values file against a schema
    Validate(ValidateArgs),

    /// Show the fields and rules of a schema
    Info(InfoArgs),
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check(args) => check::execute(args),
        Commands::Validate(args) => {
            load_config(cli.config.as_deref()).and_then(|config| validate::execute(args, &config))
        }
        Commands::Info(args) => info::execute(args),
    };

    if let Err(e) = result {
        output::error(&format!("{:#}", e));
        process::exit(1);
    }
}
