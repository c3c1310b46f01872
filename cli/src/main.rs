#![deny(missing_docs)]

//! # Clientgen CLI
//!
//! Command Line Interface for the OpenAPI client generator.
//!
//! Supported Commands:
//! - `generate`: OpenAPI document -> client modules, models and configuration.
//! - `modules`: Lists the available extension modules.

use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::error::CliResult;

mod error;
mod generate;

#[derive(Parser, Debug)]
#[clap(author, version, about = "OpenAPI v3 HTTP client generator")]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG).
    #[clap(long, short = 'v', global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate a client from an OpenAPI document.
    Generate(generate::GenerateArgs),
    /// List the registered extension modules.
    Modules,
}

fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("clientgen={level}")));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter);

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: a tracing subscriber was already installed");
    }
}

fn run(cli: &Cli) -> CliResult<()> {
    match &cli.command {
        Commands::Generate(args) => generate::execute(args),
        Commands::Modules => {
            for id in clientgen_core::registered_ids() {
                println!("{}", id);
            }
            Ok(())
        }
    }
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(error) = run(&cli) {
        tracing::error!(%error, "clientgen failed");
        eprintln!("Error: {}", error);
        std::process::exit(1);
    }
}
