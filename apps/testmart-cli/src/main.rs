//! # TestMart CLI
//!
//! Drives shopping carts from JSON command scripts.
//!
//! Commands:
//! - `testmart run <FILE>` - Execute a command script, printing each purchase
//! - `testmart services` - List shipping services with their flat rates
//!
//! Receipts and JSON go to stdout; logs go to stderr (`RUST_LOG` to tune).

mod commands;
mod config;
mod error;
mod runner;
mod script;
mod store;

use std::io;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::commands::{RunArgs, ServicesArgs};
use crate::config::{CliConfig, OutputFormat};
use crate::error::AppError;

/// TestMart checkout - price shopping carts from the command line
#[derive(Parser)]
#[command(name = "testmart")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Execute a cart command script
    Run(RunArgs),

    /// List shipping services and their flat rates
    Services(ServicesArgs),
}

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();
    let mut config = CliConfig::load().context("failed to load configuration")?;

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let result = match &cli.command {
        Commands::Run(args) => {
            args.apply_to(&mut config);
            commands::run(args, &config, &mut out)
        }
        Commands::Services(args) => {
            args.apply_to(&mut config);
            commands::services(&config, &mut out)
        }
    };

    if let Err(err) = result {
        report(&err, config.output);
        std::process::exit(1);
    }

    Ok(())
}

/// Writes a failure to stderr in the configured output format.
fn report(err: &AppError, format: OutputFormat) {
    match format {
        OutputFormat::Json => match serde_json::to_string(err) {
            Ok(json) => eprintln!("{}", json),
            Err(_) => eprintln!("{}", err),
        },
        OutputFormat::Text => eprintln!("error: {}", err.message),
    }
}

/// Initializes the tracing subscriber on stderr.
///
/// `RUST_LOG` wins; otherwise `info,testmart=debug`.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,testmart=debug"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}
