//! Veil CLI - hide an image inside a passphrase-locked package
//!
//! This is the command-line interface for Veil. It provides a user-friendly
//! interface to the core library functionality.

mod app;
mod cli;
mod commands;
mod config;
mod constants;
mod errors;
mod helpers;
mod ui;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use veil_core::VeilError;

use crate::app::AppContext;
use crate::cli::{Cli, Commands};
use crate::constants::LOG_ENV;
use crate::errors::CliError;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match run(&cli) {
        Ok(()) => Ok(()),
        Err(err) => {
            if let Some(cli_err) = err.downcast_ref::<CliError>() {
                cli_err.exit();
            }
            if let Some(cli_err) = err.downcast_ref::<VeilError>().and_then(CliError::from_core) {
                cli_err.exit();
            }
            Err(err)
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let app = AppContext::new(cli);

    match &cli.command {
        Commands::Create(args) => commands::handle_create(&app, args),
        Commands::Reveal(args) => commands::handle_reveal(&app, args),
        Commands::Verify(args) => commands::handle_verify(&app, args),
        Commands::Inspect(args) => commands::handle_inspect(&app, args),
        Commands::Salt(args) => commands::handle_salt(&app, args),
        Commands::Init(args) => commands::handle_init(&app, args),
        Commands::Completions { shell } => commands::handle_completions(*shell),
    }
}

/// Log to stderr. `VEIL_LOG` takes any `EnvFilter` directive and wins over
/// `-v`/`-q`.
fn init_tracing(verbose: u8, quiet: bool) {
    let default_level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
