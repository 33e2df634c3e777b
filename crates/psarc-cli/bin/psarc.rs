//! PSARC command-line entry point.
//!
//! Thin wrapper around the psarc-cli library that parses arguments,
//! initializes logging, validates configuration and runs the command.

use anyhow::Result;
use psarc_cli::{CliConfig, run};

fn main() -> Result<()> {
    let config = CliConfig::from_args();

    // RUST_LOG overrides --log-level; stdout carries command output only
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::new(config.log_level.as_filter())
            }),
        )
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(command = ?config.command, "configuration loaded");

    config.validate()?;
    run(&config.command, &mut std::io::stdout().lock())?;

    Ok(())
}
