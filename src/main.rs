//! trainjob - Main Entry Point
//!
//! Runs one training job per invocation. Job results go to stdout, logs to
//! stderr.

use clap::Parser;
use trainjob::cli::{cmd_diabetes, cmd_inspect, cmd_iris, Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "trainjob=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.command {
        Commands::Iris => cmd_iris(&cli.global)?,
        Commands::Diabetes { data_folder } => cmd_diabetes(&cli.global, data_folder)?,
        Commands::Inspect { model } => cmd_inspect(model)?,
    }

    Ok(())
}
