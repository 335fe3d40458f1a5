//! Pedalboard CLI - command-line front end for the pedalboard chain host.

mod chain_spec;
mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pedalboard")]
#[command(author, version, about = "Pedalboard chain host CLI", long_about = None)]
struct Cli {
    /// Settings file (defaults to the platform config directory)
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Preset store directory, overriding the settings file
    #[arg(long, global = true, value_name = "DIR")]
    store: Option<PathBuf>,

    /// Store namespace, overriding the settings file
    #[arg(long, global = true)]
    namespace: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List available unit types and their parameters
    Units(commands::units::UnitsArgs),

    /// Manage preset banks
    Banks(commands::banks::BanksArgs),

    /// Manage presets
    Presets(commands::presets::PresetsArgs),

    /// Inspect a preset loaded into a live chain
    Chain(commands::chain::ChainArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = commands::common::Context::load(
        cli.config.as_deref(),
        cli.store,
        cli.namespace,
    )?;

    match cli.command {
        Commands::Units(args) => commands::units::run(&ctx, args),
        Commands::Banks(args) => commands::banks::run(&ctx, args),
        Commands::Presets(args) => commands::presets::run(&ctx, args).await,
        Commands::Chain(args) => commands::chain::run(&ctx, args).await,
    }
}
