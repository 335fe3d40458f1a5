//! Live chain inspection.
//!
//! Loads a preset into a fresh pedalboard and reports what a host would see:
//! the flattened parameter list with current values and the total latency.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::{Args, Subcommand};

use super::common::Context;
use super::presets::build_chain;
use crate::chain_spec::parse_chain;

#[derive(Args)]
pub struct ChainArgs {
    #[command(subcommand)]
    command: ChainCommand,
}

#[derive(Subcommand)]
enum ChainCommand {
    /// List the flattened host parameters of a stored preset
    Params {
        /// Bank name
        bank: String,
        /// Preset name
        preset: String,
    },

    /// List the flattened host parameters of a chain specification
    Inspect {
        /// Chain specification (e.g., "delay:time=120|reverb")
        chain: String,
    },
}

pub async fn run(ctx: &Context, args: ChainArgs) -> anyhow::Result<()> {
    let session = ctx.session()?;
    match args.command {
        ChainCommand::Params { bank, preset } => {
            let report = session.load(&bank, &preset).await?;
            for failure in &report.failures {
                println!(
                    "warning: unit {} ('{}') not restored: {}",
                    failure.index + 1,
                    failure.unit_type,
                    failure.error
                );
            }
        }
        ChainCommand::Inspect { chain } => {
            build_chain(session.board(), &parse_chain(&chain)?).await?;
        }
    }
    print_params(ctx, &session).await
}

async fn print_params(ctx: &Context, session: &pedalboard_chain::Session) -> anyhow::Result<()> {
    let board = session.board();
    let params = board.parameter_info(None).await;

    println!("  {:40}  {:10}  {}", "Flat Id", "Value", "Range");
    println!("  {:40}  {:10}  {}", "-------", "-----", "-----");
    for param in &params {
        let values = board.parameter_values(&param.flat_id).await?;
        let value = values
            .get(&param.flat_id)
            .map_or_else(|| "-".to_string(), |v| format!("{v:.3}"));
        println!(
            "  {:40}  {:10}  {} .. {}",
            param.flat_id, value, param.min, param.max
        );
    }

    let latency = board.latency_samples().await;
    println!();
    println!(
        "{} parameter(s), latency {} samples ({:.2} ms)",
        params.len(),
        latency,
        ctx.config.chain.latency_ms(latency)
    );
    Ok(())
}
