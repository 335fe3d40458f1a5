//! Preset management commands.
//!
//! Provides commands to list, show, save, and manage presets in banks.

use clap::{Args, Subcommand};
use pedalboard_chain::{AutomationEvent, MIX_FLAT_ID, Pedalboard};

use super::common::Context;
use crate::chain_spec::{UnitSpec, parse_chain};

#[derive(Args)]
pub struct PresetsArgs {
    #[command(subcommand)]
    command: PresetsCommand,
}

#[derive(Subcommand)]
enum PresetsCommand {
    /// List presets of one bank, or of every bank
    List {
        /// Bank name
        bank: Option<String>,
    },

    /// Show details of a preset
    Show {
        /// Bank name
        bank: String,
        /// Preset name
        preset: String,

        /// Print the stored snapshot as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a preset holding an empty chain
    Create {
        /// Bank name
        bank: String,
        /// Preset name
        preset: String,
    },

    /// Build a chain and save it as a preset, overwriting any existing one
    Save {
        /// Bank name (created if absent)
        bank: String,
        /// Preset name
        preset: String,

        /// Chain specification (e.g., "gain:gain=6|overdrive:drive=0.7")
        #[arg(short, long)]
        chain: String,

        /// Output level (0.0 - 1.0)
        #[arg(short, long)]
        level: Option<f64>,
    },

    /// Rename a preset within its bank
    Rename {
        /// Bank name
        bank: String,
        /// Current name
        old: String,
        /// New name
        new: String,
    },

    /// Delete a preset
    Delete {
        /// Bank name
        bank: String,
        /// Preset name
        preset: String,
    },
}

pub async fn run(ctx: &Context, args: PresetsArgs) -> anyhow::Result<()> {
    match args.command {
        PresetsCommand::List { bank } => list_presets(ctx, bank.as_deref()),
        PresetsCommand::Show { bank, preset, json } => show_preset(ctx, &bank, &preset, json),
        PresetsCommand::Create { bank, preset } => {
            let mut session = ctx.session()?;
            session.create_preset(&bank, &preset)?;
            println!("Created preset '{}' in bank '{}'", preset.trim(), bank);
            Ok(())
        }
        PresetsCommand::Save {
            bank,
            preset,
            chain,
            level,
        } => save_preset(ctx, &bank, &preset, &chain, level).await,
        PresetsCommand::Rename { bank, old, new } => {
            let mut session = ctx.session()?;
            session.rename_preset(&bank, &old, &new)?;
            println!("Renamed preset '{}' to '{}' in bank '{}'", old, new.trim(), bank);
            Ok(())
        }
        PresetsCommand::Delete { bank, preset } => {
            let mut session = ctx.session()?;
            if session.delete_preset(&bank, &preset)? {
                println!("Deleted preset '{}' from bank '{}'", preset, bank);
            } else {
                println!("No preset '{}' in bank '{}'", preset, bank);
            }
            Ok(())
        }
    }
}

fn list_presets(ctx: &Context, bank: Option<&str>) -> anyhow::Result<()> {
    let library = ctx.library()?;
    let store = library.store();
    let banks = match bank {
        Some(bank) => vec![bank],
        None => store.bank_names(),
    };
    if banks.is_empty() {
        println!("No presets.");
        println!();
        println!("  Create one with: pedalboard presets save <bank> <preset> --chain \"...\"");
        return Ok(());
    }
    for bank in banks {
        println!("{}:", bank);
        let names = store.preset_names(bank)?;
        if names.is_empty() {
            println!("  (empty)");
        }
        for name in names {
            let info = store.preset_info(bank, name)?;
            let units = if info.unit_types.is_empty() {
                "(empty chain)".to_string()
            } else {
                info.unit_types.join(" -> ")
            };
            println!("  {:20} {}", name, units);
        }
        println!();
    }
    Ok(())
}

fn show_preset(ctx: &Context, bank: &str, preset: &str, json: bool) -> anyhow::Result<()> {
    let library = ctx.library()?;
    let snapshot = library.store().get(bank, preset)?;
    if json {
        println!("{}", serde_json::to_string_pretty(snapshot)?);
        return Ok(());
    }

    println!("Preset: {} / {}", bank, preset);
    println!("Output level: {:.2}", snapshot.output_level);
    println!();
    println!("Units ({}):", snapshot.len());
    for (i, record) in snapshot.units.iter().enumerate() {
        println!("  {}. {} {}", i + 1, record.unit_type, record.native_state);
    }
    for issue in pedalboard_config::snapshot_issues(snapshot, &ctx.registry) {
        println!("  warning: {}", issue);
    }
    Ok(())
}

/// Build the chain described by `units` on `board`.
pub async fn build_chain(board: &Pedalboard, units: &[UnitSpec]) -> anyhow::Result<()> {
    let mut ids = Vec::with_capacity(units.len());
    for spec in units {
        ids.push(board.add_unit(&spec.unit_type).await?);
    }
    let params = board.parameter_info(None).await;
    for (spec, id) in units.iter().zip(ids) {
        for (key, value) in &spec.params {
            let flat = params
                .iter()
                .find(|p| p.owner == Some(id) && p.local_id.as_deref() == Some(key.as_str()))
                .ok_or_else(|| {
                    anyhow::anyhow!("unit '{}' has no parameter '{}'", spec.unit_type, key)
                })?;
            board
                .schedule_event(AutomationEvent::new(flat.flat_id.clone(), *value))
                .await?;
        }
    }
    Ok(())
}

async fn save_preset(
    ctx: &Context,
    bank: &str,
    preset: &str,
    chain: &str,
    level: Option<f64>,
) -> anyhow::Result<()> {
    let units = parse_chain(chain)?;
    let mut session = ctx.session()?;
    let board = session.board().clone();
    build_chain(&board, &units).await?;
    if let Some(level) = level {
        board
            .schedule_event(AutomationEvent::new(MIX_FLAT_ID, level))
            .await?;
    }
    session.save(bank, preset).await?;
    println!(
        "Saved preset '{}' in bank '{}' ({} unit(s))",
        preset.trim(),
        bank.trim(),
        units.len()
    );
    Ok(())
}
