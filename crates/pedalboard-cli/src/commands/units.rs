//! Unit listing and information command.

#![allow(clippy::print_literal)] // Table headers use literal strings intentionally

use clap::Args;
use pedalboard_core::ParamKind;
use pedalboard_registry::builtin::BUILTIN_TYPES;

use super::common::Context;

#[derive(Args)]
pub struct UnitsArgs {
    /// Show parameters of a specific unit type
    #[arg(value_name = "UNIT")]
    unit: Option<String>,

    /// Only list units matching this keyword
    #[arg(short, long)]
    keyword: Option<String>,
}

pub fn run(ctx: &Context, args: UnitsArgs) -> anyhow::Result<()> {
    if let Some(unit) = &args.unit {
        return show_unit(ctx, unit);
    }

    let units = ctx.registry.with_keyword(args.keyword.as_deref().unwrap_or(""));
    println!("Available Units");
    println!("===============");
    println!();
    println!("  {:12}  {:12}  {}", "Type", "Category", "Description");
    println!("  {:12}  {:12}  {}", "----", "--------", "-----------");
    for desc in &units {
        println!(
            "  {:12}  {:12}  {}",
            desc.id,
            desc.category.name(),
            desc.description
        );
    }
    if units.is_empty() {
        println!("  (no matching units)");
    }
    println!();
    println!("Use 'pedalboard units <UNIT>' for parameters.");
    Ok(())
}

fn show_unit(ctx: &Context, unit: &str) -> anyhow::Result<()> {
    let desc = ctx
        .registry
        .get(unit)
        .ok_or_else(|| anyhow::anyhow!("Unknown unit type: {}", unit))?;

    println!("{}", desc.name);
    println!("{}", "=".repeat(desc.name.len()));
    println!();
    println!("{}", desc.description);
    println!();

    let Some(builtin) = BUILTIN_TYPES.iter().find(|b| b.id == desc.id) else {
        return Ok(());
    };
    println!("Parameters:");
    println!();
    println!("  {:12}  {:12}  {:8}  {:10}  {}", "Id", "Label", "Kind", "Default", "Range");
    println!("  {:12}  {:12}  {:8}  {:10}  {}", "--", "-----", "----", "-------", "-----");
    for param in (builtin.params)() {
        let range = if param.kind == ParamKind::Choice {
            param.choices.join(" / ")
        } else {
            format!("{} .. {}", param.min, param.max)
        };
        println!(
            "  {:12}  {:12}  {:8}  {:10}  {}",
            param.id,
            param.label,
            param.kind.name(),
            param.default,
            range
        );
    }
    if builtin.latency > 0 {
        println!();
        println!(
            "Latency: {} samples ({:.2} ms)",
            builtin.latency,
            ctx.config.chain.latency_ms(builtin.latency)
        );
    }
    Ok(())
}
