//! Bank management commands.

use clap::{Args, Subcommand};

use super::common::Context;

#[derive(Args)]
pub struct BanksArgs {
    #[command(subcommand)]
    command: BanksCommand,
}

#[derive(Subcommand)]
enum BanksCommand {
    /// List banks and their preset counts
    List,

    /// Create an empty bank
    Create {
        /// Bank name
        name: String,
    },

    /// Rename a bank
    Rename {
        /// Current name
        old: String,
        /// New name
        new: String,
    },

    /// Delete an empty bank
    Delete {
        /// Bank name
        name: String,
    },
}

pub fn run(ctx: &Context, args: BanksArgs) -> anyhow::Result<()> {
    let mut library = ctx.library()?;
    match args.command {
        BanksCommand::List => {
            let store = library.store();
            println!("Banks:");
            println!("======");
            if store.is_empty() {
                println!("  (none)");
            }
            for bank in store.bank_names() {
                let count = store.preset_names(bank)?.len();
                println!("  {:20} {} preset(s)", bank, count);
            }
        }
        BanksCommand::Create { name } => {
            library.update(|store| store.create_bank(&name))?;
            println!("Created bank '{}'", name.trim());
        }
        BanksCommand::Rename { old, new } => {
            library.update(|store| store.rename_bank(&old, &new))?;
            println!("Renamed bank '{}' to '{}'", old, new.trim());
        }
        BanksCommand::Delete { name } => {
            library.update(|store| store.delete_bank(&name))?;
            println!("Deleted bank '{}'", name);
        }
    }
    Ok(())
}
