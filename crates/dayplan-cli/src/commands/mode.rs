//! Commute variant commands for CLI.

use clap::Subcommand;
use dayplan_core::{CommuteVariant, Config};

use super::{CliResult, Context};

#[derive(Subcommand)]
pub enum ModeAction {
    /// Print the current variant
    Get,
    /// Switch variant and rebuild the day
    Set {
        /// normal, rush or rain
        variant: CommuteVariant,
    },
}

pub fn run(ctx: &Context, action: ModeAction) -> CliResult {
    let mut config = Config::load()?;

    match action {
        ModeAction::Get => {
            println!("{}", config.planner.variant);
        }
        ModeAction::Set { variant } => {
            config.planner.variant = variant;
            config.save()?;

            let mut planner = ctx.open_planner(&config)?;
            if planner.day_plan().is_some() {
                planner.set_variant(variant)?;
            }
            println!("Commute variant: {variant}");
        }
    }
    Ok(())
}
