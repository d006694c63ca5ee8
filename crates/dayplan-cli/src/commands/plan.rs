//! Day plan commands for CLI.

use clap::Subcommand;
use dayplan_core::{ActionSegment, Config, DayPlan};

use super::{CliResult, Context};

#[derive(Subcommand)]
pub enum PlanAction {
    /// Show the day's chains
    Show {
        /// Print the plan as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show the segment to act on now
    Next {
        /// Reference time (RFC 3339 or HH:MM, default: now)
        #[arg(long)]
        at: Option<String>,
        /// Print the segment as JSON
        #[arg(long)]
        json: bool,
    },
    /// Mark a segment done
    Done {
        /// Segment ID
        id: String,
    },
    /// Mark a segment skipped
    Skip {
        /// Segment ID
        id: String,
    },
    /// Lock or unlock a segment
    Lock {
        /// Segment ID
        id: String,
    },
    /// Push remaining unlocked segments by a delay
    Shift {
        /// Delay in minutes (negative pulls earlier)
        #[arg(allow_hyphen_values = true)]
        minutes: i64,
        /// Only segments starting at or after this time (RFC 3339 or HH:MM, default: now)
        #[arg(long)]
        from: Option<String>,
    },
    /// Rebuild the day's chains from its events
    Regenerate,
}

fn segment_line(ctx: &Context, segment: &ActionSegment) -> String {
    let lock = if segment.locked { " [locked]" } else { "" };
    format!(
        "  {}-{}  {:<8} {:<8} {}{}  ({})",
        ctx.clock(segment.start),
        ctx.clock(segment.end),
        segment.status.as_str(),
        segment.kind.as_str(),
        segment.title,
        lock,
        segment.id,
    )
}

fn print_plan(ctx: &Context, plan: &DayPlan) {
    println!("Day plan {}", plan.date_iso);
    for chain in &plan.chains {
        let title = chain.main().map_or(chain.event_id.as_str(), |main| main.title.as_str());
        println!("{title}");
        for segment in &chain.segments {
            println!("{}", segment_line(ctx, segment));
        }
    }
}

pub fn run(ctx: &Context, action: PlanAction) -> CliResult {
    let config = Config::load()?;
    let mut planner = ctx.open_planner(&config)?;

    match action {
        PlanAction::Show { json } => {
            let plan = planner.current_plan()?;
            if json {
                println!("{}", serde_json::to_string_pretty(plan)?);
            } else {
                print_plan(ctx, plan);
            }
        }
        PlanAction::Next { at, json } => {
            let now = ctx.parse_time(at.as_deref())?;
            let next = planner.next_action(now)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&next)?);
            } else {
                match next {
                    Some(segment) => println!("{}", segment_line(ctx, &segment).trim_start()),
                    None => println!("Nothing left to do"),
                }
            }
        }
        PlanAction::Done { id } => {
            planner.mark_done(&id)?;
            println!("Segment done: {id}");
        }
        PlanAction::Skip { id } => {
            planner.mark_skipped(&id)?;
            println!("Segment skipped: {id}");
        }
        PlanAction::Lock { id } => {
            let plan = planner.toggle_lock(&id)?;
            let locked = dayplan_core::plan::find_segment(plan, &id).is_some_and(|s| s.locked);
            println!("Segment {}: {id}", if locked { "locked" } else { "unlocked" });
        }
        PlanAction::Shift { minutes, from } => {
            let from = ctx.parse_time(from.as_deref())?;
            planner.shift(minutes, from)?;
            println!("Shifted by {minutes} min from {}", ctx.clock(from));
        }
        PlanAction::Regenerate => {
            let plan = planner.regenerate_today()?;
            print_plan(ctx, plan);
        }
    }
    Ok(())
}
