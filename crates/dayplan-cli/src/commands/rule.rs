//! Commute rule commands for CLI.

use clap::Subcommand;
use dayplan_core::{CommuteRule, Config, CoreError, PlanDb};
use uuid::Uuid;

use super::{CliResult, Context};

#[derive(Subcommand)]
pub enum RuleAction {
    /// List commute rules
    List,
    /// Show a rule as JSON
    Show {
        /// Rule ID
        id: String,
    },
    /// Create or replace a rule from JSON (a missing id gets a generated one)
    Set {
        /// Rule JSON, e.g. '{"name":"Bike","from_tag":"home","to_tag":"office","segments":[{"mode":"scooter","minutes":12}],"buffer_minutes":5}'
        json: String,
    },
    /// Delete a rule
    Delete {
        /// Rule ID
        id: String,
    },
    /// Make a rule the active one and rebuild the day
    Activate {
        /// Rule ID
        id: String,
    },
}

fn parse_rule(json: &str) -> Result<CommuteRule, Box<dyn std::error::Error>> {
    let mut value: serde_json::Value = serde_json::from_str(json)?;
    let obj = value
        .as_object_mut()
        .ok_or("rule JSON must be an object")?;

    let has_id = obj
        .get("id")
        .and_then(|id| id.as_str())
        .is_some_and(|id| !id.is_empty());
    if !has_id {
        obj.insert("id".to_string(), Uuid::new_v4().to_string().into());
    }

    Ok(serde_json::from_value(value)?)
}

pub fn run(ctx: &Context, action: RuleAction) -> CliResult {
    match action {
        RuleAction::List => {
            let db = PlanDb::open()?;
            let config = Config::load()?;
            let rules = db.list_commute_rules()?;
            let active = config
                .planner
                .active_rule_id
                .or_else(|| rules.first().map(|rule| rule.id.clone()));

            if rules.is_empty() {
                println!("No commute rules");
            }
            for rule in &rules {
                let marker = if active.as_deref() == Some(rule.id.as_str()) { "*" } else { " " };
                println!(
                    "{marker} {}  {}  {} -> {}  {} legs, buffer {} min",
                    rule.id,
                    rule.name,
                    rule.from_tag,
                    rule.to_tag,
                    rule.segments.len(),
                    rule.buffer_minutes,
                );
            }
        }
        RuleAction::Show { id } => {
            let db = PlanDb::open()?;
            let rule = db
                .get_commute_rule(&id)?
                .ok_or_else(|| CoreError::not_found("commute rule", id))?;
            println!("{}", serde_json::to_string_pretty(&rule)?);
        }
        RuleAction::Set { json } => {
            let rule = parse_rule(&json)?;
            let db = PlanDb::open()?;
            db.upsert_commute_rule(&rule)?;
            println!("Rule saved: {}", rule.id);
        }
        RuleAction::Delete { id } => {
            let db = PlanDb::open()?;
            if !db.delete_commute_rule(&id)? {
                return Err(CoreError::not_found("commute rule", id).into());
            }
            let mut config = Config::load()?;
            if config.planner.active_rule_id.as_deref() == Some(id.as_str()) {
                config.planner.active_rule_id = None;
                config.save()?;
            }
            println!("Rule deleted: {id}");
        }
        RuleAction::Activate { id } => {
            let mut config = Config::load()?;
            let mut planner = ctx.open_planner(&config)?;
            if !planner.commute_rules().iter().any(|rule| rule.id == id) {
                return Err(CoreError::not_found("commute rule", id).into());
            }

            config.planner.active_rule_id = Some(id.clone());
            config.save()?;
            if planner.day_plan().is_some() {
                planner.set_active_rule(Some(id.as_str()))?;
            }
            println!("Active rule: {id}");
        }
    }
    Ok(())
}
