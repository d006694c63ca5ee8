pub mod config;
pub mod mode;
pub mod plan;
pub mod rule;

use chrono::{DateTime, FixedOffset, Local, NaiveDate, Offset, Utc};
use dayplan_core::seed::at_local_time;
use dayplan_core::{Config, Instant, PlanDb, Planner};
use tracing::debug;

pub type CliResult = Result<(), Box<dyn std::error::Error>>;

/// The day being operated on and the local offset used for wall-clock times.
pub struct Context {
    pub date: NaiveDate,
    pub offset: FixedOffset,
}

impl Context {
    pub fn new(date: Option<NaiveDate>) -> Self {
        let now = Local::now();
        Self {
            date: date.unwrap_or_else(|| now.date_naive()),
            offset: now.offset().fix(),
        }
    }

    /// Open the database and load the selected day, seeding it when the
    /// config allows.
    pub fn open_planner(&self, config: &Config) -> Result<Planner, Box<dyn std::error::Error>> {
        debug!(date = %self.date, offset = %self.offset, "opening planner");
        let db = PlanDb::open()?;
        let mut planner = Planner::new(
            db,
            self.date,
            self.offset,
            config.planner.variant,
            config.planner.active_rule_id.clone(),
        );
        if config.planner.seed_when_empty {
            planner.init()?;
        } else {
            planner.load()?;
        }
        Ok(planner)
    }

    /// Parse an RFC 3339 timestamp or an `HH:MM` wall-clock time on the
    /// selected date. `None` means now.
    pub fn parse_time(&self, value: Option<&str>) -> Result<Instant, Box<dyn std::error::Error>> {
        let Some(value) = value else {
            return Ok(Utc::now());
        };
        if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
            return Ok(instant.with_timezone(&Utc));
        }
        at_local_time(self.date, value, self.offset)
            .ok_or_else(|| format!("invalid time '{value}': expected RFC 3339 or HH:MM").into())
    }

    /// `HH:MM` in the local offset.
    pub fn clock(&self, instant: Instant) -> String {
        instant.with_timezone(&self.offset).format("%H:%M").to_string()
    }
}
