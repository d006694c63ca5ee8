//! # Dayplan Core Library
//!
//! Turns a day's calendar events into ordered action chains (prep, commute,
//! buffer, the event itself, wrap-up), keeps those chains consistent when
//! things run late, and answers "what should I do now?".
//!
//! ## Architecture
//!
//! - **Plan**: pure functions over immutable values. Chain generation, commute
//!   rule application, delay shifting, segment edits and next-action selection
//! - **Storage**: SQLite persistence for day plans and commute rules, and
//!   TOML-based configuration
//! - **Planner**: stateful service tying the two together for a single day
//!
//! ## Key Components
//!
//! - [`generate_chain`]: Event to initial action chain
//! - [`apply_commute_rule`]: Insert and lay out commute legs for a variant
//! - [`shift_remaining`]: Push unlocked, not-yet-started segments by a delay
//! - [`select_next`]: In-progress segment, else the next upcoming one
//! - [`Planner`]: Day plan service backed by [`PlanDb`]

pub mod error;
pub mod plan;
pub mod planner;
pub mod seed;
pub mod storage;
pub mod time;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use plan::{
    apply_commute_rule, generate_chain, rebuild_chains, select_next, shift_remaining,
    ActionChain, ActionSegment, CalendarEvent, CommuteLeg, CommuteMode, CommuteRule,
    CommuteVariant, DayPlan, EventCategory, SegmentKind, SegmentStatus,
};
pub use planner::Planner;
pub use storage::{Config, PlanDb};
pub use time::Instant;
