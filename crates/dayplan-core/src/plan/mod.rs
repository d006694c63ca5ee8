//! Day planning: action chains, commute rules, delay shifting and next-action
//! selection.
//!
//! Everything in this module is a pure function of its arguments. Inputs are
//! borrowed and never modified; every operation returns freshly built values.
//! The current instant is always supplied by the caller.

pub mod chain;
pub mod commute;
pub mod edit;
pub mod next_action;
pub mod shift;
pub mod types;

pub use chain::{blueprints_for, generate_chain, SegmentBlueprint};
pub use commute::{apply_commute_rule, resolve_variant, ResolvedVariant};
pub use edit::{find_segment, mark_done, mark_skipped, rebuild_chains, toggle_lock, update_segment};
pub use next_action::select_next;
pub use shift::shift_remaining;
pub use types::{
    ActionChain, ActionSegment, CalendarEvent, CommuteLeg, CommuteMode, CommuteRule,
    CommuteVariant, DayPlan, EventCategory, SegmentKind, SegmentStatus, VariantOverride,
    VariantOverrides,
};
