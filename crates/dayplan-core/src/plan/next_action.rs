//! Selection of the segment the user should be acting on right now.

use std::cmp::Ordering;

use super::types::{ActionSegment, DayPlan};
use crate::time::{compare, Instant};

/// Ordering key: start, then end, then id.
fn segment_order(a: &ActionSegment, b: &ActionSegment) -> Ordering {
    compare(a.start, b.start)
        .then_with(|| compare(a.end, b.end))
        .then_with(|| a.id.cmp(&b.id))
}

/// Pick the next action for `now`.
///
/// An in-progress pending segment (`start <= now < end`) always wins over a
/// future one (`start > now`). Within each group the earliest by start, end,
/// then id is chosen. Done and skipped segments are never returned.
pub fn select_next(plan: &DayPlan, now: Instant) -> Option<ActionSegment> {
    let pending: Vec<&ActionSegment> = plan.segments().filter(|s| s.is_pending()).collect();

    let in_progress = pending
        .iter()
        .copied()
        .filter(|s| s.contains(now))
        .min_by(|a, b| segment_order(a, b));

    in_progress
        .or_else(|| {
            pending
                .iter()
                .copied()
                .filter(|s| s.start > now)
                .min_by(|a, b| segment_order(a, b))
        })
        .cloned()
}
