//! Delay propagation across a day plan.

use tracing::debug;

use super::types::{ActionChain, ActionSegment, DayPlan};
use crate::time::{add_minutes, compare, Instant};

fn shift_segment(segment: &ActionSegment, from: Instant, delta_minutes: i64) -> ActionSegment {
    if segment.locked || compare(segment.start, from).is_lt() {
        return segment.clone();
    }

    ActionSegment {
        start: add_minutes(segment.start, delta_minutes),
        end: add_minutes(segment.end, delta_minutes),
        ..segment.clone()
    }
}

/// Push every unlocked segment starting at or after `from` by `delta_minutes`.
///
/// Negative deltas pull segments earlier. Locked segments and segments that
/// started before `from` keep their timestamps; events are copied unchanged.
pub fn shift_remaining(plan: &DayPlan, from: Instant, delta_minutes: i64) -> DayPlan {
    let mut moved = 0usize;

    let chains = plan
        .chains
        .iter()
        .map(|chain| ActionChain {
            id: chain.id.clone(),
            event_id: chain.event_id.clone(),
            segments: chain
                .segments
                .iter()
                .map(|segment| {
                    let shifted = shift_segment(segment, from, delta_minutes);
                    if shifted.start != segment.start {
                        moved += 1;
                    }
                    shifted
                })
                .collect(),
        })
        .collect();

    debug!(
        date = %plan.date_iso,
        from = %from,
        delta_minutes,
        moved,
        "shifted remaining segments"
    );

    DayPlan {
        date_iso: plan.date_iso.clone(),
        events: plan.events.clone(),
        chains,
    }
}
