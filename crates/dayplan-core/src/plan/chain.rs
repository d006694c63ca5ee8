//! Chain generation: one calendar event to its initial action chain.
//!
//! The event's category picks a blueprint of segments placed before and after
//! the locked `main` segment. Before-segments are laid out backward from the
//! event start so the last one ends exactly at `main.start`; after-segments are
//! laid out forward from the event end.

use tracing::debug;

use super::types::{
    ActionChain, ActionSegment, CalendarEvent, EventCategory, SegmentKind, SegmentStatus,
};
use crate::time::{add_minutes, clamp_minutes, Instant};

/// Template for one generated segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentBlueprint {
    pub kind: SegmentKind,
    pub title: &'static str,
    pub minutes: f64,
    pub locked: bool,
}

impl SegmentBlueprint {
    const fn unlocked(kind: SegmentKind, title: &'static str, minutes: f64) -> Self {
        Self {
            kind,
            title,
            minutes,
            locked: false,
        }
    }
}

const PREP_10: SegmentBlueprint = SegmentBlueprint::unlocked(SegmentKind::Prep, "Prep", 10.0);
const BUFFER_5: SegmentBlueprint = SegmentBlueprint::unlocked(SegmentKind::Buffer, "Buffer", 5.0);
const WRAPUP_5: SegmentBlueprint = SegmentBlueprint::unlocked(SegmentKind::Wrapup, "Wrap-up", 5.0);
const WRAPUP_10: SegmentBlueprint =
    SegmentBlueprint::unlocked(SegmentKind::Wrapup, "Wrap-up", 10.0);

const SESSION_BEFORE: &[SegmentBlueprint] = &[PREP_10, BUFFER_5];
const SESSION_AFTER: &[SegmentBlueprint] = &[WRAPUP_5];
const GYM_BEFORE: &[SegmentBlueprint] = &[PREP_10];
const GYM_AFTER: &[SegmentBlueprint] = &[WRAPUP_10];
const NONE: &[SegmentBlueprint] = &[];

/// Before-main and after-main blueprints for a category.
pub fn blueprints_for(
    category: EventCategory,
) -> (&'static [SegmentBlueprint], &'static [SegmentBlueprint]) {
    match category {
        EventCategory::Class | EventCategory::Meeting => (SESSION_BEFORE, SESSION_AFTER),
        EventCategory::Gym => (GYM_BEFORE, GYM_AFTER),
        EventCategory::Errand | EventCategory::Other => (NONE, NONE),
    }
}

fn build_segment(
    event_id: &str,
    index: usize,
    blueprint: &SegmentBlueprint,
    start: Instant,
    end: Instant,
) -> ActionSegment {
    ActionSegment {
        id: format!("{event_id}-{}-{index}", blueprint.kind),
        title: blueprint.title.to_string(),
        start,
        end,
        kind: blueprint.kind,
        locked: blueprint.locked,
        status: SegmentStatus::Pending,
    }
}

fn build_before(event_id: &str, anchor: Instant, blueprints: &[SegmentBlueprint]) -> Vec<ActionSegment> {
    let mut cursor = anchor;
    let mut segments = Vec::with_capacity(blueprints.len());

    for (index, blueprint) in blueprints.iter().enumerate().rev() {
        let start = add_minutes(cursor, -clamp_minutes(blueprint.minutes));
        segments.push(build_segment(event_id, index, blueprint, start, cursor));
        cursor = start;
    }

    segments.reverse();
    segments
}

fn build_after(event_id: &str, anchor: Instant, blueprints: &[SegmentBlueprint]) -> Vec<ActionSegment> {
    let mut cursor = anchor;

    blueprints
        .iter()
        .enumerate()
        .map(|(index, blueprint)| {
            let end = add_minutes(cursor, clamp_minutes(blueprint.minutes));
            let segment = build_segment(event_id, index, blueprint, cursor, end);
            cursor = end;
            segment
        })
        .collect()
}

/// Build the initial chain for `event`.
pub fn generate_chain(event: &CalendarEvent) -> ActionChain {
    let main = ActionSegment {
        id: format!("{}-main", event.id),
        title: event.title.clone(),
        start: event.start,
        end: event.end,
        kind: SegmentKind::Main,
        locked: true,
        status: SegmentStatus::Pending,
    };

    let (before, after) = blueprints_for(event.category);
    let mut segments = build_before(&event.id, main.start, before);
    let after_segments = build_after(&event.id, main.end, after);

    segments.push(main);
    segments.extend(after_segments);

    debug!(
        event_id = %event.id,
        category = event.category.as_str(),
        segments = segments.len(),
        "generated action chain"
    );

    ActionChain {
        id: format!("chain-{}", event.id),
        event_id: event.id.clone(),
        segments,
    }
}
