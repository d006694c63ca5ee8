//! Commute rule application.
//!
//! Applying a rule is done in two phases:
//!
//! 1. **Assemble**: strip stale commute segments, build one commute segment per
//!    leg with the right duration, and splice them in before the last buffer
//!    that precedes `main` (or before `main` itself). Timestamps of the new
//!    segments are placeholders at this point.
//! 2. **Lay out**: walk backward from `main.start`, giving every before-main
//!    segment a contiguous `[start, end)`. Buffers take the variant's buffer
//!    duration; everything else keeps its own duration.
//!
//! Segments at or after `main` are never touched. When no buffer precedes
//! `main`, the resolved buffer duration is not materialized as a segment.

use tracing::{debug, warn};

use super::types::{
    ActionChain, ActionSegment, CommuteRule, CommuteVariant, SegmentKind, SegmentStatus,
};
use crate::time::{add_minutes, clamp_minutes, minutes_between, Instant};

/// Concrete multiplier and buffer for one variant of a rule.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedVariant {
    pub multiplier: f64,
    pub buffer_minutes: f64,
}

/// Resolve `variant` against `rule`, falling back field by field to
/// `multiplier = 1` and the rule's own `buffer_minutes`.
pub fn resolve_variant(rule: &CommuteRule, variant: CommuteVariant) -> ResolvedVariant {
    let overrides = rule.variants.as_ref().and_then(|v| v.get(variant));

    ResolvedVariant {
        multiplier: overrides.and_then(|o| o.multiplier).unwrap_or(1.0),
        buffer_minutes: overrides
            .and_then(|o| o.buffer_minutes)
            .unwrap_or(rule.buffer_minutes),
    }
}

fn duration_minutes(segment: &ActionSegment) -> i64 {
    clamp_minutes(minutes_between(segment.start, segment.end) as f64)
}

/// Index of the last `buffer` strictly before `main_index`.
fn last_buffer_before(segments: &[ActionSegment], main_index: usize) -> Option<usize> {
    segments[..main_index]
        .iter()
        .rposition(|segment| segment.kind == SegmentKind::Buffer)
}

fn commute_segments(
    event_id: &str,
    rule: &CommuteRule,
    resolved: ResolvedVariant,
    placeholder: Instant,
) -> Vec<ActionSegment> {
    rule.segments
        .iter()
        .enumerate()
        .map(|(index, leg)| ActionSegment {
            id: format!("{event_id}-commute-{index}"),
            title: format!("Commute ({})", leg.mode),
            start: placeholder,
            end: add_minutes(placeholder, clamp_minutes(leg.minutes * resolved.multiplier)),
            kind: SegmentKind::Commute,
            locked: false,
            status: SegmentStatus::Pending,
        })
        .collect()
}

/// Phase 2: contiguous backward layout of everything before `main_index`.
fn lay_out_before_main(
    segments: Vec<ActionSegment>,
    main_index: usize,
    buffer_minutes: i64,
) -> Vec<ActionSegment> {
    let mut cursor = segments[main_index].start;
    let mut laid_out = segments;

    for segment in laid_out[..main_index].iter_mut().rev() {
        let minutes = match segment.kind {
            SegmentKind::Buffer => buffer_minutes,
            _ => duration_minutes(segment),
        };
        let start = add_minutes(cursor, -minutes);
        segment.end = cursor;
        segment.start = start;
        cursor = start;
    }

    laid_out
}

/// Insert `rule`'s commute legs into a copy of `chain` for the given variant.
///
/// Returns a fresh chain; `chain` is never modified. Passing no rule yields a
/// plain copy. Re-applying a rule to its own output is idempotent.
pub fn apply_commute_rule(
    chain: &ActionChain,
    rule: Option<&CommuteRule>,
    variant: CommuteVariant,
) -> ActionChain {
    let Some(rule) = rule else {
        return chain.clone();
    };

    let stripped: Vec<ActionSegment> = chain
        .segments
        .iter()
        .filter(|segment| segment.kind != SegmentKind::Commute)
        .cloned()
        .collect();

    let Some(main_index) = stripped.iter().position(|s| s.kind == SegmentKind::Main) else {
        warn!(chain_id = %chain.id, rule_id = %rule.id, "chain has no main segment; commute not applied");
        return ActionChain {
            segments: stripped,
            ..chain.clone()
        };
    };

    let resolved = resolve_variant(rule, variant);
    let legs = commute_segments(&chain.event_id, rule, resolved, stripped[main_index].start);
    let insert_at = last_buffer_before(&stripped, main_index).unwrap_or(main_index);
    let leg_count = legs.len();

    let mut merged = Vec::with_capacity(stripped.len() + leg_count);
    let mut rest = stripped.into_iter();
    merged.extend(rest.by_ref().take(insert_at));
    merged.extend(legs);
    merged.extend(rest);

    let merged_main = main_index + leg_count;
    let segments = lay_out_before_main(merged, merged_main, clamp_minutes(resolved.buffer_minutes));

    debug!(
        chain_id = %chain.id,
        rule_id = %rule.id,
        variant = variant.as_str(),
        multiplier = resolved.multiplier,
        legs = leg_count,
        "applied commute rule"
    );

    ActionChain {
        id: chain.id.clone(),
        event_id: chain.event_id.clone(),
        segments,
    }
}
