//! Segment edits and whole-plan rebuilds used by the application state layer.
//!
//! Like the rest of `plan`, these return new values and never touch their input.

use tracing::debug;

use super::chain::generate_chain;
use super::commute::apply_commute_rule;
use super::types::{ActionChain, ActionSegment, CommuteRule, CommuteVariant, DayPlan, SegmentStatus};

/// Locate a segment by id anywhere in the plan.
pub fn find_segment<'a>(plan: &'a DayPlan, segment_id: &str) -> Option<&'a ActionSegment> {
    plan.segments().find(|segment| segment.id == segment_id)
}

/// Replace the segment with `segment_id` by `updater(segment)`.
///
/// Returns `None` when no segment has that id. Only the first match is
/// updated; ids are unique within a plan produced by the chain generator.
pub fn update_segment<F>(plan: &DayPlan, segment_id: &str, updater: F) -> Option<DayPlan>
where
    F: FnOnce(&ActionSegment) -> ActionSegment,
{
    let (chain_index, segment_index) = plan.chains.iter().enumerate().find_map(|(ci, chain)| {
        chain
            .segments
            .iter()
            .position(|segment| segment.id == segment_id)
            .map(|si| (ci, si))
    })?;

    let mut updated = plan.clone();
    let target = &mut updated.chains[chain_index].segments[segment_index];
    let replacement = updater(target);
    *target = replacement;
    Some(updated)
}

pub fn mark_done(plan: &DayPlan, segment_id: &str) -> Option<DayPlan> {
    set_status(plan, segment_id, SegmentStatus::Done)
}

pub fn mark_skipped(plan: &DayPlan, segment_id: &str) -> Option<DayPlan> {
    set_status(plan, segment_id, SegmentStatus::Skipped)
}

fn set_status(plan: &DayPlan, segment_id: &str, status: SegmentStatus) -> Option<DayPlan> {
    update_segment(plan, segment_id, |segment| ActionSegment {
        status,
        ..segment.clone()
    })
}

/// Flip the `locked` flag of a segment.
pub fn toggle_lock(plan: &DayPlan, segment_id: &str) -> Option<DayPlan> {
    update_segment(plan, segment_id, |segment| ActionSegment {
        locked: !segment.locked,
        ..segment.clone()
    })
}

/// Regenerate every chain from its event and apply `active_rule` to events
/// located at the rule's destination tag.
///
/// Chains follow the order of `plan.events`. Status and lock edits on the old
/// chains are discarded.
pub fn rebuild_chains(
    plan: &DayPlan,
    variant: CommuteVariant,
    active_rule: Option<&CommuteRule>,
) -> DayPlan {
    let chains: Vec<ActionChain> = plan
        .events
        .iter()
        .map(|event| {
            let base = generate_chain(event);
            match active_rule {
                Some(rule) if event.location.as_deref() == Some(rule.to_tag.as_str()) => {
                    apply_commute_rule(&base, Some(rule), variant)
                }
                _ => base,
            }
        })
        .collect();

    debug!(
        date = %plan.date_iso,
        variant = variant.as_str(),
        rule_id = active_rule.map(|r| r.id.as_str()).unwrap_or("none"),
        chains = chains.len(),
        "rebuilt day plan chains"
    );

    DayPlan {
        date_iso: plan.date_iso.clone(),
        events: plan.events.clone(),
        chains,
    }
}
