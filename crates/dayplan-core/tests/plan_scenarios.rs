//! End-to-end planning scenarios on a UTC-08:00 wall clock.
//!
//! These walk a single day through chain generation, commute rules, a delay
//! and next-action selection using only the public API.

use chrono::{DateTime, Utc};
use dayplan_core::plan::{
    apply_commute_rule, generate_chain, mark_done, mark_skipped, select_next, shift_remaining,
    ActionChain, ActionSegment, CalendarEvent, CommuteLeg, CommuteMode, CommuteRule,
    CommuteVariant, DayPlan, EventCategory, SegmentKind, SegmentStatus, VariantOverride,
    VariantOverrides,
};
use dayplan_core::Instant;

fn at(hhmm: &str) -> Instant {
    DateTime::parse_from_rfc3339(&format!("2026-02-20T{hhmm}:00-08:00"))
        .unwrap()
        .with_timezone(&Utc)
}

fn span(segment: &ActionSegment) -> (Instant, Instant) {
    (segment.start, segment.end)
}

fn math_101() -> CalendarEvent {
    CalendarEvent::new("math-101", "Math 101", at("09:00"), at("10:00"), EventCategory::Class)
}

fn team_sync() -> CalendarEvent {
    CalendarEvent::new("team-sync", "Team Sync", at("09:00"), at("10:00"), EventCategory::Meeting)
        .with_location("office")
}

fn walk_and_bus() -> CommuteRule {
    CommuteRule {
        id: "rule-office".to_string(),
        name: "Walk and bus".to_string(),
        from_tag: "home".to_string(),
        to_tag: "office".to_string(),
        segments: vec![
            CommuteLeg { mode: CommuteMode::Walk, minutes: 8.0 },
            CommuteLeg { mode: CommuteMode::Bus, minutes: 12.0 },
        ],
        buffer_minutes: 7.0,
        variants: Some(VariantOverrides {
            rush: Some(VariantOverride {
                multiplier: Some(1.5),
                buffer_minutes: Some(9.0),
            }),
            ..Default::default()
        }),
    }
}

fn plan_of(event: CalendarEvent, chain: ActionChain) -> DayPlan {
    DayPlan {
        date_iso: "2026-02-20".to_string(),
        events: vec![event],
        chains: vec![chain],
    }
}

#[test]
fn class_chain_layout() {
    let chain = generate_chain(&math_101());
    let kinds: Vec<_> = chain.segments.iter().map(|s| s.kind).collect();
    assert_eq!(
        kinds,
        vec![SegmentKind::Prep, SegmentKind::Buffer, SegmentKind::Main, SegmentKind::Wrapup]
    );

    assert_eq!(span(&chain.segments[0]), (at("08:45"), at("08:55")));
    assert_eq!(span(&chain.segments[1]), (at("08:55"), at("09:00")));
    assert_eq!(span(&chain.segments[2]), (at("09:00"), at("10:00")));
    assert!(chain.segments[2].locked);
    assert_eq!(chain.segments[2].title, "Math 101");
    assert_eq!(span(&chain.segments[3]), (at("10:00"), at("10:05")));
}

#[test]
fn rush_commute_rule_on_meeting() {
    let original = generate_chain(&team_sync());
    let before = original.clone();

    let applied = apply_commute_rule(&original, Some(&walk_and_bus()), CommuteVariant::Rush);

    let layout: Vec<_> = applied
        .segments
        .iter()
        .map(|s| (s.kind, s.start, s.end))
        .collect();
    assert_eq!(
        layout,
        vec![
            (SegmentKind::Prep, at("08:11"), at("08:21")),
            (SegmentKind::Commute, at("08:21"), at("08:33")),
            (SegmentKind::Commute, at("08:33"), at("08:51")),
            (SegmentKind::Buffer, at("08:51"), at("09:00")),
            (SegmentKind::Main, at("09:00"), at("10:00")),
            (SegmentKind::Wrapup, at("10:00"), at("10:05")),
        ]
    );
    assert_eq!(applied.segments[1].title, "Commute (walk)");
    assert_eq!(applied.segments[2].title, "Commute (bus)");

    assert_eq!(original, before);
    assert_eq!(span(&original.segments[0]), (at("08:45"), at("08:55")));
}

#[test]
fn delay_shifts_only_unlocked_future_segments() {
    let event = math_101();
    let chain = generate_chain(&event);
    let plan = plan_of(event, chain);

    let shifted = shift_remaining(&plan, at("08:50"), 15);
    let segments = &shifted.chains[0].segments;

    assert_eq!(span(&segments[0]), (at("08:45"), at("08:55")));
    assert_eq!(span(&segments[1]), (at("09:10"), at("09:15")));
    assert_eq!(span(&segments[2]), (at("09:00"), at("10:00")));
    assert_eq!(span(&segments[3]), (at("10:15"), at("10:20")));

    assert_eq!(shifted.events, plan.events);
    assert_eq!(span(&plan.chains[0].segments[1]), (at("08:55"), at("09:00")));
}

fn segment(id: &str, start: &str, end: &str, locked: bool, status: SegmentStatus) -> ActionSegment {
    ActionSegment {
        id: id.to_string(),
        title: id.to_string(),
        start: at(start),
        end: at(end),
        kind: SegmentKind::Main,
        locked,
        status,
    }
}

fn selection_plan() -> DayPlan {
    let chain = ActionChain {
        id: "chain-mixed".to_string(),
        event_id: "mixed".to_string(),
        segments: vec![
            segment("a-future", "09:15", "09:30", false, SegmentStatus::Pending),
            segment("b-done", "08:30", "08:45", false, SegmentStatus::Done),
            segment("c-skipped", "09:02", "09:20", false, SegmentStatus::Skipped),
            segment("d-now", "09:00", "09:10", true, SegmentStatus::Pending),
        ],
    };
    DayPlan {
        date_iso: "2026-02-20".to_string(),
        events: Vec::new(),
        chains: vec![chain],
    }
}

#[test]
fn in_progress_segment_wins_over_future() {
    let next = select_next(&selection_plan(), at("09:05")).unwrap();
    assert_eq!(next.id, "d-now");
}

#[test]
fn nothing_pending_selects_none() {
    let plan = selection_plan();
    let plan = mark_done(&plan, "d-now").unwrap();
    assert_eq!(select_next(&plan, at("09:05")).unwrap().id, "a-future");

    let plan = mark_skipped(&plan, "a-future").unwrap();
    assert!(select_next(&plan, at("09:05")).is_none());
}
