//! Seed data written on first run so a fresh install has something to show.

use chrono::{FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};

use crate::plan::{
    apply_commute_rule, generate_chain, CalendarEvent, CommuteLeg, CommuteMode, CommuteRule,
    CommuteVariant, DayPlan, EventCategory, VariantOverride, VariantOverrides,
};
use crate::time::Instant;

pub const SEED_RULE_ID: &str = "seed-home-ucsd";

/// Instant for wall-clock `hhmm` ("HH:MM") on `date` at `offset`.
pub fn at_local_time(date: NaiveDate, hhmm: &str, offset: FixedOffset) -> Option<Instant> {
    let time = NaiveTime::parse_from_str(hhmm, "%H:%M").ok()?;
    offset
        .from_local_datetime(&date.and_time(time))
        .single()
        .map(|dt| dt.with_timezone(&Utc))
}

/// The default home-to-campus commute.
pub fn seed_rule() -> CommuteRule {
    CommuteRule {
        id: SEED_RULE_ID.to_string(),
        name: "Home to UCSD".to_string(),
        from_tag: "home".to_string(),
        to_tag: "ucsd".to_string(),
        segments: vec![
            CommuteLeg { mode: CommuteMode::Scooter, minutes: 3.0 },
            CommuteLeg { mode: CommuteMode::Bus, minutes: 10.0 },
            CommuteLeg { mode: CommuteMode::Walk, minutes: 5.0 },
        ],
        buffer_minutes: 5.0,
        variants: Some(VariantOverrides {
            normal: Some(VariantOverride::default()),
            rush: Some(VariantOverride {
                multiplier: Some(0.9),
                buffer_minutes: Some(3.0),
            }),
            rain: Some(VariantOverride {
                multiplier: Some(1.15),
                buffer_minutes: Some(8.0),
            }),
        }),
    }
}

fn seed_events(date: NaiveDate, offset: FixedOffset) -> Vec<CalendarEvent> {
    let slot = |hhmm: &str| at_local_time(date, hhmm, offset);
    let date_iso = date.format("%Y-%m-%d").to_string();

    let mut events = Vec::with_capacity(2);
    if let (Some(start), Some(end)) = (slot("10:00"), slot("10:50")) {
        events.push(
            CalendarEvent::new(format!("{date_iso}-class-1"), "Class", start, end, EventCategory::Class)
                .with_location("ucsd"),
        );
    }
    if let (Some(start), Some(end)) = (slot("17:00"), slot("18:00")) {
        events.push(
            CalendarEvent::new(format!("{date_iso}-gym-1"), "Gym", start, end, EventCategory::Gym)
                .with_location("utc"),
        );
    }
    events
}

/// A class at 10:00 and a gym session at 17:00, with `rule` applied under the
/// normal variant to events at its destination.
pub fn seed_day_plan(date: NaiveDate, offset: FixedOffset, rule: &CommuteRule) -> DayPlan {
    let events = seed_events(date, offset);

    let chains = events
        .iter()
        .map(|event| {
            let chain = generate_chain(event);
            if event.location.as_deref() == Some(rule.to_tag.as_str()) {
                apply_commute_rule(&chain, Some(rule), CommuteVariant::Normal)
            } else {
                chain
            }
        })
        .collect();

    DayPlan {
        date_iso: date.format("%Y-%m-%d").to_string(),
        events,
        chains,
    }
}
