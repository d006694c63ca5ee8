//! Instant arithmetic and comparison primitives.
//!
//! Instants are treated as opaque, totally ordered points in time. Nothing here
//! reads a clock or interprets a time zone; callers pass the instants in.

use std::cmp::Ordering;

use chrono::{DateTime, TimeDelta, Utc};

/// Opaque timestamp used throughout the planner.
pub type Instant = DateTime<Utc>;

const MILLIS_PER_MINUTE: f64 = 60_000.0;

/// Anything laid out on the timeline by its start instant.
pub trait HasStart {
    fn start(&self) -> Instant;
}

/// Move `instant` by `minutes` (negative moves earlier).
///
/// Saturates at the representable range instead of overflowing.
pub fn add_minutes(instant: Instant, minutes: i64) -> Instant {
    TimeDelta::try_minutes(minutes)
        .and_then(|delta| instant.checked_add_signed(delta))
        .unwrap_or(if minutes < 0 { Instant::MIN_UTC } else { Instant::MAX_UTC })
}

/// Whole minutes from `start` to `end`, rounded to the nearest minute.
///
/// Halves round toward positive infinity, so `-1.5` becomes `-1`. The result is
/// negative when `end` is before `start`.
pub fn minutes_between(start: Instant, end: Instant) -> i64 {
    let millis = (end - start).num_milliseconds() as f64;
    (millis / MILLIS_PER_MINUTE + 0.5).floor() as i64
}

/// Chronological comparison of two instants.
pub fn compare(a: Instant, b: Instant) -> Ordering {
    a.cmp(&b)
}

/// Stable ascending sort by start. The input slice is left untouched.
pub fn sort_by_start<T: HasStart + Clone>(items: &[T]) -> Vec<T> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| compare(a.start(), b.start()));
    sorted
}

/// Clamp a possibly fractional or negative minute count to `max(0, round(value))`.
pub fn clamp_minutes(value: f64) -> i64 {
    if !value.is_finite() {
        return 0;
    }
    (value + 0.5).floor().max(0.0) as i64
}
