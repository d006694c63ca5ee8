//! Day-plan value types: events, action segments, chains and commute rules.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ValidationError;
use crate::time::{HasStart, Instant};

/// Category of a calendar event; selects the chain blueprint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventCategory {
    Class,
    Meeting,
    Gym,
    Errand,
    Other,
}

impl EventCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Class => "class",
            Self::Meeting => "meeting",
            Self::Gym => "gym",
            Self::Errand => "errand",
            Self::Other => "other",
        }
    }
}

/// Role of a segment within its chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentKind {
    Prep,
    Commute,
    Buffer,
    Main,
    Wrapup,
}

impl SegmentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Prep => "prep",
            Self::Commute => "commute",
            Self::Buffer => "buffer",
            Self::Main => "main",
            Self::Wrapup => "wrapup",
        }
    }
}

impl fmt::Display for SegmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SegmentStatus {
    #[default]
    Pending,
    Done,
    Skipped,
}

impl SegmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Skipped => "skipped",
        }
    }
}

/// How one commute leg is travelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommuteMode {
    Walk,
    Scooter,
    Bus,
    Car,
}

impl CommuteMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Walk => "walk",
            Self::Scooter => "scooter",
            Self::Bus => "bus",
            Self::Car => "car",
        }
    }
}

impl fmt::Display for CommuteMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Travel conditions a commute rule can be scaled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommuteVariant {
    #[default]
    Normal,
    Rush,
    Rain,
}

impl CommuteVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Rush => "rush",
            Self::Rain => "rain",
        }
    }
}

impl fmt::Display for CommuteVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CommuteVariant {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "normal" => Ok(Self::Normal),
            "rush" => Ok(Self::Rush),
            "rain" => Ok(Self::Rain),
            other => Err(ValidationError::InvalidValue {
                field: "variant".to_string(),
                message: format!("expected normal, rush or rain, got '{other}'"),
            }),
        }
    }
}

/// A calendar event handed to the planner by a calendar source or seed data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: String,
    pub title: String,
    pub start: Instant,
    pub end: Instant,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub category: EventCategory,
}

impl CalendarEvent {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        start: Instant,
        end: Instant,
        category: EventCategory,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            start,
            end,
            location: None,
            category,
        }
    }

    /// Set the location tag matched against a commute rule's `to_tag`.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Check `start <= end`.
    ///
    /// # Errors
    /// Returns [`ValidationError::InvalidTimeRange`] when the event ends before it starts.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.end < self.start {
            return Err(ValidationError::InvalidTimeRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

/// A single timed, status-tracked block of activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionSegment {
    pub id: String,
    pub title: String,
    pub start: Instant,
    pub end: Instant,
    pub kind: SegmentKind,
    #[serde(default)]
    pub locked: bool,
    #[serde(default)]
    pub status: SegmentStatus,
}

impl ActionSegment {
    pub fn is_pending(&self) -> bool {
        self.status == SegmentStatus::Pending
    }

    /// `start <= now < end`.
    pub fn contains(&self, now: Instant) -> bool {
        self.start <= now && now < self.end
    }
}

impl HasStart for ActionSegment {
    fn start(&self) -> Instant {
        self.start
    }
}

/// The ordered segments belonging to one calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionChain {
    pub id: String,
    pub event_id: String,
    pub segments: Vec<ActionSegment>,
}

impl ActionChain {
    /// Index of the first `main` segment, if any.
    pub fn main_index(&self) -> Option<usize> {
        self.segments.iter().position(|s| s.kind == SegmentKind::Main)
    }

    pub fn main(&self) -> Option<&ActionSegment> {
        self.main_index().map(|i| &self.segments[i])
    }
}

/// One leg of a commute, e.g. a 10 minute bus ride.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommuteLeg {
    pub mode: CommuteMode,
    pub minutes: f64,
}

/// Optional per-variant adjustments of a commute rule.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_minutes: Option<f64>,
}

/// Overrides keyed by variant. A missing entry means "use the rule's defaults".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantOverrides {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normal: Option<VariantOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rush: Option<VariantOverride>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rain: Option<VariantOverride>,
}

impl VariantOverrides {
    pub fn get(&self, variant: CommuteVariant) -> Option<&VariantOverride> {
        match variant {
            CommuteVariant::Normal => self.normal.as_ref(),
            CommuteVariant::Rush => self.rush.as_ref(),
            CommuteVariant::Rain => self.rain.as_ref(),
        }
    }
}

/// A reusable, named, multi-leg commute template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommuteRule {
    pub id: String,
    pub name: String,
    pub from_tag: String,
    pub to_tag: String,
    pub segments: Vec<CommuteLeg>,
    pub buffer_minutes: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variants: Option<VariantOverrides>,
}

/// Events and their chains for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayPlan {
    pub date_iso: String,
    pub events: Vec<CalendarEvent>,
    pub chains: Vec<ActionChain>,
}

impl DayPlan {
    /// Every segment of every chain, in chain order.
    pub fn segments(&self) -> impl Iterator<Item = &ActionSegment> {
        self.chains.iter().flat_map(|chain| chain.segments.iter())
    }

    pub fn chain_for_event(&self, event_id: &str) -> Option<&ActionChain> {
        self.chains.iter().find(|chain| chain.event_id == event_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn enums_serialize_lowercase() {
        assert_eq!(serde_json::to_string(&SegmentKind::Wrapup).unwrap(), "\"wrapup\"");
        assert_eq!(serde_json::to_string(&SegmentStatus::Skipped).unwrap(), "\"skipped\"");
        assert_eq!(serde_json::to_string(&EventCategory::Gym).unwrap(), "\"gym\"");
        assert_eq!(serde_json::to_string(&CommuteMode::Scooter).unwrap(), "\"scooter\"");
    }

    #[test]
    fn variant_parses_case_insensitively() {
        assert_eq!("Rush".parse::<CommuteVariant>().unwrap(), CommuteVariant::Rush);
        assert_eq!(" rain ".parse::<CommuteVariant>().unwrap(), CommuteVariant::Rain);
        assert!("snow".parse::<CommuteVariant>().is_err());
    }

    #[test]
    fn event_validate_rejects_inverted_range() {
        let start = Utc.with_ymd_and_hms(2026, 2, 20, 10, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2026, 2, 20, 9, 0, 0).unwrap();

        let event = CalendarEvent::new("e", "Backwards", start, end, EventCategory::Other);
        assert!(event.validate().is_err());

        let instant = CalendarEvent::new("e", "Zero", start, start, EventCategory::Other);
        assert!(instant.validate().is_ok());
    }

    #[test]
    fn rule_without_variants_deserializes() {
        let json = r#"{
            "id": "r1",
            "name": "Walk over",
            "from_tag": "home",
            "to_tag": "office",
            "segments": [{ "mode": "walk", "minutes": 12 }],
            "buffer_minutes": 4
        }"#;
        let rule: CommuteRule = serde_json::from_str(json).unwrap();
        assert!(rule.variants.is_none());
        assert_eq!(rule.segments[0].mode, CommuteMode::Walk);
        assert_eq!(rule.segments[0].minutes, 12.0);
    }

    #[test]
    fn segment_defaults_to_pending_and_unlocked() {
        let json = r#"{
            "id": "s",
            "title": "Prep",
            "start": "2026-02-20T16:45:00Z",
            "end": "2026-02-20T16:55:00Z",
            "kind": "prep"
        }"#;
        let segment: ActionSegment = serde_json::from_str(json).unwrap();
        assert!(segment.is_pending());
        assert!(!segment.locked);
    }
}
