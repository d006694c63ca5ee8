//! Planner service: today's plan, the active commute rule and variant, backed
//! by [`PlanDb`].
//!
//! Every mutation computes a new plan with the pure functions in
//! [`crate::plan`] and writes it back before updating in-memory state, so a
//! failed write leaves the planner unchanged.

use chrono::{FixedOffset, NaiveDate};
use tracing::{info, warn};

use crate::error::{CoreError, Result};
use crate::plan::{
    mark_done, mark_skipped, rebuild_chains, select_next, shift_remaining, toggle_lock,
    ActionSegment, CommuteRule, CommuteVariant, DayPlan,
};
use crate::storage::PlanDb;
use crate::time::Instant;

pub struct Planner {
    db: PlanDb,
    today: NaiveDate,
    offset: FixedOffset,
    variant: CommuteVariant,
    active_rule_id: Option<String>,
    commute_rules: Vec<CommuteRule>,
    day_plan: Option<DayPlan>,
}

impl Planner {
    pub fn new(
        db: PlanDb,
        today: NaiveDate,
        offset: FixedOffset,
        variant: CommuteVariant,
        active_rule_id: Option<String>,
    ) -> Self {
        Self {
            db,
            today,
            offset,
            variant,
            active_rule_id,
            commute_rules: Vec::new(),
            day_plan: None,
        }
    }

    pub fn today_iso(&self) -> String {
        self.today.format("%Y-%m-%d").to_string()
    }

    /// Seed when needed, then load rules and today's plan.
    ///
    /// The active rule id is kept when it still names a stored rule, otherwise
    /// it falls back to the first rule (or none).
    pub fn init(&mut self) -> Result<()> {
        self.db.ensure_seeded(self.today, self.offset)?;
        self.load()
    }

    /// Load rules and today's plan without seeding. A missing plan stays `None`.
    pub fn load(&mut self) -> Result<()> {
        let commute_rules = self.db.list_commute_rules()?;
        let day_plan = self.db.load_day_plan(&self.today_iso())?;

        let keep_current = self
            .active_rule_id
            .as_deref()
            .is_some_and(|id| commute_rules.iter().any(|rule| rule.id == id));
        if !keep_current {
            if let Some(id) = &self.active_rule_id {
                warn!(rule_id = %id, "active commute rule no longer exists");
            }
            self.active_rule_id = commute_rules.first().map(|rule| rule.id.clone());
        }

        self.commute_rules = commute_rules;
        self.day_plan = day_plan;
        Ok(())
    }

    #[cfg(test)]
    pub(crate) fn db(&self) -> &PlanDb {
        &self.db
    }

    pub fn variant(&self) -> CommuteVariant {
        self.variant
    }

    pub fn commute_rules(&self) -> &[CommuteRule] {
        &self.commute_rules
    }

    pub fn active_rule_id(&self) -> Option<&str> {
        self.active_rule_id.as_deref()
    }

    pub fn active_rule(&self) -> Option<&CommuteRule> {
        let id = self.active_rule_id.as_deref()?;
        self.commute_rules.iter().find(|rule| rule.id == id)
    }

    pub fn day_plan(&self) -> Option<&DayPlan> {
        self.day_plan.as_ref()
    }

    /// Today's plan, or `NotFound` when none is loaded.
    pub fn current_plan(&self) -> Result<&DayPlan> {
        self.day_plan
            .as_ref()
            .ok_or_else(|| CoreError::not_found("day plan", self.today_iso()))
    }

    fn commit(&mut self, plan: DayPlan) -> Result<&DayPlan> {
        self.db.save_day_plan(&plan)?;
        Ok(&*self.day_plan.insert(plan))
    }

    /// Switch variant and rebuild today's chains.
    pub fn set_variant(&mut self, variant: CommuteVariant) -> Result<&DayPlan> {
        self.variant = variant;
        info!(variant = variant.as_str(), "commute variant changed");
        self.regenerate_today()
    }

    /// Switch the active rule (`None` disables commute legs) and rebuild.
    pub fn set_active_rule(&mut self, rule_id: Option<&str>) -> Result<&DayPlan> {
        if let Some(id) = rule_id {
            if !self.commute_rules.iter().any(|rule| rule.id == id) {
                return Err(CoreError::not_found("commute rule", id));
            }
        }
        self.active_rule_id = rule_id.map(str::to_string);
        info!(rule_id = rule_id.unwrap_or("none"), "active commute rule changed");
        self.regenerate_today()
    }

    /// Store a new or edited rule and refresh the rule list.
    pub fn upsert_commute_rule(&mut self, rule: &CommuteRule) -> Result<()> {
        self.db.upsert_commute_rule(rule)?;
        self.commute_rules = self.db.list_commute_rules()?;
        Ok(())
    }

    pub fn delete_commute_rule(&mut self, rule_id: &str) -> Result<()> {
        if !self.db.delete_commute_rule(rule_id)? {
            return Err(CoreError::not_found("commute rule", rule_id));
        }
        self.commute_rules = self.db.list_commute_rules()?;
        if self.active_rule_id.as_deref() == Some(rule_id) {
            self.active_rule_id = None;
        }
        Ok(())
    }

    fn edit_segment(
        &mut self,
        segment_id: &str,
        edit: fn(&DayPlan, &str) -> Option<DayPlan>,
        action: &'static str,
    ) -> Result<&DayPlan> {
        let updated = edit(self.current_plan()?, segment_id)
            .ok_or_else(|| CoreError::not_found("segment", segment_id))?;
        info!(segment_id, action, "segment updated");
        self.commit(updated)
    }

    pub fn mark_done(&mut self, segment_id: &str) -> Result<&DayPlan> {
        self.edit_segment(segment_id, mark_done, "done")
    }

    pub fn mark_skipped(&mut self, segment_id: &str) -> Result<&DayPlan> {
        self.edit_segment(segment_id, mark_skipped, "skipped")
    }

    pub fn toggle_lock(&mut self, segment_id: &str) -> Result<&DayPlan> {
        self.edit_segment(segment_id, toggle_lock, "lock toggled")
    }

    /// Push every unlocked segment starting at or after `from` by `delta_minutes`.
    pub fn shift(&mut self, delta_minutes: i64, from: Instant) -> Result<&DayPlan> {
        let shifted = shift_remaining(self.current_plan()?, from, delta_minutes);
        info!(delta_minutes, from = %from, "shifted remaining segments");
        self.commit(shifted)
    }

    /// Rebuild today's chains from its events with the active rule and variant.
    pub fn regenerate_today(&mut self) -> Result<&DayPlan> {
        let rebuilt = rebuild_chains(self.current_plan()?, self.variant, self.active_rule());
        self.commit(rebuilt)
    }

    pub fn next_action(&self, now: Instant) -> Result<Option<ActionSegment>> {
        Ok(select_next(self.current_plan()?, now))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::{SegmentKind, SegmentStatus};
    use crate::seed::{at_local_time, SEED_RULE_ID};

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 20).unwrap()
    }

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    fn planner() -> Planner {
        let mut planner = Planner::new(
            PlanDb::open_memory().unwrap(),
            day(),
            utc(),
            CommuteVariant::Normal,
            None,
        );
        planner.init().unwrap();
        planner
    }

    #[test]
    fn init_seeds_and_picks_first_rule() {
        let planner = planner();
        assert_eq!(planner.active_rule_id(), Some(SEED_RULE_ID));
        assert_eq!(planner.day_plan().unwrap().chains.len(), 2);
    }

    #[test]
    fn unknown_active_rule_falls_back() {
        let mut planner = Planner::new(
            PlanDb::open_memory().unwrap(),
            day(),
            utc(),
            CommuteVariant::Normal,
            Some("gone".to_string()),
        );
        planner.init().unwrap();
        assert_eq!(planner.active_rule_id(), Some(SEED_RULE_ID));
    }

    #[test]
    fn edits_persist_to_storage() {
        let mut planner = planner();
        planner.mark_done("2026-02-20-class-1-prep-0").unwrap();

        let stored = planner.db().load_day_plan("2026-02-20").unwrap().unwrap();
        let prep = crate::plan::find_segment(&stored, "2026-02-20-class-1-prep-0").unwrap();
        assert_eq!(prep.status, SegmentStatus::Done);
    }

    #[test]
    fn unknown_segment_is_not_found() {
        let mut planner = planner();
        let err = planner.mark_skipped("missing").unwrap_err();
        assert!(matches!(err, CoreError::NotFound { entity: "segment", .. }));
    }

    #[test]
    fn operations_without_plan_report_missing_day_plan() {
        let mut planner = Planner::new(
            PlanDb::open_memory().unwrap(),
            day(),
            utc(),
            CommuteVariant::Normal,
            None,
        );
        planner.load().unwrap();
        assert!(planner.day_plan().is_none());
        assert!(planner.regenerate_today().is_err());
        assert!(planner.next_action(at_local_time(day(), "09:00", utc()).unwrap()).is_err());
    }

    #[test]
    fn disabling_rule_removes_commute_legs() {
        let mut planner = planner();
        let plan = planner.set_active_rule(None).unwrap();
        assert!(plan.segments().all(|s| s.kind != SegmentKind::Commute));

        let plan = planner.set_active_rule(Some(SEED_RULE_ID)).unwrap();
        assert_eq!(plan.segments().filter(|s| s.kind == SegmentKind::Commute).count(), 3);

        assert!(planner.set_active_rule(Some("nope")).is_err());
    }

    #[test]
    fn rain_variant_stretches_commute() {
        let mut planner = planner();
        let plan = planner.set_variant(CommuteVariant::Rain).unwrap();
        let class = &plan.chains[0];
        // prep 10 + scooter 3 + bus 12 + walk 6 + buffer 8 = 39 minutes before 10:00
        assert_eq!(class.segments[0].start, at_local_time(day(), "09:21", utc()).unwrap());
    }

    #[test]
    fn shift_and_next_action() {
        let mut planner = planner();
        let from = at_local_time(day(), "09:00", utc()).unwrap();
        planner.shift(10, from).unwrap();

        // Seed class prep starts 09:27 and moves to 09:37.
        let next = planner.next_action(from).unwrap().unwrap();
        assert_eq!(next.kind, SegmentKind::Prep);
        assert_eq!(next.start, at_local_time(day(), "09:37", utc()).unwrap());
    }

    #[test]
    fn deleting_active_rule_clears_it() {
        let mut planner = planner();
        planner.delete_commute_rule(SEED_RULE_ID).unwrap();
        assert!(planner.active_rule_id().is_none());
        assert!(planner.delete_commute_rule(SEED_RULE_ID).is_err());
    }
}
