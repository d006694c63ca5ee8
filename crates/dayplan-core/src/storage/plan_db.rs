//! SQLite-based storage for day plans and commute rules.
//!
//! Day plans are keyed by `date_iso`, commute rules by `id`. Both are stored as
//! JSON payloads; instants serialize as RFC 3339 strings, so a round trip is
//! lossless.

use chrono::{FixedOffset, NaiveDate, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;
use tracing::info;

use super::data_dir;
use super::migrations;
use crate::error::{DatabaseError, Result};
use crate::plan::{CommuteRule, DayPlan};
use crate::seed::{seed_day_plan, seed_rule};

/// SQLite database for day plans and commute rules.
pub struct PlanDb {
    conn: Connection,
}

impl PlanDb {
    /// Open the database at `<data_dir>/dayplan.db`.
    ///
    /// Creates tables if they don't exist.
    ///
    /// # Errors
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open() -> Result<Self> {
        Self::open_at(&data_dir()?.join("dayplan.db"))
    }

    /// Open (or create) the database file at `path`.
    pub fn open_at(path: &Path) -> Result<Self> {
        let conn = Connection::open(path).map_err(|source| DatabaseError::OpenFailed {
            path: path.to_path_buf(),
            source,
        })?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        migrations::migrate(&conn)
            .map_err(|e| DatabaseError::MigrationFailed(e.to_string()))?;
        Ok(Self { conn })
    }

    // === DayPlan ===

    pub fn load_day_plan(&self, date_iso: &str) -> Result<Option<DayPlan>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM day_plans WHERE date_iso = ?1",
                params![date_iso],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    /// Insert or replace the plan for `plan.date_iso`.
    ///
    /// # Errors
    /// Rejects plans holding an event that ends before it starts.
    pub fn save_day_plan(&self, plan: &DayPlan) -> Result<()> {
        for event in &plan.events {
            event.validate()?;
        }
        let payload = serde_json::to_string(plan)?;
        self.conn.execute(
            "INSERT INTO day_plans (date_iso, payload, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(date_iso) DO UPDATE SET payload = excluded.payload, updated_at = excluded.updated_at",
            params![plan.date_iso, payload, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Dates with a stored plan, ascending.
    pub fn list_day_plan_dates(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT date_iso FROM day_plans ORDER BY date_iso")?;
        let dates = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dates)
    }

    // === CommuteRule CRUD ===

    /// All rules ordered by id.
    pub fn list_commute_rules(&self) -> Result<Vec<CommuteRule>> {
        let mut stmt = self
            .conn
            .prepare("SELECT payload FROM commute_rules ORDER BY id")?;
        let payloads = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        payloads
            .iter()
            .map(|json| serde_json::from_str(json).map_err(Into::into))
            .collect()
    }

    pub fn get_commute_rule(&self, id: &str) -> Result<Option<CommuteRule>> {
        let payload: Option<String> = self
            .conn
            .query_row(
                "SELECT payload FROM commute_rules WHERE id = ?1",
                params![id],
                |row| row.get(0),
            )
            .optional()?;

        match payload {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    pub fn upsert_commute_rule(&self, rule: &CommuteRule) -> Result<()> {
        let payload = serde_json::to_string(rule)?;
        self.conn.execute(
            "INSERT INTO commute_rules (id, name, payload, updated_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                payload = excluded.payload,
                updated_at = excluded.updated_at",
            params![rule.id, rule.name, payload, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Returns `true` when a rule was deleted.
    pub fn delete_commute_rule(&self, id: &str) -> Result<bool> {
        let deleted = self
            .conn
            .execute("DELETE FROM commute_rules WHERE id = ?1", params![id])?;
        Ok(deleted > 0)
    }

    pub fn count_commute_rules(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM commute_rules", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Write seed data when `date` has no plan or no rules exist yet.
    ///
    /// Returns `true` when seed data was written.
    pub fn ensure_seeded(&self, date: NaiveDate, offset: FixedOffset) -> Result<bool> {
        let date_iso = date.format("%Y-%m-%d").to_string();
        let has_plan = self.load_day_plan(&date_iso)?.is_some();
        let rule_count = self.count_commute_rules()?;

        if has_plan && rule_count > 0 {
            return Ok(false);
        }

        let rule = seed_rule();
        self.upsert_commute_rule(&rule)?;
        self.save_day_plan(&seed_day_plan(date, offset, &rule))?;

        info!(date = %date_iso, rule_id = %rule.id, "wrote seed data");
        Ok(true)
    }
}
