//! Database schema migrations for dayplan.
//!
//! Migrations are versioned and applied automatically when opening the database.
//! The `schema_version` table tracks the current migration version.

use rusqlite::{Connection, Result as SqliteResult};

/// Current schema version.
pub const SCHEMA_VERSION: i32 = 2;

/// Apply all pending migrations to bring the database to the current schema version.
///
/// # Errors
/// Returns an error if migration fails.
pub fn migrate(conn: &Connection) -> SqliteResult<()> {
    create_schema_version_table(conn)?;

    let current_version = get_schema_version(conn);

    if current_version < 1 {
        migrate_v1(conn)?;
    }
    if current_version < 2 {
        migrate_v2(conn)?;
    }

    Ok(())
}

fn create_schema_version_table(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY
        );",
    )
}

/// Get the current schema version from the database.
///
/// Returns 0 if no version is set (initial database).
pub fn get_schema_version(conn: &Connection) -> i32 {
    conn.query_row("SELECT version FROM schema_version", [], |row| {
        row.get::<_, i32>(0)
    })
    .unwrap_or_else(|e| {
        if !matches!(e, rusqlite::Error::QueryReturnedNoRows) {
            tracing::warn!(error = %e, "failed to read schema_version");
        }
        0
    })
}

fn set_schema_version(conn: &Connection, version: i32) -> SqliteResult<()> {
    conn.execute("DELETE FROM schema_version", [])?;
    conn.execute("INSERT INTO schema_version (version) VALUES (?1)", [version])?;
    Ok(())
}

/// Migration v1: day plans keyed by date and commute rules keyed by id,
/// both stored as JSON payloads.
fn migrate_v1(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "CREATE TABLE IF NOT EXISTS day_plans (
            date_iso TEXT PRIMARY KEY,
            payload  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS commute_rules (
            id      TEXT PRIMARY KEY,
            payload TEXT NOT NULL
        );",
    )?;

    set_schema_version(&tx, 1)?;
    tx.commit()
}

/// Migration v2: bookkeeping columns.
///
/// Adds:
/// - day_plans.updated_at
/// - commute_rules.name (backfilled from the payload) and commute_rules.updated_at
fn migrate_v2(conn: &Connection) -> SqliteResult<()> {
    let tx = conn.unchecked_transaction()?;

    tx.execute_batch(
        "ALTER TABLE day_plans ADD COLUMN updated_at TEXT NOT NULL DEFAULT '';
         ALTER TABLE commute_rules ADD COLUMN name TEXT NOT NULL DEFAULT '';
         ALTER TABLE commute_rules ADD COLUMN updated_at TEXT NOT NULL DEFAULT '';",
    )?;

    tx.execute(
        "UPDATE commute_rules
         SET name = COALESCE(json_extract(payload, '$.name'), '')
         WHERE name = ''",
        [],
    )?;

    set_schema_version(&tx, 2)?;
    tx.commit()
}
