//! Schema creation and upgrades, tracked with `PRAGMA user_version`.

use rusqlite::Connection;
use tracing::info;

/// The schema version this build writes.
pub const SCHEMA_VERSION: i32 = 1;

const SCHEMA_V1: &str = r#"
    CREATE TABLE IF NOT EXISTS companies (
        id          TEXT PRIMARY KEY,
        user_id     TEXT NOT NULL,
        name        TEXT NOT NULL,
        address     TEXT,
        phone       TEXT,
        created_at  TEXT NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_companies_user ON companies(user_id, created_at);

    CREATE TABLE IF NOT EXISTS hourly_rates (
        user_id         TEXT NOT NULL,
        company_id      TEXT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
        day_of_week     INTEGER NOT NULL CHECK(day_of_week BETWEEN 0 AND 6),
        is_night_shift  INTEGER NOT NULL CHECK(is_night_shift IN (0, 1)),
        rate            TEXT NOT NULL,
        updated_at      TEXT NOT NULL,
        PRIMARY KEY (user_id, company_id, day_of_week, is_night_shift)
    );

    CREATE TABLE IF NOT EXISTS time_entries (
        id              TEXT PRIMARY KEY,
        user_id         TEXT NOT NULL,
        company_id      TEXT NOT NULL REFERENCES companies(id) ON DELETE CASCADE,
        start_at        TEXT NOT NULL,
        end_at          TEXT NOT NULL,
        entry_date      TEXT NOT NULL,
        break_minutes   INTEGER NOT NULL DEFAULT 0 CHECK(break_minutes >= 0),
        total_time      TEXT NOT NULL,
        earnings        TEXT NOT NULL,
        is_night_shift  INTEGER NOT NULL CHECK(is_night_shift IN (0, 1)),
        created_at      TEXT NOT NULL,
        updated_at      TEXT NOT NULL
    );

    CREATE UNIQUE INDEX IF NOT EXISTS idx_time_entries_key
        ON time_entries(user_id, company_id, start_at);
    CREATE INDEX IF NOT EXISTS idx_time_entries_date
        ON time_entries(user_id, entry_date);
"#;

/// Enables foreign keys and brings the schema up to [`SCHEMA_VERSION`].
pub fn run_migrations(conn: &Connection) -> rusqlite::Result<()> {
    conn.pragma_update(None, "foreign_keys", true)?;

    let version: i32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;
    if version >= SCHEMA_VERSION {
        return Ok(());
    }

    conn.execute_batch(SCHEMA_V1)?;
    conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;
    info!(from = version, to = SCHEMA_VERSION, "Database schema migrated");
    Ok(())
}
