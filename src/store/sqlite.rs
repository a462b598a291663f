//! SQLite-backed store.
//!
//! One connection is shared behind a mutex. Decimals are stored as exact
//! strings, instants as RFC 3339 UTC strings with second precision and
//! dates as `YYYY-MM-DD`, so ordering by the text columns is chronological.

use std::path::Path;
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use rusqlite::types::Type;
use rusqlite::{Connection, ErrorCode, OptionalExtension, Row, params};
use rust_decimal::Decimal;
use tracing::debug;
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Company, HourlyRate, NewCompany, RateTable, RateUpsert, TimeEntry, TimeEntryFields,
};

use super::migrate::run_migrations;
use super::{CompanyStore, RateStore, ShiftStore};

const COMPANY_COLUMNS: &str = "id, user_id, name, address, phone, created_at";

const RATE_COLUMNS: &str = "user_id, company_id, day_of_week, is_night_shift, rate, updated_at";

const ENTRY_COLUMNS: &str = "id, user_id, company_id, start_at, end_at, entry_date, \
     break_minutes, total_time, earnings, is_night_shift, created_at, updated_at";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A [`CompanyStore`], [`RateStore`] and [`ShiftStore`] over one SQLite database.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (or creates) the database file at `path` and migrates it.
    pub fn open<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let conn = Connection::open(path.as_ref())?;
        Self::from_connection(conn)
    }

    /// Opens a private in-memory database, used by tests.
    pub fn open_in_memory() -> EngineResult<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> EngineResult<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> EngineResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| EngineError::Storage {
            message: "database connection lock poisoned".to_string(),
        })
    }

    fn select_shift_by_key(
        conn: &Connection,
        user_id: &str,
        company_id: &str,
        start: &str,
    ) -> EngineResult<TimeEntry> {
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM time_entries
             WHERE user_id = ?1 AND company_id = ?2 AND start_at = ?3"
        );
        Ok(conn.query_row(&sql, params![user_id, company_id, start], entry_from_row)?)
    }

    fn select_shift_by_id(
        conn: &Connection,
        user_id: &str,
        id: &str,
    ) -> EngineResult<Option<TimeEntry>> {
        let sql = format!("SELECT {ENTRY_COLUMNS} FROM time_entries WHERE id = ?1 AND user_id = ?2");
        Ok(conn
            .query_row(&sql, params![id, user_id], entry_from_row)
            .optional()?)
    }

    fn select_company(
        conn: &Connection,
        user_id: &str,
        id: &str,
    ) -> EngineResult<Option<Company>> {
        let sql = format!("SELECT {COMPANY_COLUMNS} FROM companies WHERE id = ?1 AND user_id = ?2");
        Ok(conn
            .query_row(&sql, params![id, user_id], company_from_row)
            .optional()?)
    }
}

impl CompanyStore for SqliteStore {
    fn create_company(&self, user_id: &str, company: &NewCompany) -> EngineResult<Company> {
        let record = Company {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            name: company.name.clone(),
            address: company.address.clone(),
            phone: company.phone.clone(),
            created_at: now(),
        };

        self.conn()?.execute(
            "INSERT INTO companies (id, user_id, name, address, phone, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                record.id,
                record.user_id,
                record.name,
                record.address,
                record.phone,
                format_instant(&record.created_at),
            ],
        )?;

        debug!(company_id = %record.id, "Inserted company");
        Ok(record)
    }

    fn get_company(&self, user_id: &str, id: &str) -> EngineResult<Option<Company>> {
        let conn = self.conn()?;
        Self::select_company(&conn, user_id, id)
    }

    fn list_companies(&self, user_id: &str) -> EngineResult<Vec<Company>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {COMPANY_COLUMNS} FROM companies
             WHERE user_id = ?1
             ORDER BY created_at DESC, rowid DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([user_id], company_from_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn delete_company(&self, user_id: &str, id: &str) -> EngineResult<Option<Company>> {
        let conn = self.conn()?;
        let Some(company) = Self::select_company(&conn, user_id, id)? else {
            return Ok(None);
        };

        conn.execute(
            "DELETE FROM companies WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        debug!(company_id = %id, "Deleted company and dependent records");
        Ok(Some(company))
    }
}

impl RateStore for SqliteStore {
    fn list_rates(&self, user_id: &str, company_id: Option<&str>) -> EngineResult<Vec<HourlyRate>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {RATE_COLUMNS} FROM hourly_rates
             WHERE user_id = ?1 AND (?2 IS NULL OR company_id = ?2)
             ORDER BY company_id, day_of_week, is_night_shift"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params![user_id, company_id], rate_from_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn upsert_rate(&self, user_id: &str, rate: &RateUpsert) -> EngineResult<HourlyRate> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO hourly_rates
                 (user_id, company_id, day_of_week, is_night_shift, rate, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(user_id, company_id, day_of_week, is_night_shift)
             DO UPDATE SET rate = excluded.rate, updated_at = excluded.updated_at",
            params![
                user_id,
                rate.company_id,
                rate.day_of_week,
                rate.is_night_shift,
                rate.rate.to_string(),
                format_instant(&now()),
            ],
        )?;

        let sql = format!(
            "SELECT {RATE_COLUMNS} FROM hourly_rates
             WHERE user_id = ?1 AND company_id = ?2 AND day_of_week = ?3 AND is_night_shift = ?4"
        );
        Ok(conn.query_row(
            &sql,
            params![user_id, rate.company_id, rate.day_of_week, rate.is_night_shift],
            rate_from_row,
        )?)
    }

    fn rate_table(&self, user_id: &str, company_id: &str) -> EngineResult<RateTable> {
        Ok(self
            .list_rates(user_id, Some(company_id))?
            .into_iter()
            .collect())
    }
}

impl ShiftStore for SqliteStore {
    fn upsert_shift(&self, user_id: &str, fields: &TimeEntryFields) -> EngineResult<TimeEntry> {
        let conn = self.conn()?;
        let start = format_instant(&fields.start);
        let stamp = format_instant(&now());

        conn.execute(
            "INSERT INTO time_entries
                 (id, user_id, company_id, start_at, end_at, entry_date, break_minutes,
                  total_time, earnings, is_night_shift, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?11)
             ON CONFLICT(user_id, company_id, start_at) DO UPDATE SET
                 end_at = excluded.end_at,
                 entry_date = excluded.entry_date,
                 break_minutes = excluded.break_minutes,
                 total_time = excluded.total_time,
                 earnings = excluded.earnings,
                 is_night_shift = excluded.is_night_shift,
                 updated_at = excluded.updated_at",
            params![
                Uuid::new_v4().to_string(),
                user_id,
                fields.company_id,
                start,
                format_instant(&fields.end),
                fields.entry_date.format(DATE_FORMAT).to_string(),
                fields.break_minutes,
                fields.total_time.to_string(),
                fields.earnings.to_string(),
                fields.is_night_shift,
                stamp,
            ],
        )?;

        Self::select_shift_by_key(&conn, user_id, &fields.company_id, &start)
    }

    fn update_shift(
        &self,
        user_id: &str,
        id: &str,
        fields: &TimeEntryFields,
    ) -> EngineResult<Option<TimeEntry>> {
        let conn = self.conn()?;
        let changed = conn
            .execute(
                "UPDATE time_entries SET
                     company_id = ?3,
                     start_at = ?4,
                     end_at = ?5,
                     entry_date = ?6,
                     break_minutes = ?7,
                     total_time = ?8,
                     earnings = ?9,
                     is_night_shift = ?10,
                     updated_at = ?11
                 WHERE id = ?1 AND user_id = ?2",
                params![
                    id,
                    user_id,
                    fields.company_id,
                    format_instant(&fields.start),
                    format_instant(&fields.end),
                    fields.entry_date.format(DATE_FORMAT).to_string(),
                    fields.break_minutes,
                    fields.total_time.to_string(),
                    fields.earnings.to_string(),
                    fields.is_night_shift,
                    format_instant(&now()),
                ],
            )
            .map_err(|e| unique_violation_to_conflict(e, &fields.start))?;

        if changed == 0 {
            return Ok(None);
        }
        Self::select_shift_by_id(&conn, user_id, id)
    }

    fn get_shift(&self, user_id: &str, id: &str) -> EngineResult<Option<TimeEntry>> {
        let conn = self.conn()?;
        Self::select_shift_by_id(&conn, user_id, id)
    }

    fn list_shifts(&self, user_id: &str) -> EngineResult<Vec<TimeEntry>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM time_entries
             WHERE user_id = ?1
             ORDER BY start_at DESC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([user_id], entry_from_row)?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn list_shifts_between(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<TimeEntry>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {ENTRY_COLUMNS} FROM time_entries
             WHERE user_id = ?1 AND entry_date BETWEEN ?2 AND ?3
             ORDER BY start_at ASC"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                user_id,
                from.format(DATE_FORMAT).to_string(),
                to.format(DATE_FORMAT).to_string(),
            ],
            entry_from_row,
        )?;

        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    fn delete_shift(&self, user_id: &str, id: &str) -> EngineResult<Option<TimeEntry>> {
        let conn = self.conn()?;
        let Some(entry) = Self::select_shift_by_id(&conn, user_id, id)? else {
            return Ok(None);
        };

        conn.execute(
            "DELETE FROM time_entries WHERE id = ?1 AND user_id = ?2",
            params![id, user_id],
        )?;
        Ok(Some(entry))
    }
}

fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(0)
}

fn format_instant(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Secs, true)
}

fn unique_violation_to_conflict(error: rusqlite::Error, start: &DateTime<Utc>) -> EngineError {
    match error {
        rusqlite::Error::SqliteFailure(ref failure, _)
            if failure.code == ErrorCode::ConstraintViolation
                && failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
        {
            EngineError::Conflict {
                message: format!(
                    "another time entry already starts at {} for this company",
                    format_instant(start)
                ),
            }
        }
        other => other.into(),
    }
}

/// Reads a text column and converts it, reporting bad data as a conversion failure.
fn parse_column<T>(
    row: &Row,
    column: &str,
    parse: impl FnOnce(&str) -> Option<T>,
) -> rusqlite::Result<T> {
    let raw: String = row.get(column)?;
    parse(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            Type::Text,
            Box::new(EngineError::Storage {
                message: format!("invalid {} value: {}", column, raw),
            }),
        )
    })
}

fn decimal_column(row: &Row, column: &str) -> rusqlite::Result<Decimal> {
    parse_column(row, column, |s| Decimal::from_str(s).ok())
}

fn instant_column(row: &Row, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    parse_column(row, column, |s| {
        DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

fn date_column(row: &Row, column: &str) -> rusqlite::Result<NaiveDate> {
    parse_column(row, column, |s| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
}

fn company_from_row(row: &Row) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        address: row.get("address")?,
        phone: row.get("phone")?,
        created_at: instant_column(row, "created_at")?,
    })
}

fn rate_from_row(row: &Row) -> rusqlite::Result<HourlyRate> {
    Ok(HourlyRate {
        user_id: row.get("user_id")?,
        company_id: row.get("company_id")?,
        day_of_week: row.get("day_of_week")?,
        is_night_shift: row.get("is_night_shift")?,
        rate: decimal_column(row, "rate")?,
        updated_at: instant_column(row, "updated_at")?,
    })
}

fn entry_from_row(row: &Row) -> rusqlite::Result<TimeEntry> {
    Ok(TimeEntry {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        company_id: row.get("company_id")?,
        start: instant_column(row, "start_at")?,
        end: instant_column(row, "end_at")?,
        entry_date: date_column(row, "entry_date")?,
        break_minutes: row.get("break_minutes")?,
        total_time: decimal_column(row, "total_time")?,
        earnings: decimal_column(row, "earnings")?,
        is_night_shift: row.get("is_night_shift")?,
        created_at: instant_column(row, "created_at")?,
        updated_at: instant_column(row, "updated_at")?,
    })
}
