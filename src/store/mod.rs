//! Persistence traits and the SQLite implementation.
//!
//! Every operation is scoped to the acting user. A record owned by another
//! user is indistinguishable from a missing one: lookups return `None`.

mod migrate;
mod sqlite;

use chrono::NaiveDate;

use crate::error::EngineResult;
use crate::models::{
    Company, HourlyRate, NewCompany, RateTable, RateUpsert, TimeEntry, TimeEntryFields,
};

pub use migrate::{SCHEMA_VERSION, run_migrations};
pub use sqlite::SqliteStore;

/// Storage for companies.
pub trait CompanyStore: Send + Sync {
    /// Inserts a new company owned by `user_id`.
    fn create_company(&self, user_id: &str, company: &NewCompany) -> EngineResult<Company>;

    /// Fetches one of the user's companies.
    fn get_company(&self, user_id: &str, id: &str) -> EngineResult<Option<Company>>;

    /// Lists the user's companies, newest first.
    fn list_companies(&self, user_id: &str) -> EngineResult<Vec<Company>>;

    /// Deletes a company along with its rates and time entries.
    fn delete_company(&self, user_id: &str, id: &str) -> EngineResult<Option<Company>>;
}

/// Storage for hourly rates.
pub trait RateStore: Send + Sync {
    /// Lists rates ordered by company, weekday and shift type.
    fn list_rates(&self, user_id: &str, company_id: Option<&str>) -> EngineResult<Vec<HourlyRate>>;

    /// Creates the rate, or overwrites it if the (company, weekday, shift type) key exists.
    fn upsert_rate(&self, user_id: &str, rate: &RateUpsert) -> EngineResult<HourlyRate>;

    /// Loads one company's rates for the calculator.
    fn rate_table(&self, user_id: &str, company_id: &str) -> EngineResult<RateTable>;
}

/// Storage for time entries.
pub trait ShiftStore: Send + Sync {
    /// Creates the entry, or overwrites the one with the same (company, start) key.
    fn upsert_shift(&self, user_id: &str, fields: &TimeEntryFields) -> EngineResult<TimeEntry>;

    /// Overwrites entry `id`.
    ///
    /// Fails with a conflict if the new key belongs to a different entry.
    fn update_shift(
        &self,
        user_id: &str,
        id: &str,
        fields: &TimeEntryFields,
    ) -> EngineResult<Option<TimeEntry>>;

    /// Fetches one of the user's entries.
    fn get_shift(&self, user_id: &str, id: &str) -> EngineResult<Option<TimeEntry>>;

    /// Lists all of the user's entries, newest start first.
    fn list_shifts(&self, user_id: &str) -> EngineResult<Vec<TimeEntry>>;

    /// Lists entries whose entry date lies in `[from, to]`, oldest start first.
    fn list_shifts_between(
        &self,
        user_id: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> EngineResult<Vec<TimeEntry>>;

    /// Deletes one of the user's entries.
    fn delete_shift(&self, user_id: &str, id: &str) -> EngineResult<Option<TimeEntry>>;
}

/// A store that covers every record type.
pub trait TimesheetStore: CompanyStore + RateStore + ShiftStore {}

impl<T> TimesheetStore for T where T: CompanyStore + RateStore + ShiftStore {}
