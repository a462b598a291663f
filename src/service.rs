//! Timesheet operations.
//!
//! [`TimesheetService`] checks input and ownership, runs the earnings
//! calculation and persists the result. The store and calculation
//! settings are injected, so the service holds no global state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calculation::{
    ShiftEarnings, ShiftEarningsCalculator, ShiftInput, ZoneClock, week_bounds,
};
use crate::config::CalculationSettings;
use crate::error::{EngineError, EngineResult};
use crate::models::{
    Company, HourlyRate, NewCompany, RateUpsert, TimeEntry, TimeEntryFields, WeeklyReport,
};
use crate::store::TimesheetStore;

/// A shift submission, in local wall-clock terms.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeEntrySubmission {
    /// Entry to overwrite. Without it the (company, start) key decides.
    pub id: Option<String>,
    /// The company the shift was worked for.
    pub company_id: String,
    /// Local date the shift starts on.
    pub date: NaiveDate,
    /// Local start time, `HH:MM` or `HH:MM:SS`.
    pub start_time: String,
    /// Local end time, `HH:MM` or `HH:MM:SS`.
    pub end_time: String,
    /// Unpaid break; the configured default applies when absent.
    pub break_minutes: Option<u32>,
    /// Forces the end onto the following day.
    pub overnight: bool,
    /// IANA zone overriding the configured one for this submission.
    pub timezone: Option<String>,
}

/// A stored entry together with the calculation that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedShift {
    /// The persisted entry.
    pub entry: TimeEntry,
    /// The calculation summary.
    pub calculation: ShiftEarnings,
}

/// Orchestrates companies, rates and time entries for authenticated users.
pub struct TimesheetService<S> {
    store: S,
    settings: CalculationSettings,
}

impl<S: TimesheetStore> TimesheetService<S> {
    /// Creates a service over `store` using `settings` for every calculation.
    pub fn new(store: S, settings: CalculationSettings) -> Self {
        Self { store, settings }
    }

    /// The calculation settings in effect.
    pub fn settings(&self) -> &CalculationSettings {
        &self.settings
    }

    /// Registers a company for the user.
    pub fn create_company(&self, user_id: &str, company: NewCompany) -> EngineResult<Company> {
        let user_id = require_user(user_id)?;
        let company = company.normalized()?;
        let created = self.store.create_company(user_id, &company)?;
        info!(company_id = %created.id, "Company created");
        Ok(created)
    }

    /// Lists the user's companies, newest first.
    pub fn list_companies(&self, user_id: &str) -> EngineResult<Vec<Company>> {
        self.store.list_companies(require_user(user_id)?)
    }

    /// Deletes a company and everything recorded against it.
    pub fn delete_company(&self, user_id: &str, id: &str) -> EngineResult<Company> {
        let deleted = self
            .store
            .delete_company(require_user(user_id)?, id)?
            .ok_or_else(|| EngineError::CompanyNotFound { id: id.to_string() })?;
        info!(company_id = %id, "Company deleted");
        Ok(deleted)
    }

    /// Lists the user's rates, optionally for one company.
    pub fn list_rates(
        &self,
        user_id: &str,
        company_id: Option<&str>,
    ) -> EngineResult<Vec<HourlyRate>> {
        let user_id = require_user(user_id)?;
        if let Some(company_id) = company_id {
            self.require_company(user_id, company_id)?;
        }
        self.store.list_rates(user_id, company_id)
    }

    /// Creates or overwrites one rate.
    pub fn upsert_rate(&self, user_id: &str, rate: RateUpsert) -> EngineResult<HourlyRate> {
        let user_id = require_user(user_id)?;
        rate.validate()?;
        self.require_company(user_id, &rate.company_id)?;

        let stored = self.store.upsert_rate(user_id, &rate)?;
        info!(
            company_id = %stored.company_id,
            day_of_week = stored.day_of_week,
            is_night_shift = stored.is_night_shift,
            rate = %stored.rate,
            "Hourly rate saved"
        );
        Ok(stored)
    }

    /// Calculates and stores a shift.
    ///
    /// With an `id` the named entry is overwritten; otherwise the entry with
    /// the same company and start instant is overwritten, or a new one is
    /// created.
    pub fn upsert_time_entry(
        &self,
        user_id: &str,
        submission: TimeEntrySubmission,
    ) -> EngineResult<RecordedShift> {
        let user_id = require_user(user_id)?;
        if submission.company_id.trim().is_empty() {
            return Err(EngineError::invalid("company_id", "must not be blank"));
        }
        self.require_company(user_id, &submission.company_id)?;

        let clock = match submission.timezone.as_deref() {
            Some(name) if !name.trim().is_empty() => ZoneClock::new(name)?,
            _ => self.settings.clock,
        };
        let calculator = ShiftEarningsCalculator::new(clock, self.settings.night_window);

        let input = ShiftInput {
            date: submission.date,
            start_time: submission.start_time,
            end_time: submission.end_time,
            break_minutes: submission
                .break_minutes
                .unwrap_or(self.settings.default_break_minutes),
            overnight: submission.overnight,
        };
        let rates = self.store.rate_table(user_id, &submission.company_id)?;
        let calculation = calculator.calculate(&input, &rates)?;

        let fields = TimeEntryFields {
            company_id: submission.company_id,
            start: calculation.start,
            end: calculation.end,
            entry_date: calculation.entry_date,
            break_minutes: input.break_minutes,
            total_time: calculation.duration_hours,
            earnings: calculation.earnings,
            is_night_shift: calculation.is_night_shift,
        };

        let entry = match submission.id.as_deref() {
            Some(id) => self
                .store
                .update_shift(user_id, id, &fields)?
                .ok_or_else(|| EngineError::TimeEntryNotFound { id: id.to_string() })?,
            None => self.store.upsert_shift(user_id, &fields)?,
        };

        info!(
            entry_id = %entry.id,
            company_id = %entry.company_id,
            total_time = %entry.total_time,
            earnings = %entry.earnings,
            is_night_shift = entry.is_night_shift,
            rate_missing = calculation.rate_missing,
            "Time entry saved"
        );
        Ok(RecordedShift { entry, calculation })
    }

    /// Lists all of the user's entries, newest first.
    pub fn list_time_entries(&self, user_id: &str) -> EngineResult<Vec<TimeEntry>> {
        self.store.list_shifts(require_user(user_id)?)
    }

    /// Lists the entries in the Monday-to-Sunday week containing `date`, oldest first.
    pub fn list_week(&self, user_id: &str, date: NaiveDate) -> EngineResult<Vec<TimeEntry>> {
        let user_id = require_user(user_id)?;
        let (monday, sunday) = week_bounds(date)?;
        debug!(week_start = %monday, week_end = %sunday, "Listing week");
        self.store.list_shifts_between(user_id, monday, sunday)
    }

    /// Deletes one entry.
    pub fn delete_time_entry(&self, user_id: &str, id: &str) -> EngineResult<TimeEntry> {
        let deleted = self
            .store
            .delete_shift(require_user(user_id)?, id)?
            .ok_or_else(|| EngineError::TimeEntryNotFound { id: id.to_string() })?;
        info!(entry_id = %id, "Time entry deleted");
        Ok(deleted)
    }

    /// Summarises the week containing `date`, or the current week when absent.
    pub fn weekly_report(
        &self,
        user_id: &str,
        date: Option<NaiveDate>,
    ) -> EngineResult<WeeklyReport> {
        let date = date.unwrap_or_else(|| self.settings.clock.today());
        let entries = self.list_week(user_id, date)?;
        let (monday, _) = week_bounds(date)?;
        Ok(WeeklyReport::from_entries(monday, &entries))
    }

    fn require_company(&self, user_id: &str, company_id: &str) -> EngineResult<Company> {
        self.store
            .get_company(user_id, company_id)?
            .ok_or_else(|| EngineError::CompanyNotFound {
                id: company_id.to_string(),
            })
    }
}

fn require_user(user_id: &str) -> EngineResult<&str> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(EngineError::Unauthorized);
    }
    Ok(trimmed)
}
