//! Core data models for the timesheet engine.
//!
//! This module contains the domain records that are persisted by the
//! stores and exchanged over the API.

mod company;
mod hourly_rate;
mod time_entry;
mod weekly_report;

pub use company::{Company, NewCompany};
pub use hourly_rate::{HourlyRate, MAX_DAY_OF_WEEK, RateTable, RateUpsert};
pub use time_entry::{TimeEntry, TimeEntryFields};
pub use weekly_report::{DailySummary, WeeklyReport};
