//! Time entry (shift) model.
//!
//! A time entry stores a shift exactly as it was computed at submission:
//! absolute start/end instants, the local entry date, and the rounded
//! duration and earnings. Reports read these values back verbatim.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A stored shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeEntry {
    /// Unique identifier for the entry.
    pub id: String,
    /// The owning user.
    pub user_id: String,
    /// The company the shift was worked for.
    pub company_id: String,
    /// Absolute start of the shift.
    pub start: DateTime<Utc>,
    /// Absolute end of the shift (already advanced for overnight shifts).
    pub end: DateTime<Utc>,
    /// The local calendar day the shift is attributed to.
    pub entry_date: NaiveDate,
    /// Unpaid break length in minutes.
    pub break_minutes: u32,
    /// Worked hours, rounded to two decimal places.
    pub total_time: Decimal,
    /// Earnings, rounded to two decimal places.
    pub earnings: Decimal,
    /// Whether the shift touched the night window.
    pub is_night_shift: bool,
    /// When the entry was first stored.
    pub created_at: DateTime<Utc>,
    /// When the entry was last written.
    pub updated_at: DateTime<Utc>,
}

/// The computed fields written by a shift upsert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeEntryFields {
    /// The company the shift was worked for.
    pub company_id: String,
    /// Absolute start of the shift.
    pub start: DateTime<Utc>,
    /// Absolute end of the shift.
    pub end: DateTime<Utc>,
    /// The local calendar day the shift is attributed to.
    pub entry_date: NaiveDate,
    /// Unpaid break length in minutes.
    pub break_minutes: u32,
    /// Worked hours, rounded to two decimal places.
    pub total_time: Decimal,
    /// Earnings, rounded to two decimal places.
    pub earnings: Decimal,
    /// Whether the shift touched the night window.
    pub is_night_shift: bool,
}
