//! Monday-to-Sunday week bounds.

use chrono::{Datelike, Days, NaiveDate};

use crate::error::{EngineError, EngineResult};

/// Returns the Monday and Sunday of the week containing `date`.
///
/// # Examples
///
/// ```
/// use timesheet_engine::calculation::week_bounds;
/// use chrono::NaiveDate;
///
/// let thursday = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
/// let (monday, sunday) = week_bounds(thursday).unwrap();
/// assert_eq!(monday, NaiveDate::from_ymd_opt(2026, 1, 12).unwrap());
/// assert_eq!(sunday, NaiveDate::from_ymd_opt(2026, 1, 18).unwrap());
/// ```
pub fn week_bounds(date: NaiveDate) -> EngineResult<(NaiveDate, NaiveDate)> {
    let back = u64::from(date.weekday().num_days_from_monday());
    let monday = date
        .checked_sub_days(Days::new(back))
        .ok_or_else(|| EngineError::invalid("date", "is out of range"))?;
    let sunday = monday
        .checked_add_days(Days::new(6))
        .ok_or_else(|| EngineError::invalid("date", "is out of range"))?;
    Ok((monday, sunday))
}
