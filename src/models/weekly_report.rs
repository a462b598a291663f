//! Weekly earnings report.
//!
//! Aggregates stored time entries into per-day and per-week totals. Only
//! the persisted `total_time` and `earnings` values are summed; nothing is
//! recalculated from the raw timestamps.

use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::TimeEntry;

/// Totals for a single calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailySummary {
    /// The entry date.
    pub date: NaiveDate,
    /// Sum of worked hours attributed to the day.
    pub total_hours: Decimal,
    /// Sum of earnings attributed to the day.
    pub total_earnings: Decimal,
    /// Number of entries attributed to the day.
    pub entry_count: usize,
}

impl DailySummary {
    fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            total_hours: Decimal::ZERO,
            total_earnings: Decimal::ZERO,
            entry_count: 0,
        }
    }
}

/// Hours and earnings for one Monday-to-Sunday week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyReport {
    /// The Monday that opens the week.
    pub week_start: NaiveDate,
    /// The Sunday that closes the week.
    pub week_end: NaiveDate,
    /// Sum of worked hours across the week.
    pub total_hours: Decimal,
    /// Sum of earnings across the week.
    pub total_earnings: Decimal,
    /// Number of entries in the week.
    pub entry_count: usize,
    /// One summary per day, Monday first, including days without entries.
    pub days: Vec<DailySummary>,
}

impl WeeklyReport {
    /// Builds a report for the week opening on `week_start`.
    ///
    /// Entries whose `entry_date` falls outside the week are ignored.
    pub fn from_entries(week_start: NaiveDate, entries: &[TimeEntry]) -> Self {
        let mut days: Vec<DailySummary> = (0..7)
            .filter_map(|offset| week_start.checked_add_days(Days::new(offset)))
            .map(DailySummary::empty)
            .collect();
        let week_end = days.last().map(|d| d.date).unwrap_or(week_start);

        for entry in entries {
            if let Some(day) = days.iter_mut().find(|d| d.date == entry.entry_date) {
                day.total_hours += entry.total_time;
                day.total_earnings += entry.earnings;
                day.entry_count += 1;
            }
        }

        let total_hours = days.iter().map(|d| d.total_hours).sum();
        let total_earnings = days.iter().map(|d| d.total_earnings).sum();
        let entry_count = days.iter().map(|d| d.entry_count).sum();

        Self {
            week_start,
            week_end,
            total_hours,
            total_earnings,
            entry_count,
            days,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(id: &str, date: &str, hours: &str, earnings: &str) -> TimeEntry {
        let at: DateTime<Utc> = DateTime::parse_from_rfc3339("2026-01-12T09:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        TimeEntry {
            id: id.to_string(),
            user_id: "u-1".to_string(),
            company_id: "c-1".to_string(),
            start: at,
            end: at,
            entry_date: make_date(date),
            break_minutes: 0,
            total_time: dec(hours),
            earnings: dec(earnings),
            is_night_shift: false,
            created_at: at,
            updated_at: at,
        }
    }

    #[test]
    fn test_empty_week_has_seven_zero_days() {
        let report = WeeklyReport::from_entries(make_date("2026-01-12"), &[]);

        assert_eq!(report.week_end, make_date("2026-01-18"));
        assert_eq!(report.days.len(), 7);
        assert_eq!(report.total_hours, Decimal::ZERO);
        assert_eq!(report.total_earnings, Decimal::ZERO);
        assert_eq!(report.entry_count, 0);
    }

    #[test]
    fn test_totals_sum_stored_values() {
        let entries = vec![
            entry("a", "2026-01-12", "8.00", "240.00"),
            entry("b", "2026-01-12", "0.17", "5.56"),
            entry("c", "2026-01-18", "4.00", "150.00"),
        ];
        let report = WeeklyReport::from_entries(make_date("2026-01-12"), &entries);

        assert_eq!(report.total_hours, dec("12.17"));
        assert_eq!(report.total_earnings, dec("395.56"));
        assert_eq!(report.entry_count, 3);

        assert_eq!(report.days[0].entry_count, 2);
        assert_eq!(report.days[0].total_hours, dec("8.17"));
        assert_eq!(report.days[6].total_earnings, dec("150.00"));
    }

    #[test]
    fn test_entries_outside_week_ignored() {
        let entries = vec![
            entry("a", "2026-01-11", "8.00", "240.00"),
            entry("b", "2026-01-19", "8.00", "240.00"),
        ];
        let report = WeeklyReport::from_entries(make_date("2026-01-12"), &entries);

        assert_eq!(report.entry_count, 0);
        assert_eq!(report.total_earnings, Decimal::ZERO);
    }
}
