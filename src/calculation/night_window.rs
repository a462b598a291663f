//! Night-shift classification.
//!
//! The night window is a local time range, 22:00 to 06:00 by default,
//! anchored to the local calendar date a shift starts on. A shift is a
//! night shift when its absolute interval meets that window, or, for a
//! window that crosses midnight, when it starts before the previous
//! night's window closes on the same date.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

use super::clock::ZoneClock;

/// Local start and end of the night window.
///
/// When `end` is not after `start` the window closes on the following day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct NightWindow {
    /// Local time the window opens.
    pub start: NaiveTime,
    /// Local time the window closes.
    pub end: NaiveTime,
}

impl Default for NightWindow {
    fn default() -> Self {
        Self {
            start: NaiveTime::from_hms_opt(22, 0, 0).unwrap_or(NaiveTime::MIN),
            end: NaiveTime::from_hms_opt(6, 0, 0).unwrap_or(NaiveTime::MIN),
        }
    }
}

impl NightWindow {
    /// Resolves the window for a shift starting on `date` to absolute instants.
    pub fn bounds(
        &self,
        date: NaiveDate,
        clock: &ZoneClock,
    ) -> EngineResult<(DateTime<Utc>, DateTime<Utc>)> {
        let end_date = if self.crosses_midnight() {
            date.checked_add_days(Days::new(1))
                .ok_or_else(|| EngineError::invalid("date", "is out of range"))?
        } else {
            date
        };

        let night_start = clock.to_absolute(date.and_time(self.start))?;
        let night_end = clock.to_absolute(end_date.and_time(self.end))?;
        Ok((night_start, night_end))
    }

    /// Returns true if the shift `[start, end)` meets a night window.
    ///
    /// Both the window opening on `date` and, when the window crosses
    /// midnight, the one closing on `date` are checked. A shift that ends
    /// exactly when a window opens counts as a night shift; one that starts
    /// exactly when a window closes does not.
    ///
    /// # Example
    ///
    /// ```
    /// use timesheet_engine::calculation::{NightWindow, ZoneClock};
    /// use chrono::{NaiveDate, NaiveDateTime};
    ///
    /// let clock = ZoneClock::new("UTC").unwrap();
    /// let date = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    /// let at = |s: &str| {
    ///     clock
    ///         .to_absolute(NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap())
    ///         .unwrap()
    /// };
    ///
    /// let window = NightWindow::default();
    /// assert!(window
    ///     .is_night_shift(date, at("2026-01-15 21:00"), at("2026-01-15 23:00"), &clock)
    ///     .unwrap());
    /// assert!(window
    ///     .is_night_shift(date, at("2026-01-15 01:00"), at("2026-01-15 05:00"), &clock)
    ///     .unwrap());
    /// assert!(!window
    ///     .is_night_shift(date, at("2026-01-15 06:00"), at("2026-01-15 14:00"), &clock)
    ///     .unwrap());
    /// ```
    pub fn is_night_shift(
        &self,
        date: NaiveDate,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        clock: &ZoneClock,
    ) -> EngineResult<bool> {
        let (night_start, night_end) = self.bounds(date, clock)?;
        if start < night_end && end >= night_start {
            return Ok(true);
        }

        if self.crosses_midnight() {
            // The previous night's window opened before local midnight, so any
            // shift starting on `date` already began after it opened.
            let early_end = clock.to_absolute(date.and_time(self.end))?;
            return Ok(start < early_end);
        }

        Ok(false)
    }

    /// True when the window closes on the day after it opens.
    pub fn crosses_midnight(&self) -> bool {
        self.end <= self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn make_date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn at(clock: &ZoneClock, s: &str) -> DateTime<Utc> {
        clock
            .to_absolute(NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap())
            .unwrap()
    }

    fn classify(clock: &ZoneClock, start: &str, end: &str) -> bool {
        NightWindow::default()
            .is_night_shift(
                make_date("2026-01-15"),
                at(clock, start),
                at(clock, end),
                clock,
            )
            .unwrap()
    }

    #[test]
    fn test_default_window_is_22_to_06() {
        let window = NightWindow::default();
        assert_eq!(window.start, NaiveTime::from_hms_opt(22, 0, 0).unwrap());
        assert_eq!(window.end, NaiveTime::from_hms_opt(6, 0, 0).unwrap());
    }

    #[test]
    fn test_bounds_cross_midnight() {
        let clock = ZoneClock::new("UTC").unwrap();
        let (start, end) = NightWindow::default()
            .bounds(make_date("2026-01-15"), &clock)
            .unwrap();
        assert_eq!(start, at(&clock, "2026-01-15 22:00"));
        assert_eq!(end, at(&clock, "2026-01-16 06:00"));
    }

    #[test]
    fn test_bounds_same_day_window() {
        let clock = ZoneClock::new("UTC").unwrap();
        let window = NightWindow {
            start: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(5, 0, 0).unwrap(),
        };
        let (start, end) = window.bounds(make_date("2026-01-15"), &clock).unwrap();
        assert_eq!(start, at(&clock, "2026-01-15 00:00"));
        assert_eq!(end, at(&clock, "2026-01-15 05:00"));
    }

    #[test]
    fn test_evening_overlap_is_night() {
        let clock = ZoneClock::new("UTC").unwrap();
        assert!(classify(&clock, "2026-01-15 21:00", "2026-01-15 23:00"));
    }

    #[test]
    fn test_daytime_shift_is_day() {
        let clock = ZoneClock::new("UTC").unwrap();
        assert!(!classify(&clock, "2026-01-15 06:00", "2026-01-15 14:00"));
        assert!(!classify(&clock, "2026-01-15 09:00", "2026-01-15 17:00"));
    }

    #[test]
    fn test_ending_at_window_open_is_night() {
        let clock = ZoneClock::new("UTC").unwrap();
        assert!(classify(&clock, "2026-01-15 14:00", "2026-01-15 22:00"));
    }

    #[test]
    fn test_starting_at_window_close_is_day() {
        let clock = ZoneClock::new("UTC").unwrap();
        assert!(!classify(&clock, "2026-01-16 06:00", "2026-01-16 10:00"));
    }

    #[test]
    fn test_fully_inside_window_is_night() {
        let clock = ZoneClock::new("UTC").unwrap();
        assert!(classify(&clock, "2026-01-15 23:00", "2026-01-16 05:00"));
    }

    #[test]
    fn test_early_morning_shift_is_night() {
        let clock = ZoneClock::new("UTC").unwrap();
        assert!(classify(&clock, "2026-01-15 01:00", "2026-01-15 05:00"));
        assert!(classify(&clock, "2026-01-15 00:00", "2026-01-15 06:00"));
        assert!(classify(&clock, "2026-01-15 05:30", "2026-01-15 13:00"));
    }

    #[test]
    fn test_starting_at_early_window_close_is_day() {
        let clock = ZoneClock::new("UTC").unwrap();
        assert!(!classify(&clock, "2026-01-15 06:00", "2026-01-15 14:00"));
        assert!(!classify(&clock, "2026-01-15 07:00", "2026-01-15 15:00"));
    }

    #[test]
    fn test_same_day_window_has_no_early_counterpart() {
        let clock = ZoneClock::new("UTC").unwrap();
        let window = NightWindow {
            start: NaiveTime::from_hms_opt(0, 0, 0).unwrap(),
            end: NaiveTime::from_hms_opt(5, 0, 0).unwrap(),
        };
        assert!(!window.crosses_midnight());
        let date = make_date("2026-01-15");
        assert!(window
            .is_night_shift(date, at(&clock, "2026-01-15 04:00"), at(&clock, "2026-01-15 08:00"), &clock)
            .unwrap());
        assert!(!window
            .is_night_shift(date, at(&clock, "2026-01-15 05:00"), at(&clock, "2026-01-15 08:00"), &clock)
            .unwrap());
    }

    #[test]
    fn test_early_morning_window_is_local() {
        // 01:00-05:00 Adelaide is 14:30-18:30 UTC the previous day
        let clock = ZoneClock::new("Australia/Adelaide").unwrap();
        assert!(classify(&clock, "2026-01-15 01:00", "2026-01-15 05:00"));
    }

    #[test]
    fn test_window_is_local_not_utc() {
        // 21:00-23:00 Adelaide is 10:30-12:30 UTC, still a night shift locally
        let clock = ZoneClock::new("Australia/Adelaide").unwrap();
        assert!(classify(&clock, "2026-01-15 21:00", "2026-01-15 23:00"));
        // 09:00-17:00 Adelaide starts at 22:30 UTC but is a day shift locally
        assert!(!classify(&clock, "2026-01-15 09:00", "2026-01-15 17:00"));
    }
}
