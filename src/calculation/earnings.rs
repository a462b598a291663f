//! Shift duration and earnings calculation.
//!
//! This module turns a shift as the user sees it (a local date, two wall
//! clock times and a break) into the values that are persisted: absolute
//! start/end instants, worked hours, night classification and earnings.
//!
//! Rounding is applied once, at the end. Earnings are computed from the
//! exact worked milliseconds and the rate, then rounded half-up to cents;
//! the two-decimal duration is only for storage and display.

use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{EngineError, EngineResult};
use crate::models::RateTable;

use super::clock::ZoneClock;
use super::night_window::NightWindow;
use super::time_of_day::parse_time_of_day;

const MILLIS_PER_HOUR: i64 = 3_600_000;
const MILLIS_PER_MINUTE: i64 = 60_000;

/// Decimal places kept for stored hours and currency amounts.
pub const MONEY_DECIMAL_PLACES: u32 = 2;

/// Source of hourly rates for one company.
///
/// `day_of_week` is 0 for Sunday through 6 for Saturday.
pub trait RateLookup {
    /// Returns the hourly rate for the weekday and shift type, if one is set.
    fn rate(&self, day_of_week: u8, is_night_shift: bool) -> Option<Decimal>;
}

impl RateLookup for RateTable {
    fn rate(&self, day_of_week: u8, is_night_shift: bool) -> Option<Decimal> {
        self.get(day_of_week, is_night_shift)
    }
}

impl<F> RateLookup for F
where
    F: Fn(u8, bool) -> Option<Decimal>,
{
    fn rate(&self, day_of_week: u8, is_night_shift: bool) -> Option<Decimal> {
        self(day_of_week, is_night_shift)
    }
}

/// A shift as entered by the user, in local wall-clock terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShiftInput {
    /// The local calendar date the shift starts on.
    pub date: NaiveDate,
    /// Local start time, `HH:MM` or `HH:MM:SS`.
    pub start_time: String,
    /// Local end time, `HH:MM` or `HH:MM:SS`.
    pub end_time: String,
    /// Unpaid break in minutes.
    pub break_minutes: u32,
    /// Forces the end onto the following day even when it is after the start.
    pub overnight: bool,
}

/// The computed values for one shift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShiftEarnings {
    /// Absolute start of the shift.
    pub start: DateTime<Utc>,
    /// Absolute end of the shift, advanced a day for overnight shifts.
    pub end: DateTime<Utc>,
    /// The local calendar date the shift is attributed to.
    pub entry_date: NaiveDate,
    /// Weekday of the local start used for the rate lookup (0 = Sunday).
    pub day_of_week: u8,
    /// Whether the shift met the night window.
    pub is_night_shift: bool,
    /// Whether the end was moved onto the following day.
    pub is_overnight: bool,
    /// Worked hours after the break, rounded to two places.
    pub duration_hours: Decimal,
    /// The hourly rate applied, if one was found.
    pub rate: Option<Decimal>,
    /// True when no rate matched and earnings defaulted to zero.
    pub rate_missing: bool,
    /// Earnings rounded half-up to two places.
    pub earnings: Decimal,
}

/// Computes durations and earnings for shifts in one timezone.
///
/// # Example
///
/// ```
/// use timesheet_engine::calculation::{NightWindow, ShiftEarningsCalculator, ShiftInput, ZoneClock};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let calculator = ShiftEarningsCalculator::new(ZoneClock::new("UTC").unwrap(), NightWindow::default());
/// let shift = ShiftInput {
///     date: NaiveDate::from_ymd_opt(2026, 1, 15).unwrap(),
///     start_time: "22:00".to_string(),
///     end_time: "02:00".to_string(),
///     break_minutes: 0,
///     overnight: false,
/// };
///
/// let rates = |_day: u8, night: bool| night.then(|| Decimal::new(4000, 2));
/// let result = calculator.calculate(&shift, &rates).unwrap();
/// assert_eq!(result.duration_hours, Decimal::new(400, 2));
/// assert_eq!(result.earnings, Decimal::new(16000, 2));
/// assert!(result.is_overnight);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShiftEarningsCalculator {
    clock: ZoneClock,
    night_window: NightWindow,
}

impl ShiftEarningsCalculator {
    /// Creates a calculator for the given zone and night window.
    pub fn new(clock: ZoneClock, night_window: NightWindow) -> Self {
        Self {
            clock,
            night_window,
        }
    }

    /// The zone this calculator resolves local times in.
    pub fn clock(&self) -> &ZoneClock {
        &self.clock
    }

    /// Calculates duration, classification and earnings for a shift.
    ///
    /// # Errors
    ///
    /// - [`EngineError::InvalidTimeFormat`] if either time string is malformed
    /// - [`EngineError::NonexistentLocalTime`] if a time falls in a DST gap
    /// - [`EngineError::NonPositiveDuration`] if the break consumes the whole shift
    /// - [`EngineError::InvalidInput`] if the date or the earnings fall out of range
    pub fn calculate(
        &self,
        shift: &ShiftInput,
        rates: &impl RateLookup,
    ) -> EngineResult<ShiftEarnings> {
        let start_time = parse_time_of_day("start_time", &shift.start_time)?;
        let end_time = parse_time_of_day("end_time", &shift.end_time)?;

        let start = self.clock.to_absolute(shift.date.and_time(start_time))?;
        let mut end = self.clock.to_absolute(shift.date.and_time(end_time))?;

        let is_overnight = end <= start || shift.overnight;
        if is_overnight {
            end = end
                .checked_add_signed(Duration::hours(24))
                .ok_or_else(|| EngineError::invalid("date", "is out of range"))?;
        }

        let shift_millis = (end - start).num_milliseconds();
        let net_millis = shift_millis - i64::from(shift.break_minutes) * MILLIS_PER_MINUTE;
        if net_millis <= 0 {
            return Err(EngineError::NonPositiveDuration {
                break_minutes: shift.break_minutes,
                shift_minutes: shift_millis / MILLIS_PER_MINUTE,
            });
        }

        let is_night_shift = self
            .night_window
            .is_night_shift(shift.date, start, end, &self.clock)?;

        let entry_date = self.clock.to_local(start).date();
        let day_of_week = entry_date.weekday().num_days_from_sunday() as u8;

        let net = Decimal::from(net_millis);
        let per_hour = Decimal::from(MILLIS_PER_HOUR);
        let duration_hours = round_money(net / per_hour);

        let rate = rates.rate(day_of_week, is_night_shift);
        let earnings = match rate {
            Some(rate) => {
                let gross = net
                    .checked_mul(rate)
                    .ok_or_else(|| EngineError::invalid("rate", "is too large for this shift"))?;
                round_money(gross / per_hour)
            }
            None => {
                warn!(
                    day_of_week,
                    is_night_shift,
                    entry_date = %entry_date,
                    "No hourly rate configured; recording zero earnings"
                );
                Decimal::ZERO
            }
        };

        debug!(
            start = %start,
            end = %end,
            is_overnight,
            is_night_shift,
            day_of_week,
            duration_hours = %duration_hours,
            earnings = %earnings,
            "Calculated shift earnings"
        );

        Ok(ShiftEarnings {
            start,
            end,
            entry_date,
            day_of_week,
            is_night_shift,
            is_overnight,
            duration_hours,
            rate,
            rate_missing: rate.is_none(),
            earnings,
        })
    }
}

/// Rounds half-up (midpoint away from zero) to two decimal places.
///
/// The result always carries exactly two decimal places, so `8` becomes `8.00`.
pub fn round_money(value: Decimal) -> Decimal {
    let mut rounded =
        value.round_dp_with_strategy(MONEY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_DECIMAL_PLACES);
    rounded
}
