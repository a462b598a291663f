//! Hourly rate model and the per-company rate table.
//!
//! Rates are keyed by weekday (0 = Sunday through 6 = Saturday) and
//! shift type. A [`RateTable`] is the in-memory view of one company's
//! rates that the calculator consults.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The highest valid weekday index (Saturday).
pub const MAX_DAY_OF_WEEK: u8 = 6;

/// A stored hourly rate.
///
/// Unique per (user, company, day of week, shift type).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HourlyRate {
    /// The owning user.
    pub user_id: String,
    /// The company the rate applies to.
    pub company_id: String,
    /// Weekday index, 0 = Sunday through 6 = Saturday.
    pub day_of_week: u8,
    /// Whether this is the night-shift rate.
    pub is_night_shift: bool,
    /// Hourly pay rate.
    pub rate: Decimal,
    /// When the rate was last written.
    pub updated_at: DateTime<Utc>,
}

/// The user-supplied fields for creating or overwriting a rate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateUpsert {
    /// The company the rate applies to.
    pub company_id: String,
    /// Weekday index, 0 = Sunday through 6 = Saturday.
    pub day_of_week: u8,
    /// Whether this is the night-shift rate.
    pub is_night_shift: bool,
    /// Hourly pay rate, must be positive.
    pub rate: Decimal,
}

impl RateUpsert {
    /// Checks the weekday range and that the rate is positive.
    pub fn validate(&self) -> EngineResult<()> {
        if self.company_id.trim().is_empty() {
            return Err(EngineError::invalid("company_id", "must not be blank"));
        }
        if self.day_of_week > MAX_DAY_OF_WEEK {
            return Err(EngineError::invalid(
                "day_of_week",
                format!("must be between 0 and {}", MAX_DAY_OF_WEEK),
            ));
        }
        if self.rate <= Decimal::ZERO {
            return Err(EngineError::invalid("rate", "must be positive"));
        }
        Ok(())
    }
}

/// One company's rates, indexed by (day of week, is night shift).
///
/// # Examples
///
/// ```
/// use timesheet_engine::models::RateTable;
/// use rust_decimal::Decimal;
///
/// let mut table = RateTable::default();
/// table.insert(1, false, Decimal::new(2850, 2));
/// assert_eq!(table.get(1, false), Some(Decimal::new(2850, 2)));
/// assert_eq!(table.get(1, true), None);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RateTable {
    rates: HashMap<(u8, bool), Decimal>,
}

impl RateTable {
    /// Sets the rate for a weekday and shift type, replacing any previous value.
    pub fn insert(&mut self, day_of_week: u8, is_night_shift: bool, rate: Decimal) {
        self.rates.insert((day_of_week, is_night_shift), rate);
    }

    /// Returns the rate for a weekday and shift type, if one is defined.
    pub fn get(&self, day_of_week: u8, is_night_shift: bool) -> Option<Decimal> {
        self.rates.get(&(day_of_week, is_night_shift)).copied()
    }

    /// Returns the number of defined rates.
    pub fn len(&self) -> usize {
        self.rates.len()
    }

    /// Returns true if no rates are defined.
    pub fn is_empty(&self) -> bool {
        self.rates.is_empty()
    }
}

impl FromIterator<HourlyRate> for RateTable {
    fn from_iter<I: IntoIterator<Item = HourlyRate>>(iter: I) -> Self {
        let mut table = RateTable::default();
        for rate in iter {
            table.insert(rate.day_of_week, rate.is_night_shift, rate.rate);
        }
        table
    }
}
