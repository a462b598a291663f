//! Shift calculation logic for the timesheet engine.
//!
//! This module contains time-of-day parsing, timezone-aware conversion
//! between local and absolute time, night-window classification, week
//! bounds and the shift earnings calculator that ties them together.

mod clock;
mod earnings;
mod night_window;
mod time_of_day;
mod week;

pub use clock::ZoneClock;
pub use earnings::{
    MONEY_DECIMAL_PLACES, RateLookup, ShiftEarnings, ShiftEarningsCalculator, ShiftInput,
    round_money,
};
pub use night_window::NightWindow;
pub use time_of_day::parse_time_of_day;
pub use week::week_bounds;
