//! Parsing of local wall-clock time strings.

use chrono::NaiveTime;

use crate::error::{EngineError, EngineResult};

const TIME_FORMATS: [&str; 2] = ["%H:%M", "%H:%M:%S"];

/// Parses a 24-hour `HH:MM` or `HH:MM:SS` string.
///
/// `field` names the request field so that the error points the caller at
/// the offending input.
///
/// # Examples
///
/// ```
/// use timesheet_engine::calculation::parse_time_of_day;
/// use chrono::NaiveTime;
///
/// let time = parse_time_of_day("start_time", "22:00").unwrap();
/// assert_eq!(time, NaiveTime::from_hms_opt(22, 0, 0).unwrap());
///
/// assert!(parse_time_of_day("end_time", "10pm").is_err());
/// ```
pub fn parse_time_of_day(field: &str, value: &str) -> EngineResult<NaiveTime> {
    let trimmed = value.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveTime::parse_from_str(trimmed, format).ok())
        .ok_or_else(|| EngineError::InvalidTimeFormat {
            field: field.to_string(),
            value: value.to_string(),
        })
}
