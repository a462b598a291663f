//! Error types for the timesheet engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while validating, calculating
//! and persisting shifts.

use chrono::NaiveDateTime;
use thiserror::Error;

/// The main error type for the timesheet engine.
///
/// Every fallible operation in the crate returns this error type, from
/// configuration loading through to the HTTP layer, which maps each
/// variant onto a status code.
///
/// # Example
///
/// ```
/// use timesheet_engine::error::EngineError;
///
/// let error = EngineError::InvalidTimeFormat {
///     field: "start_time".to_string(),
///     value: "9am".to_string(),
/// };
/// assert_eq!(
///     error.to_string(),
///     "Invalid time for 'start_time': '9am' (expected HH:MM or HH:MM:SS)"
/// );
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// A request field failed validation.
    #[error("Invalid value for '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A time-of-day string could not be parsed.
    #[error("Invalid time for '{field}': '{value}' (expected HH:MM or HH:MM:SS)")]
    InvalidTimeFormat {
        /// The field holding the time string.
        field: String,
        /// The rejected value.
        value: String,
    },

    /// The break is as long as, or longer than, the shift itself.
    #[error(
        "Break of {break_minutes} minutes leaves no working time in a shift of {shift_minutes} minutes"
    )]
    NonPositiveDuration {
        /// The requested break length in minutes.
        break_minutes: u32,
        /// The raw shift length in minutes (before the break is subtracted).
        shift_minutes: i64,
    },

    /// A local time falls inside a daylight-saving gap and never occurs.
    #[error("Local time {local} does not exist in timezone {timezone}")]
    NonexistentLocalTime {
        /// The local wall-clock time that was requested.
        local: NaiveDateTime,
        /// The timezone it was resolved against.
        timezone: String,
    },

    /// The timezone identifier is not a known IANA zone.
    #[error("Unknown timezone: {name}")]
    UnknownTimezone {
        /// The identifier that failed to resolve.
        name: String,
    },

    /// The company does not exist or belongs to another user.
    #[error("Company not found: {id}")]
    CompanyNotFound {
        /// The company id from the request.
        id: String,
    },

    /// The time entry does not exist or belongs to another user.
    #[error("Time entry not found: {id}")]
    TimeEntryNotFound {
        /// The time entry id from the request.
        id: String,
    },

    /// A write collided with an existing record's unique key.
    #[error("Conflict: {message}")]
    Conflict {
        /// A description of the conflicting record.
        message: String,
    },

    /// No acting user could be determined for the request.
    #[error("Missing or invalid session")]
    Unauthorized,

    /// The persistence layer failed.
    #[error("Storage error: {message}")]
    Storage {
        /// A description of the storage failure.
        message: String,
    },
}

impl EngineError {
    /// Shorthand for building an [`EngineError::InvalidInput`].
    pub fn invalid(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::InvalidInput {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Returns true for errors caused by the caller's input rather than the system.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidInput { .. }
                | EngineError::InvalidTimeFormat { .. }
                | EngineError::NonPositiveDuration { .. }
                | EngineError::NonexistentLocalTime { .. }
                | EngineError::UnknownTimezone { .. }
        )
    }
}

impl From<rusqlite::Error> for EngineError {
    fn from(error: rusqlite::Error) -> Self {
        EngineError::Storage {
            message: error.to_string(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
