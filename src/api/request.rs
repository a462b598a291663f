//! Request types for the timesheet API.
//!
//! This module defines the JSON bodies and query strings accepted by the
//! endpoints, and their conversions into service inputs.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{NewCompany, RateUpsert};
use crate::service::TimeEntrySubmission;

/// Request body for `POST /companies`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCompanyRequest {
    /// Display name.
    pub name: String,
    /// Optional postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Optional contact phone number.
    #[serde(default)]
    pub phone: Option<String>,
}

impl From<CreateCompanyRequest> for NewCompany {
    fn from(req: CreateCompanyRequest) -> Self {
        NewCompany {
            name: req.name,
            address: req.address,
            phone: req.phone,
        }
    }
}

/// Request body for `PUT /hourly-rates`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateRequest {
    /// The company the rate applies to.
    pub company_id: String,
    /// Weekday index, 0 = Sunday through 6 = Saturday.
    pub day_of_week: u8,
    /// Whether this is the night-shift rate.
    #[serde(default)]
    pub is_night_shift: bool,
    /// Hourly pay rate, as a string or number.
    pub rate: Decimal,
}

impl From<RateRequest> for RateUpsert {
    fn from(req: RateRequest) -> Self {
        RateUpsert {
            company_id: req.company_id,
            day_of_week: req.day_of_week,
            is_night_shift: req.is_night_shift,
            rate: req.rate,
        }
    }
}

/// Request body for `POST /time-entries`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeEntryRequest {
    /// Existing entry to overwrite.
    #[serde(default)]
    pub id: Option<String>,
    /// The company the shift was worked for.
    pub company_id: String,
    /// Local date the shift starts on (`YYYY-MM-DD`).
    pub date: NaiveDate,
    /// Local start time (`HH:MM` or `HH:MM:SS`).
    pub start_time: String,
    /// Local end time (`HH:MM` or `HH:MM:SS`).
    pub end_time: String,
    /// Unpaid break in minutes.
    #[serde(default)]
    pub break_minutes: Option<u32>,
    /// Forces the end onto the following day.
    #[serde(default)]
    pub overnight: bool,
    /// IANA zone for this submission.
    #[serde(default)]
    pub timezone: Option<String>,
}

impl From<TimeEntryRequest> for TimeEntrySubmission {
    fn from(req: TimeEntryRequest) -> Self {
        TimeEntrySubmission {
            id: req.id.filter(|id| !id.trim().is_empty()),
            company_id: req.company_id,
            date: req.date,
            start_time: req.start_time,
            end_time: req.end_time,
            break_minutes: req.break_minutes,
            overnight: req.overnight,
            timezone: req.timezone,
        }
    }
}

/// Query string for `GET /hourly-rates`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RateQuery {
    /// Restricts the listing to one company.
    pub company_id: Option<String>,
}

/// Query string for the week endpoints.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DateQuery {
    /// Any date in the requested week.
    pub date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_entry_request_defaults() {
        let json = r#"{
            "company_id": "c-1",
            "date": "2026-01-15",
            "start_time": "22:00",
            "end_time": "02:00"
        }"#;
        let req: TimeEntryRequest = serde_json::from_str(json).unwrap();
        let submission: TimeEntrySubmission = req.into();

        assert_eq!(submission.id, None);
        assert_eq!(submission.break_minutes, None);
        assert!(!submission.overnight);
        assert_eq!(submission.date, NaiveDate::from_ymd_opt(2026, 1, 15).unwrap());
    }

    #[test]
    fn test_blank_id_is_treated_as_absent() {
        let json = r#"{
            "id": "  ",
            "company_id": "c-1",
            "date": "2026-01-15",
            "start_time": "09:00",
            "end_time": "17:00"
        }"#;
        let req: TimeEntryRequest = serde_json::from_str(json).unwrap();
        let submission: TimeEntrySubmission = req.into();
        assert_eq!(submission.id, None);
    }

    #[test]
    fn test_rate_request_accepts_string_rate() {
        let json = r#"{"company_id": "c-1", "day_of_week": 0, "rate": "27.50"}"#;
        let req: RateRequest = serde_json::from_str(json).unwrap();
        let upsert: RateUpsert = req.into();

        assert_eq!(upsert.rate, Decimal::new(2750, 2));
        assert!(!upsert.is_night_shift);
    }

    #[test]
    fn test_missing_required_field_rejected() {
        let json = r#"{"date": "2026-01-15", "start_time": "09:00", "end_time": "17:00"}"#;
        let err = serde_json::from_str::<TimeEntryRequest>(json).unwrap_err();
        assert!(err.to_string().contains("missing field"));
    }
}
