//! Response types for the timesheet API.
//!
//! This module defines the error response structures and the mapping from
//! [`EngineError`] onto HTTP status codes.

use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::error::EngineError;

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
#[derive(Debug)]
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    /// Pairs an error body with a status.
    pub fn new(status: StatusCode, error: ApiError) -> Self {
        Self { status, error }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (
            self.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(self.error),
        )
            .into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => {
                ApiErrorResponse::new(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
                )
            }
            EngineError::InvalidInput { field, .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details("VALIDATION_ERROR", message, field),
            ),
            EngineError::InvalidTimeFormat { field, .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details("INVALID_TIME_FORMAT", message, field),
            ),
            EngineError::NonPositiveDuration { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "INVALID_DURATION",
                    message,
                    "The break must be shorter than the shift",
                ),
            ),
            EngineError::NonexistentLocalTime { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::with_details(
                    "NONEXISTENT_LOCAL_TIME",
                    message,
                    "The time falls in a daylight-saving gap",
                ),
            ),
            EngineError::UnknownTimezone { .. } => ApiErrorResponse::new(
                StatusCode::BAD_REQUEST,
                ApiError::new("UNKNOWN_TIMEZONE", message),
            ),
            EngineError::CompanyNotFound { .. } => ApiErrorResponse::new(
                StatusCode::NOT_FOUND,
                ApiError::new("COMPANY_NOT_FOUND", message),
            ),
            EngineError::TimeEntryNotFound { .. } => ApiErrorResponse::new(
                StatusCode::NOT_FOUND,
                ApiError::new("TIME_ENTRY_NOT_FOUND", message),
            ),
            EngineError::Conflict { .. } => {
                ApiErrorResponse::new(StatusCode::CONFLICT, ApiError::new("CONFLICT", message))
            }
            EngineError::Unauthorized => ApiErrorResponse::new(
                StatusCode::UNAUTHORIZED,
                ApiError::new("UNAUTHORIZED", message),
            ),
            // Storage details stay in the logs
            EngineError::Storage { .. } => ApiErrorResponse::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("STORAGE_ERROR", "Internal storage error"),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details")); // Should be skipped when None
    }

    #[test]
    fn test_api_error_with_details_serialization() {
        let error = ApiError::with_details("TEST_ERROR", "Test message", "Some details");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"details\":\"Some details\""));
    }

    #[test]
    fn test_validation_errors_are_400() {
        let cases = [
            EngineError::invalid("name", "must not be blank"),
            EngineError::InvalidTimeFormat {
                field: "start_time".to_string(),
                value: "9am".to_string(),
            },
            EngineError::NonPositiveDuration {
                break_minutes: 30,
                shift_minutes: 10,
            },
            EngineError::UnknownTimezone {
                name: "Nowhere".to_string(),
            },
        ];
        for error in cases {
            let response: ApiErrorResponse = error.into();
            assert_eq!(response.status, StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_not_found_and_conflict_statuses() {
        let response: ApiErrorResponse = EngineError::CompanyNotFound {
            id: "c-1".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.error.code, "COMPANY_NOT_FOUND");

        let response: ApiErrorResponse = EngineError::Conflict {
            message: "taken".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::CONFLICT);

        let response: ApiErrorResponse = EngineError::Unauthorized.into();
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_storage_error_hides_details() {
        let response: ApiErrorResponse = EngineError::Storage {
            message: "disk I/O error at /var/lib/timesheet.sqlite".to_string(),
        }
        .into();
        assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!response.error.message.contains("/var/lib"));
        assert!(response.error.details.is_none());
    }
}
