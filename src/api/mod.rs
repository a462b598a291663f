//! HTTP API module for the timesheet service.
//!
//! This module provides the JSON endpoints for companies, hourly rates,
//! time entries and weekly reports.

mod auth;
mod handlers;
mod request;
mod response;
mod state;

pub use auth::{SessionUser, USER_ID_HEADER};
pub use handlers::create_router;
pub use request::{CreateCompanyRequest, DateQuery, RateQuery, RateRequest, TimeEntryRequest};
pub use response::{ApiError, ApiErrorResponse};
pub use state::AppState;
