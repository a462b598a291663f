//! HTTP request handlers for the timesheet API.
//!
//! This module contains the handler functions for all API endpoints.
//! Every handler except `/health` requires a [`SessionUser`].

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{delete, get},
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::EngineResult;

use super::auth::SessionUser;
use super::request::{CreateCompanyRequest, DateQuery, RateQuery, RateRequest, TimeEntryRequest};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/companies",
            get(list_companies_handler).post(create_company_handler),
        )
        .route("/companies/:id", delete(delete_company_handler))
        .route(
            "/hourly-rates",
            get(list_rates_handler).put(upsert_rate_handler),
        )
        .route(
            "/time-entries",
            get(list_time_entries_handler).post(upsert_time_entry_handler),
        )
        .route("/time-entries/week", get(list_week_handler))
        .route("/time-entries/:id", delete(delete_time_entry_handler))
        .route("/reports/weekly", get(weekly_report_handler))
        .with_state(state)
}

/// Handler for GET /health.
async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Handler for GET /companies.
async fn list_companies_handler(State(state): State<AppState>, user: SessionUser) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state
        .run(move |service| service.list_companies(user.id()))
        .await;
    respond(correlation_id, "list_companies", StatusCode::OK, result)
}

/// Handler for POST /companies.
async fn create_company_handler(
    State(state): State<AppState>,
    user: SessionUser,
    payload: Result<Json<CreateCompanyRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing company creation");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    let result = state
        .run(move |service| service.create_company(user.id(), request.into()))
        .await;
    respond(correlation_id, "create_company", StatusCode::CREATED, result)
}

/// Handler for DELETE /companies/:id.
async fn delete_company_handler(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, company_id = %id, "Processing company deletion");

    let result = state
        .run(move |service| service.delete_company(user.id(), &id))
        .await;
    respond(correlation_id, "delete_company", StatusCode::OK, result)
}

/// Handler for GET /hourly-rates.
async fn list_rates_handler(
    State(state): State<AppState>,
    user: SessionUser,
    query: Result<Query<RateQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(q)) => q,
        Err(rejection) => return query_rejection(correlation_id, rejection),
    };

    let company_id = query.company_id.filter(|id| !id.trim().is_empty());
    let result = state
        .run(move |service| service.list_rates(user.id(), company_id.as_deref()))
        .await;
    respond(correlation_id, "list_rates", StatusCode::OK, result)
}

/// Handler for PUT /hourly-rates.
async fn upsert_rate_handler(
    State(state): State<AppState>,
    user: SessionUser,
    payload: Result<Json<RateRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing hourly rate upsert");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    let result = state
        .run(move |service| service.upsert_rate(user.id(), request.into()))
        .await;
    respond(correlation_id, "upsert_rate", StatusCode::OK, result)
}

/// Handler for GET /time-entries.
async fn list_time_entries_handler(State(state): State<AppState>, user: SessionUser) -> Response {
    let correlation_id = Uuid::new_v4();
    let result = state
        .run(move |service| service.list_time_entries(user.id()))
        .await;
    respond(correlation_id, "list_time_entries", StatusCode::OK, result)
}

/// Handler for POST /time-entries.
///
/// Calculates the shift and stores it, returning the stored entry and the
/// calculation summary.
async fn upsert_time_entry_handler(
    State(state): State<AppState>,
    user: SessionUser,
    payload: Result<Json<TimeEntryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing time entry submission");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = state
        .run(move |service| service.upsert_time_entry(user.id(), request.into()))
        .await;
    if let Ok(recorded) = &result {
        info!(
            correlation_id = %correlation_id,
            entry_id = %recorded.entry.id,
            earnings = %recorded.entry.earnings,
            rate_missing = recorded.calculation.rate_missing,
            duration_us = start_time.elapsed().as_micros(),
            "Time entry submission completed"
        );
    }
    respond(correlation_id, "upsert_time_entry", StatusCode::OK, result)
}

/// Handler for GET /time-entries/week.
async fn list_week_handler(
    State(state): State<AppState>,
    user: SessionUser,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(q)) => q,
        Err(rejection) => return query_rejection(correlation_id, rejection),
    };

    let date = query
        .date
        .unwrap_or_else(|| state.service().settings().clock.today());
    let result = state
        .run(move |service| service.list_week(user.id(), date))
        .await;
    respond(correlation_id, "list_week", StatusCode::OK, result)
}

/// Handler for DELETE /time-entries/:id.
async fn delete_time_entry_handler(
    State(state): State<AppState>,
    user: SessionUser,
    Path(id): Path<String>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, entry_id = %id, "Processing time entry deletion");

    let result = state
        .run(move |service| service.delete_time_entry(user.id(), &id))
        .await;
    respond(correlation_id, "delete_time_entry", StatusCode::OK, result)
}

/// Handler for GET /reports/weekly.
async fn weekly_report_handler(
    State(state): State<AppState>,
    user: SessionUser,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let query = match query {
        Ok(Query(q)) => q,
        Err(rejection) => return query_rejection(correlation_id, rejection),
    };

    let result = state
        .run(move |service| service.weekly_report(user.id(), query.date))
        .await;
    respond(correlation_id, "weekly_report", StatusCode::OK, result)
}

/// Serialises a service result, mapping errors onto their status codes.
fn respond<T: Serialize>(
    correlation_id: Uuid,
    operation: &'static str,
    status: StatusCode,
    result: EngineResult<T>,
) -> Response {
    match result {
        Ok(body) => (
            status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(body),
        )
            .into_response(),
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                operation,
                error = %err,
                "Request failed"
            );
            ApiErrorResponse::from(err).into_response()
        }
    }
}

fn json_rejection(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    ApiErrorResponse::new(StatusCode::BAD_REQUEST, error).into_response()
}

fn query_rejection(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Query string error"
    );
    ApiErrorResponse::new(StatusCode::BAD_REQUEST, ApiError::validation_error(body_text))
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::auth::USER_ID_HEADER;
    use crate::config::CalculationSettings;
    use crate::models::Company;
    use crate::service::TimesheetService;
    use crate::store::SqliteStore;
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    fn create_test_state() -> AppState {
        let store = SqliteStore::open_in_memory().unwrap();
        AppState::new(TimesheetService::new(store, CalculationSettings::default()))
    }

    fn post_json(uri: &str, user: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .header(USER_ID_HEADER, user)
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health_needs_no_session() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_missing_session_returns_401() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(Request::builder().uri("/companies").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn test_create_company_returns_201() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json(
                "/companies",
                "alice",
                r#"{"name": " Riverside Cafe ", "phone": ""}"#,
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let company: Company = serde_json::from_slice(&body).unwrap();
        assert_eq!(company.name, "Riverside Cafe");
        assert_eq!(company.phone, None);
        assert_eq!(company.user_id, "alice");
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/companies", "alice", "{ invalid json }"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_field_returns_validation_error() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(post_json("/companies", "alice", r#"{"address": "1 Main St"}"#))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let error: ApiError = serde_json::from_slice(&body).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("missing field"));
    }

    #[tokio::test]
    async fn test_bad_week_date_returns_400() {
        let router = create_router(create_test_state());

        let response = router
            .oneshot(
                Request::builder()
                    .uri("/time-entries/week?date=15-01-2026")
                    .header(USER_ID_HEADER, "alice")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
