//! HTTP request handlers for the shipping engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_quote;
use crate::error::EngineError;
use crate::models::ShipmentRequest;

use super::request::QuoteRequest;
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/quote", post(quote_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

/// Handler for GET /health.
///
/// Reports the engine version and the current snapshot generation so
/// operators can confirm which configuration is live.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.snapshot();
    Json(serde_json::json!({
        "status": "ok",
        "engine_version": env!("CARGO_PKG_VERSION"),
        "snapshot_version": snapshot.version(),
        "snapshot_loaded_at": snapshot.loaded_at().to_rfc3339(),
    }))
}

/// Handler for POST /quote.
///
/// Accepts a shipment description and returns the computed shipping cost
/// breakdown, or a structured error when the order cannot be priced.
async fn quote_handler(
    State(state): State<AppState>,
    payload: Result<Json<QuoteRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing quote request");

    // Handle JSON parsing errors
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            let error = match rejection {
                JsonRejection::JsonDataError(err) => {
                    // Get the body text which contains the detailed error from serde
                    let body_text = err.body_text();
                    warn!(
                        correlation_id = %correlation_id,
                        error = %body_text,
                        "JSON data error"
                    );
                    // Check if it's a missing field error
                    if body_text.contains("missing field") {
                        ApiError::new("VALIDATION_ERROR", body_text)
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
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let shipment: ShipmentRequest = request.into();
    let snapshot = state.snapshot();

    let start_time = Instant::now();
    match calculate_quote(&shipment, &snapshot) {
        Ok(quote) => {
            let duration = start_time.elapsed();
            info!(
                correlation_id = %correlation_id,
                zone_id = quote.zone_id,
                producers = quote.per_producer.len(),
                total = %quote.total,
                duration_us = duration.as_micros(),
                "Quote computed successfully"
            );
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                Json(quote),
            )
                .into_response()
        }
        Err(err) => {
            // A missing rate is a configuration gap an administrator must
            // close, not a bad request; flag it for alerting.
            if let EngineError::RateNotConfigured { .. } = &err {
                warn!(
                    correlation_id = %correlation_id,
                    error = %err,
                    operational_alert = true,
                    "Rate configuration gap"
                );
            } else {
                warn!(
                    correlation_id = %correlation_id,
                    error = %err,
                    "Quote failed"
                );
            }
            let api_error: ApiErrorResponse = err.into();
            (
                api_error.status,
                [(header::CONTENT_TYPE, "application/json")],
                Json(api_error.error),
            )
                .into_response()
        }
    }
}
