//! Response types for the shipping engine API.
//!
//! This module defines the error response structures and error handling
//! for the HTTP API. User-visible messages distinguish "not deliverable
//! here" from "method unavailable" from a generic "try again".

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
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

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::ConfigInvalid { message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details("CONFIG_ERROR", "Invalid configuration", message),
            },
            EngineError::ZoneNotResolved { postal_code } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "ZONE_NOT_RESOLVED",
                    "Shipping is not available to this address",
                    format!("No shipping zone configured for postal code '{}'", postal_code),
                ),
            },
            EngineError::RateNotConfigured {
                producer_id,
                zone_id,
                tier,
                method,
            } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "RATE_NOT_CONFIGURED",
                    "The chosen delivery method is unavailable for part of this order",
                    format!(
                        "No rate for producer {}, zone {}, tier '{}', method '{}'",
                        producer_id, zone_id, tier, method
                    ),
                ),
            },
            EngineError::MethodNotAvailable {
                producer_id,
                method,
                reason,
            } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "METHOD_NOT_AVAILABLE",
                    format!("Delivery method '{}' is not available for this order", method),
                    format!("producer {}: {}", producer_id, reason),
                ),
            },
            EngineError::ChargeNotConfigured { code } => ApiErrorResponse {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                error: ApiError::with_details(
                    "CHARGE_NOT_CONFIGURED",
                    format!("Additional charge '{}' is not available", code),
                    "The requested additional charge is unknown or inactive",
                ),
            },
            EngineError::SnapshotStale { version } => ApiErrorResponse {
                status: StatusCode::SERVICE_UNAVAILABLE,
                error: ApiError::with_details(
                    "SNAPSHOT_STALE",
                    "Shipping rates are being refreshed, please try again",
                    format!("configuration snapshot version {} was invalidated", version),
                ),
            },
            EngineError::InvalidShipment { message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "INVALID_SHIPMENT",
                    "The shipment description is invalid",
                    message,
                ),
            },
        }
    }
}
