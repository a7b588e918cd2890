//! Maps domain errors to HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use torchi_core::error::{AppError, ErrorKind};
use torchi_service::DispatchError;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Deliveries completed before a dispatch failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sent: Option<usize>,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error returned by handlers and extractors.
#[derive(Debug)]
pub struct ApiError {
    /// The underlying domain error.
    pub error: AppError,
    /// Partial delivery count, set for failed dispatches.
    pub sent: Option<usize>,
    /// Field-level validation details.
    pub details: Option<serde_json::Value>,
}

impl ApiError {
    /// Attach structured details to the response body.
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

impl From<AppError> for ApiError {
    fn from(error: AppError) -> Self {
        Self {
            error,
            sent: None,
            details: None,
        }
    }
}

impl From<DispatchError> for ApiError {
    fn from(err: DispatchError) -> Self {
        Self {
            error: err.error,
            sent: Some(err.delivered),
            details: None,
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(&errors).ok();
        Self {
            error: AppError::validation("Request validation failed"),
            sent: None,
            details,
        }
    }
}

/// HTTP status and response code for an error kind.
pub fn status_for(kind: ErrorKind) -> (StatusCode, &'static str) {
    match kind {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Unauthenticated => (StatusCode::UNAUTHORIZED, "UNAUTHENTICATED"),
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::Timeout => (StatusCode::REQUEST_TIMEOUT, "TIMEOUT"),
        ErrorKind::Delivery => (StatusCode::BAD_GATEWAY, "DELIVERY_FAILED"),
        ErrorKind::Database
        | ErrorKind::Configuration
        | ErrorKind::Serialization
        | ErrorKind::Internal => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_code) = status_for(self.error.kind);

        if status.is_server_error() && self.error.kind != ErrorKind::Delivery {
            tracing::error!(error = %self.error, "Internal server error");
        }

        let body = ApiErrorResponse {
            error: error_code.to_string(),
            message: self.error.message,
            sent: self.sent,
            details: self.details,
        };

        (status, Json(body)).into_response()
    }
}
