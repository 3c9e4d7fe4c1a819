//! HTTP error response conversion
//!
//! Handlers return `Result<impl IntoResponse, HttpGatewayError>`; any
//! `GatewayError` converts with `?` and renders with a consistent status,
//! body and log line.

use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mediagate_core::{ErrorMetadata, GatewayError, LogLevel};
use mediagate_services::BodyError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    /// Machine-readable error code for programmatic handling
    pub code: String,
    /// Whether this error is recoverable (can be retried)
    pub recoverable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggested_action: Option<String>,
}

/// Wrapper type for GatewayError to implement IntoResponse (orphan rule).
#[derive(Debug)]
pub struct HttpGatewayError(pub GatewayError);

impl From<GatewayError> for HttpGatewayError {
    fn from(err: GatewayError) -> Self {
        HttpGatewayError(err)
    }
}

impl From<MultipartError> for HttpGatewayError {
    fn from(err: MultipartError) -> Self {
        if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return HttpGatewayError(GatewayError::PayloadTooLarge(err.body_text()));
        }
        HttpGatewayError(GatewayError::InvalidInput(format!(
            "Invalid multipart body: {}",
            err.body_text()
        )))
    }
}

/// Classify a multipart read failure for the gateway's stream upload.
pub fn body_error(err: MultipartError) -> BodyError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        BodyError::TooLarge(err.body_text())
    } else {
        BodyError::Read(err.body_text())
    }
}

fn log_error(error: &GatewayError) {
    let error_type = error.error_type();
    let key = error.object_key().unwrap_or("-");
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type = error_type, key = key, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type = error_type, key = key, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(error = %error, error_type = error_type, key = key, "Error occurred");
        }
    }
}

fn is_production_env() -> bool {
    std::env::var("ENVIRONMENT")
        .or_else(|_| std::env::var("APP_ENV"))
        .map(|env| env.to_lowercase() == "production" || env.to_lowercase() == "prod")
        .unwrap_or(false)
}

impl IntoResponse for HttpGatewayError {
    fn into_response(self) -> Response {
        let error = &self.0;
        let status = StatusCode::from_u16(error.http_status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        log_error(error);

        // Backend reasons never leave the process in production or for sensitive errors
        let (details, error_type) = if is_production_env() || error.is_sensitive() {
            (None, None)
        } else {
            (Some(error.to_string()), Some(error.error_type().to_string()))
        };

        let body = ErrorResponse {
            error: error.client_message(),
            details,
            error_type,
            code: error.error_code().to_string(),
            recoverable: error.is_recoverable(),
            suggested_action: error.suggested_action().map(String::from),
        };

        (status, Json(body)).into_response()
    }
}
