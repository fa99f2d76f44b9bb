// src/web/error.rs
// Error responses for the HTTP API

use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::fmt;
use tracing::{error, warn};

use crate::error::BakaError;

/// Standard API error response format
#[derive(Debug)]
pub struct ApiError {
    pub message: String,
    pub status_code: StatusCode,
    pub error_code: Option<String>,
    /// Diagnostic detail for upstream failures
    pub details: Option<String>,
}

impl ApiError {
    /// Create a new internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            error_code: Some("INTERNAL_ERROR".to_string()),
            details: None,
        }
    }

    /// Create a new bad request error
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::BAD_REQUEST,
            error_code: Some("BAD_REQUEST".to_string()),
            details: None,
        }
    }

    /// Create a new not found error
    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status_code: StatusCode::NOT_FOUND,
            error_code: Some("NOT_FOUND".to_string()),
            details: None,
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.error_code = Some(code.into());
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let mut response_json = json!({
            "error": self.message,
            "status": self.status_code.as_u16()
        });

        if let Some(error_code) = self.error_code {
            response_json["error_code"] = json!(error_code);
        }
        if let Some(details) = self.details {
            response_json["details"] = json!(details);
        }

        (self.status_code, Json(response_json)).into_response()
    }
}

impl From<BakaError> for ApiError {
    fn from(err: BakaError) -> Self {
        match err {
            BakaError::InvalidInput(reason) => {
                warn!(%reason, "Rejected chat request");
                ApiError::bad_request("Invalid message or action").with_details(reason)
            }
            BakaError::Config(reason) => {
                error!(%reason, "Generator credential unavailable");
                ApiError::internal("API key not configured").with_code("CONFIG_ERROR")
            }
            BakaError::Timeout(after) => {
                error!(timeout_secs = after.as_secs_f64(), "Generator timed out");
                ApiError::internal("Failed to generate response")
                    .with_code("UPSTREAM_TIMEOUT")
                    .with_details(format!("generator timed out after {:.1}s", after.as_secs_f64()))
            }
            BakaError::Upstream(detail) => {
                error!(%detail, "Generator call failed");
                ApiError::internal("Failed to generate response")
                    .with_code("UPSTREAM_ERROR")
                    .with_details(detail)
            }
            other => {
                error!("Chat turn failed: {}", other);
                ApiError::internal("Failed to generate response").with_details(other.to_string())
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(reason = %rejection.body_text(), "Malformed request body");
        ApiError::bad_request("Invalid message or action").with_details(rejection.body_text())
    }
}

/// Result type alias for API operations
pub type ApiResult<T> = Result<T, ApiError>;
