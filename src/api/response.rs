//! Response types for the benefit consolidation API.
//!
//! This module defines the chat and health bodies plus the error response
//! structures for the HTTP API.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::EngineError;
use crate::orchestrator::ExecutionPath;

/// Response body for `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    /// Text shown to the user: the execution summary or the model's answer.
    pub reply: String,
    /// Where the report was written, for consolidation requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_path: Option<String>,
    /// Which path produced the consolidation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub execution_path: Option<ExecutionPath>,
    /// Employees in the consolidation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub employees: Option<usize>,
    /// Total benefit of the consolidation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_benefit: Option<Decimal>,
}

impl ChatResponse {
    /// A plain text reply.
    pub fn text(reply: impl Into<String>) -> Self {
        Self {
            reply: reply.into(),
            artifact_path: None,
            execution_path: None,
            employees: None,
            total_benefit: None,
        }
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `ok`.
    pub status: String,
    /// Competence period in use.
    pub period: String,
    /// Whether a language model is wired in.
    pub ai_configured: bool,
}

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
        let message = error.to_string();
        let (status, error) = match error {
            EngineError::SourceNotFound { name } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::with_details(
                    "SOURCE_NOT_FOUND",
                    message,
                    format!("Place '{}' in the sources directory and try again", name),
                ),
            ),
            EngineError::EmptySource { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("EMPTY_SOURCE", message),
            ),
            EngineError::SourceReadError { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("SOURCE_READ_ERROR", message),
            ),
            EngineError::ConfigNotFound { .. } | EngineError::ConfigParseError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CONFIG_ERROR", "Configuration error", message),
            ),
            EngineError::AiNotConfigured => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::with_details(
                    "AI_NOT_CONFIGURED",
                    message,
                    "Only consolidation requests are available without a language model",
                ),
            ),
            EngineError::AiTransport { .. }
            | EngineError::AiResponseMalformed { .. }
            | EngineError::AiResponseInsufficient { .. } => (
                StatusCode::BAD_GATEWAY,
                ApiError::new("AI_ERROR", message),
            ),
            EngineError::AiTimeout { .. } => (
                StatusCode::GATEWAY_TIMEOUT,
                ApiError::new("AI_TIMEOUT", message),
            ),
            EngineError::ReportWriteError { .. } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::new("REPORT_WRITE_ERROR", message),
            ),
            EngineError::CalculationError { message } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::with_details("CALCULATION_ERROR", "Calculation failed", message),
            ),
        };
        ApiErrorResponse { status, error }
    }
}
