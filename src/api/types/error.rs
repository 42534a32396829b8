//! Error payloads returned by the HTTP API

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

pub const PROMPT_REQUIRED: &str = "Prompt is required";
pub const NO_PROVIDER_ERROR: &str = "No AI provider configured";
pub const NO_PROVIDER_HINT: &str =
    "Please add OPENAI_API_KEY, DEEPSEEK_API_KEY, or GEMINI_API_KEY to environment variables";

/// Error body: a short `error`, plus an optional remediation `message` or diagnostic `details`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// API error with status code
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub response: ApiErrorResponse,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self {
            status,
            response: ApiErrorResponse {
                error: error.into(),
                message: None,
                details: None,
            },
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.response.message = Some(message.into());
        self
    }

    /// Replace the short `error` summary, keeping status and details
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.response.error = error.into();
        self
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.response.details = Some(details.into());
        self
    }

    /// Bad request error
    pub fn bad_request(error: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error)
    }

    pub fn prompt_required() -> Self {
        Self::bad_request(PROMPT_REQUIRED)
    }

    /// No credentials present: tell the operator what to set
    pub fn no_provider() -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, NO_PROVIDER_ERROR).with_message(NO_PROVIDER_HINT)
    }

    /// Internal server error
    pub fn internal(error: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, error)
    }

    /// Map a generation failure, using `context` as the error summary for 500s
    pub fn from_generation(context: &str, err: DomainError) -> Self {
        match err {
            DomainError::NoProviderConfigured => Self::no_provider(),
            DomainError::Validation { message } => Self::bad_request(message),
            other => Self::internal(context).with_details(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.response)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self::from_generation("Request failed", err)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.status.as_u16(), self.response.error)
    }
}

impl std::error::Error for ApiError {}
