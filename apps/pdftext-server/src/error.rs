//! Error types for the ingestion pipeline

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Pipeline-wide result type
pub type Result<T> = std::result::Result<T, ExtractError>;

/// Every way a request can fail. Each variant carries the client-facing message.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("{0}")]
    MissingInput(String),

    #[error("{0}")]
    InvalidType(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    FetchFailure(String),

    #[error("{0}")]
    ParseFailure(String),

    #[error("{0}")]
    Internal(String),
}

impl ExtractError {
    /// Stable category string sent as `error`
    pub fn category(&self) -> &'static str {
        match self {
            Self::MissingInput(_) => "missing_input",
            Self::InvalidType(_) => "invalid_type",
            Self::PayloadTooLarge(_) => "payload_too_large",
            Self::FetchFailure(_) => "fetch_failure",
            Self::ParseFailure(_) => "parse_failure",
            Self::Internal(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::MissingInput(_) | Self::InvalidType(_) | Self::PayloadTooLarge(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::FetchFailure(_) | Self::ParseFailure(_) | Self::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<std::io::Error> for ExtractError {
    fn from(e: std::io::Error) -> Self {
        ExtractError::Internal(format!("IO error: {}", e))
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ExtractError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let category = self.category();

        if status.is_server_error() {
            tracing::error!(error = category, "Request failed: {}", self);
        } else {
            tracing::warn!(error = category, "Request rejected: {}", self);
        }

        let body = Json(ErrorResponse::new(category, self.to_string()));
        (status, body).into_response()
    }
}
