//! Unified error types for the bills service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::error;

/// Top-level error type for startup and command execution.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration loading error.
    #[error("configuration error: {0}")]
    Config(#[from] envy::Error),

    /// Configuration failed validation.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Store bootstrap or query error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Identifier codec errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IdentifierError {
    /// Text is not a hyphenated 8-4-4-4-12 UUID.
    #[error("invalid UUID text: {0:?}")]
    MalformedUuid(String),

    /// Stored hex form is not 32 hex digits.
    #[error("invalid stored identifier hex: {0:?}")]
    MalformedHex(String),
}

/// Date-range query parameter errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    /// A date parameter is not `YYYY-MM-DD`.
    #[error("Invalid {param} date format. Use YYYY-MM-DD")]
    InvalidDateFormat {
        /// Name of the offending query parameter.
        param: &'static str,
    },
}

/// Persistence errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Underlying driver error.
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// A stored id could not be decoded back into a UUID.
    #[error("corrupt stored identifier: {0}")]
    CorruptIdentifier(#[from] IdentifierError),

    /// The store never became reachable during startup.
    #[error("store unreachable after {attempts} attempts: {reason}")]
    Unreachable {
        /// Number of attempts made.
        attempts: u32,
        /// Last failure message.
        reason: String,
    },
}

/// Error returned by HTTP handlers.
#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed request body or path parameter.
    #[error("{0}")]
    InvalidInput(String),

    /// Bad `start` / `end` query parameter.
    #[error(transparent)]
    InvalidDateFormat(#[from] RangeError),

    /// Path id is not a valid UUID.
    #[error("Invalid ID format")]
    InvalidIdentifier(#[from] IdentifierError),

    /// Any store-level failure.
    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl ApiError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_)
            | ApiError::InvalidDateFormat(_)
            | ApiError::InvalidIdentifier(_) => StatusCode::BAD_REQUEST,
            ApiError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}

/// Convenient Result type alias.
pub type Result<T> = std::result::Result<T, AppError>;
