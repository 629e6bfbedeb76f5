//! Typed error handling for the Plantify API
//!
//! # Error Categories
//!
//! - [`ConfigError`]: missing or malformed process configuration, returned by
//!   [`AppConfig::from_env`](crate::config::AppConfig::from_env) and fatal at
//!   startup
//! - [`StorageError`]: a store operation failed (startup-fatal while
//!   connecting, a generic 500 inside a request)
//!
//! Only storage failures can reach a handler, so [`PlantifyError`] wraps
//! those alone. HTTP responses only ever carry a fixed `{ "message": ... }` body. The
//! underlying store error is kept for logging and never sent to the client.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// The main error type for the Plantify API
#[derive(Debug, Error)]
pub enum PlantifyError {
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}

impl PlantifyError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            PlantifyError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show to API callers
    pub fn public_message(&self) -> &'static str {
        match self {
            PlantifyError::Storage(e) => e.operation.public_message(),
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            message: self.public_message().to_string(),
        }
    }
}

impl IntoResponse for PlantifyError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors raised while loading configuration from the environment
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} is not set")]
    MissingVar { name: &'static str },

    #[error("{name} has invalid value '{value}': {reason}")]
    InvalidVar {
        name: &'static str,
        value: String,
        reason: String,
    },
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Store operation that failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreOperation {
    Connect,
    FetchPlants,
    SeedPlants,
}

impl StoreOperation {
    fn public_message(&self) -> &'static str {
        match self {
            StoreOperation::Connect => "Database unavailable",
            StoreOperation::FetchPlants => "Failed to fetch plants",
            StoreOperation::SeedPlants => "Failed to seed plants",
        }
    }
}

impl fmt::Display for StoreOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreOperation::Connect => write!(f, "connect to database"),
            StoreOperation::FetchPlants => write!(f, "fetch plants"),
            StoreOperation::SeedPlants => write!(f, "seed plants"),
        }
    }
}

/// A store operation failed
#[derive(Debug, Error)]
#[error("Failed to {operation}: {message}")]
pub struct StorageError {
    pub operation: StoreOperation,
    pub message: String,
}

impl StorageError {
    /// Wrap a store failure, keeping the full error chain for logs
    pub fn new(operation: StoreOperation, err: &anyhow::Error) -> Self {
        Self {
            operation,
            message: format!("{:#}", err),
        }
    }
}
