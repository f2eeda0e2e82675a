//! Error types for the SEO health checker.
//!
//! This module provides structured error handling with:
//! - `AppError`: Domain-specific errors raised by the collaborators (fetching,
//!   link checking, PageSpeed) and by configuration loading
//! - `Result<T>`: Type alias for Results using AppError
//!
//! The rule evaluator and the score reducer never fail; absent elements are a
//! normal input state for them.

use thiserror::Error;

// ============================================================================
// DOMAIN ERROR TYPE
// ============================================================================

/// Domain-specific errors for application operations.
#[derive(Debug, Error)]
pub enum AppError {
    /// Invalid or malformed URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Network request failed
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Remote server answered with a non-success status
    #[error("HTTP status {0}")]
    HttpStatus(u16),

    /// External service error (PageSpeed, link checker, etc.)
    #[error("Service error ({service}): {message}")]
    ServiceError { service: &'static str, message: String },

    /// Invalid settings
    #[error("Configuration error: {0}")]
    Config(String),
}

impl AppError {
    /// Create a network error
    pub fn network(msg: impl Into<String>) -> Self {
        Self::NetworkError(msg.into())
    }

    /// Create a service error
    pub fn service(service: &'static str, msg: impl Into<String>) -> Self {
        Self::ServiceError {
            service,
            message: msg.into(),
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}

impl From<reqwest::Error> for AppError {
    fn from(error: reqwest::Error) -> Self {
        match error.status() {
            Some(status) => Self::HttpStatus(status.as_u16()),
            None => Self::NetworkError(error.to_string()),
        }
    }
}

impl From<url::ParseError> for AppError {
    fn from(error: url::ParseError) -> Self {
        Self::InvalidUrl(error.to_string())
    }
}

/// Result type alias using AppError.
pub type Result<T> = std::result::Result<T, AppError>;
