//! # AppError
//!
//! Centralized error handling for the Outpost ecosystem.
//! Maps domain-specific failures to actionable error types.

use thiserror::Error;

/// The primary error type for all op-core operations.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (e.g., Post, Reply, User)
    #[error("{0} not found with ID {1}")]
    NotFound(String, String),

    /// Validation failure (e.g., empty title, unknown category)
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing or invalid credentials (no usable actor identity)
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Role/ownership check failed for an authenticated actor
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Current post state blocks the action (e.g., replying to a locked post)
    #[error("conflict: {0}")]
    Conflict(String),

    /// Infrastructure failure (e.g., database down)
    #[error("internal service error: {0}")]
    Internal(String),
}

impl AppError {
    /// Shorthand for the common two-part `NotFound` constructor.
    pub fn not_found(kind: &str, id: impl ToString) -> Self {
        AppError::NotFound(kind.to_string(), id.to_string())
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// A specialized Result type for Outpost logic.
pub type Result<T> = std::result::Result<T, AppError>;
