//! Unified error type for the HR records core.
//!
//! Every operation returns [`Result`]. Validation, lookup and precondition
//! failures are raised before the store is touched; store failures come
//! straight from the persistence collaborator and are passed through as-is.

use thiserror::Error;

/// All failures surfaced by the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field is empty or a value fails its type-specific format check.
    #[error("Validation failed for '{field}': {message}")]
    Validation {
        /// Schema key of the offending field
        field: String,
        /// Human-readable reason
        message: String,
    },

    /// An update or lookup referenced a record that does not exist.
    #[error("{entity} not found: {key}")]
    NotFound {
        /// Record kind, e.g. "Employee"
        entity: &'static str,
        /// The surrogate id or employee id that was looked up
        key: String,
    },

    /// The record's lifecycle state forbids the requested operation.
    #[error("Precondition failed: {message}")]
    Precondition {
        /// Human-readable reason
        message: String,
    },

    /// The key-value store collaborator failed.
    #[error("Store error: {message}")]
    Store {
        /// Human-readable reason
        message: String,
    },

    /// Configuration could not be read or parsed.
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable reason
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Malformed stored JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Shorthand for a [`Error::Validation`] on `field`.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// True when the failure originated in the persistence collaborator
    /// (quota, connection, malformed stored JSON).
    #[must_use]
    pub const fn is_store_failure(&self) -> bool {
        matches!(self, Self::Store { .. } | Self::Database(_) | Self::Json(_))
    }
}

// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
