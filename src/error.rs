//! Custom error types for TravelSplit
//!
//! This module defines the error hierarchy for the ledger core using thiserror
//! for ergonomic error definitions.

use thiserror::Error;

/// The main error type for TravelSplit operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Input rejected before reaching a store
    #[error("Validation error: {0}")]
    Validation(String),

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Local store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Remote document store errors
    #[error("Remote store error: {0}")]
    Remote(String),

    /// Session lifecycle errors
    #[error("Session error: {0}")]
    Session(String),
}

impl LedgerError {
    /// Create a "not found" error for groups
    pub fn group_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Group",
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for expenses
    pub fn expense_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity_type: "Expense",
            identifier: identifier.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from a backend rather than from the caller's input
    pub fn is_store_failure(&self) -> bool {
        matches!(
            self,
            Self::Storage(_) | Self::Remote(_) | Self::Io(_) | Self::Json(_)
        )
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for TravelSplit operations
pub type LedgerResult<T> = Result<T, LedgerError>;
