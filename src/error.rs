//! Error types for fintrack
//!
//! The first four variants are the domain failures raised by the service
//! layer. Everything else is an unclassified failure coming from the store or
//! the environment and is passed through untouched.

use std::fmt;

use thiserror::Error;

/// The kind of entity a lookup failed for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Category,
    Transaction,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category => write!(f, "Category"),
            Self::Transaction => write!(f, "Transaction"),
        }
    }
}

/// The main error type for fintrack operations
#[derive(Error, Debug, PartialEq)]
pub enum TrackerError {
    /// The referenced entity does not exist
    #[error("{entity} not found: {identifier}")]
    NotFound {
        entity: EntityKind,
        identifier: String,
    },

    /// Another category already uses this name
    #[error("Category already exists: {0}")]
    DuplicateName(String),

    /// The operation would break a business rule, e.g. deleting a category
    /// that transactions still reference
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// A field of the request is missing or out of range
    #[error("Validation error: {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Storage errors
    #[error("Storage error: {0}")]
    Storage(String),
}

impl TrackerError {
    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity: EntityKind::Category,
            identifier: identifier.into(),
        }
    }

    /// Create a "not found" error for transactions
    pub fn transaction_not_found(identifier: impl Into<String>) -> Self {
        Self::NotFound {
            entity: EntityKind::Transaction,
            identifier: identifier.into(),
        }
    }

    /// Create a validation error for a single field
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. })
    }

    /// Whether the error was raised by a domain rule rather than by the
    /// store or the environment
    pub fn is_domain(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. }
                | Self::DuplicateName(_)
                | Self::BusinessRule(_)
                | Self::Validation { .. }
        )
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for TrackerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for fintrack operations
pub type TrackerResult<T> = Result<T, TrackerError>;
