//! Public error types for the `cms` module.
//!
//! These errors are safe to expose to other modules and consumers.

use thiserror::Error;

/// Errors returned by the CMS operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CmsError {
    /// The referenced resource does not exist in the caller's site.
    #[error("{kind} not found: {id}")]
    NotFound { kind: String, id: String },

    /// Bad name, slug, type or options.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// A uniqueness constraint was violated.
    #[error("{kind} '{name}' already exists")]
    DuplicateName { kind: String, name: String },

    /// The operation conflicts with the current state.
    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// A layout rewrite broke the ordering or pairing rules; nothing was applied.
    #[error("Invalid layout: {reason}")]
    InvalidLayout { reason: String },

    /// A raw value could not be coerced to the field's storage kind.
    #[error("Type mismatch on '{field}': expected {expected}")]
    TypeMismatch { field: String, expected: String },

    /// An internal error occurred.
    #[error("Internal error")]
    Internal,
}

impl CmsError {
    pub fn not_found(kind: impl Into<String>, id: impl ToString) -> Self {
        Self::NotFound {
            kind: kind.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn internal() -> Self {
        Self::Internal
    }
}
