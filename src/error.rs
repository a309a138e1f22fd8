//! Centralized error handling for richtext-core
//!
//! This module provides a unified error type covering the crate's fallible
//! boundaries: document (de)serialization and validated persistence input.
//! The editing core itself favors explicit outcomes over errors (see
//! `commands::CommandOutcome`), so the surface area here is deliberately small.

use std::fmt;

use crate::schema::validate::ValidationIssue;

// ─────────────────────────────────────────────────────────────────────────────
// Custom Result Type Alias
// ─────────────────────────────────────────────────────────────────────────────

/// A specialized `Result` type for the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The centralized error type for the crate.
#[derive(Debug)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────────────────
    // Serialization Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// Failed to serialize or deserialize a document (invalid JSON/shape)
    Json { source: serde_json::Error },

    // ─────────────────────────────────────────────────────────────────────────
    // Document Errors
    // ─────────────────────────────────────────────────────────────────────────
    /// A document failed schema validation at a checked boundary
    InvalidDocument { issues: Vec<ValidationIssue> },
}

// Implement From traits for convenient error conversion
impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Json { source: err }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Display trait implementation for user-friendly error messages
// ─────────────────────────────────────────────────────────────────────────────
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Json { source } => {
                write!(f, "Invalid document JSON: {}", source)
            }
            Error::InvalidDocument { issues } => {
                write!(f, "Document failed validation ({} issue", issues.len())?;
                if issues.len() != 1 {
                    write!(f, "s")?;
                }
                write!(f, ")")?;
                if let Some(first) = issues.first() {
                    write!(f, ": {} at {}", first.message, first.path)?;
                }
                Ok(())
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// std::error::Error trait implementation for error chaining
// ─────────────────────────────────────────────────────────────────────────────
impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Json { source } => Some(source),
            Error::InvalidDocument { .. } => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_error_display() {
        let err: Error = serde_json::from_str::<crate::schema::Document>("not json")
            .unwrap_err()
            .into();
        assert!(err.to_string().starts_with("Invalid document JSON"));
    }

    #[test]
    fn test_invalid_document_display() {
        let err = Error::InvalidDocument {
            issues: vec![ValidationIssue::new(
                "doc.children[0]",
                "heading level out of range",
            )],
        };
        let msg = err.to_string();
        assert!(msg.contains("1 issue"));
        assert!(msg.contains("heading level out of range"));
    }
}
