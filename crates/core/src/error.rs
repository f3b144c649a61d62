//! Domain error model.

use thiserror::Error;

/// Domain-level error.
///
/// Field validation failures are reported through [`crate::FieldErrors`];
/// this type covers failures of the primitives themselves.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),
}

impl DomainError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }
}
