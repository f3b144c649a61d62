//! Application-level error taxonomy shared by every service.

use thiserror::Error;

use casework_aid::TransitionError;
use casework_auth::{AccountError, AuthError, PatchError, SessionError};
use casework_core::FieldErrors;

use crate::store::StoreError;

/// Errors that may be retried a bounded number of times.
pub trait Transient {
    fn is_transient(&self) -> bool;
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Field-level problems, all of them.
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    /// A consistency rule was broken (role/department pairing, status transition).
    #[error("invariant violated: {0}")]
    Invariant(String),

    /// Access denied. Never says why.
    #[error("forbidden")]
    Forbidden,

    #[error("not found")]
    NotFound,

    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, unknown or expired session credential.
    #[error("authentication required")]
    Unauthenticated,

    /// Storage stayed unavailable after the bounded retries.
    #[error("service unavailable: {0}")]
    Unavailable(String),
}

impl Transient for ServiceError {
    fn is_transient(&self) -> bool {
        matches!(self, ServiceError::Unavailable(_))
    }
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => ServiceError::Unavailable(msg),
            StoreError::NotFound => ServiceError::NotFound,
            StoreError::Duplicate(fields) => ServiceError::Validation(fields),
        }
    }
}

impl From<FieldErrors> for ServiceError {
    fn from(fields: FieldErrors) -> Self {
        ServiceError::Validation(fields)
    }
}

impl From<PatchError> for ServiceError {
    fn from(err: PatchError) -> Self {
        match err {
            PatchError::Forbidden => ServiceError::Forbidden,
            PatchError::Validation(fields) => ServiceError::Validation(fields),
            PatchError::Invariant(e) => ServiceError::Invariant(e.message().to_string()),
        }
    }
}

impl From<AccountError> for ServiceError {
    fn from(err: AccountError) -> Self {
        match err {
            AccountError::Validation(fields) => ServiceError::Validation(fields),
            AccountError::Invariant(e) => ServiceError::Invariant(e.message().to_string()),
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => ServiceError::InvalidCredentials,
        }
    }
}

impl From<SessionError> for ServiceError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Invalid => ServiceError::Unauthenticated,
            SessionError::Unavailable => ServiceError::Unavailable("credential store unavailable".to_string()),
        }
    }
}

impl From<TransitionError> for ServiceError {
    fn from(err: TransitionError) -> Self {
        ServiceError::Invariant(err.to_string())
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;
