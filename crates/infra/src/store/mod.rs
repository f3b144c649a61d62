//! Persistence ports and their in-memory adapters.
//!
//! Every write that must see the current state (user updates, status changes,
//! inventory edits) goes through an `update_with`-style method: the adapter
//! holds its write lock while the caller's closure recomputes the next state
//! from the stored one, so the decision and the save are one atomic step.

pub mod aid;
pub mod inventory;
pub mod memory;
pub mod sessions;
pub mod users;

use thiserror::Error;

use casework_core::FieldErrors;

use crate::error::Transient;

pub use aid::{AidRequestStore, AidTypeStore, InMemoryAidRequestStore, InMemoryAidTypeStore};
pub use inventory::{InMemoryInventoryStore, InventoryStore};
pub use sessions::InMemoryCredentialStore;
pub use users::{InMemoryUserStore, UserStore};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// Transient failure of the backing storage.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    #[error("record not found")]
    NotFound,

    /// Unique fields already taken, keyed by field name.
    #[error("duplicate: {0}")]
    Duplicate(FieldErrors),
}

impl Transient for StoreError {
    fn is_transient(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}
