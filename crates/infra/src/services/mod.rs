//! Application services: the transport-agnostic operations exposed to callers.
//!
//! Each service owns its store ports behind `Arc<dyn ...>` and wraps every
//! storage call in the configured [`RetryPolicy`](crate::retry::RetryPolicy).

pub mod accounts;
pub mod aid_desk;
pub mod directory;
pub mod inventory;

pub use accounts::{AccountService, SessionGrant};
pub use aid_desk::{AidDesk, SeedReport};
pub use directory::UserDirectory;
pub use inventory::InventoryService;
