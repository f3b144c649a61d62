//! `casework-auth`: staff accounts, the role/department model and the
//! authorization engine.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod account;
pub mod authorize;
pub mod cedula;
pub mod invariants;
pub mod password;
pub mod roles;
pub mod session;
pub mod user;
pub mod view;

pub use account::{AccountError, AccountInput, AuthError, LoginInput, validate_account, validate_registration, verify_login};
pub use authorize::{AccessGrant, ActorContext, SELF_EDITABLE, TargetSnapshot, UserField, ViewClass, can_create, is_visible, resolve};
pub use cedula::{Cedula, CedulaError};
pub use invariants::{Assignment, InvariantError, validate_assignment};
pub use password::{PasswordHash, PasswordHasher, SaltedSha256Hasher};
pub use roles::{Department, Role, RoleModelError, legal_departments_for};
pub use session::{CredentialStore, SessionClaims, SessionError, SessionToken, TokenValidationError, validate_claims};
pub use user::{ClashLookup, NewUser, PatchError, Profile, UniqueKeys, User, UserPatch};
pub use view::UserView;
