//! Aid-request workflow: intake validation, line items, the technical-aid
//! catalog and the status lifecycle.
//!
//! Pure domain logic (no IO, no HTTP, no storage).

pub mod catalog;
pub mod request;
pub mod status;

pub use catalog::{AidType, DEFAULT_AID_TYPES, default_catalog, strip_accents};
pub use request::{
    AidRequest, AidRequestInput, Applicant, Beneficiary, LineItem, LineItemInput, NewAidRequest, Referrer, Referrers,
};
pub use status::{RequestStatus, TransitionError, TransitionPolicy, UnknownPolicy, UnknownStatus};
