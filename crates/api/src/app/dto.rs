use serde::{Deserialize, Serialize};

use casework_aid::RequestStatus;
use casework_auth::{SessionToken, UserView};
use casework_core::FieldErrors;
use casework_infra::services::SessionGrant;

use crate::app::errors;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

impl UpdateStatusRequest {
    /// Accepts the wire names and their legacy aliases.
    pub fn parse(&self) -> Result<RequestStatus, axum::response::Response> {
        self.status
            .trim()
            .parse::<RequestStatus>()
            .map_err(|e| errors::validation_error(FieldErrors::single("status", e.to_string())))
    }
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub token: SessionToken,
    pub user: UserView,
}

impl From<SessionGrant> for SessionResponse {
    fn from(grant: SessionGrant) -> Self {
        Self {
            token: grant.token,
            user: grant.user,
        }
    }
}
