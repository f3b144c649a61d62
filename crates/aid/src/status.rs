//! Aid-request status and the policy deciding which status changes are allowed.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where an aid request stands in its review/delivery lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestStatus {
    #[serde(rename = "PENDING", alias = "PENDIENTE")]
    Pending,
    #[serde(rename = "IN_REVIEW", alias = "EN_REVISION")]
    InReview,
    #[serde(rename = "APPROVED", alias = "APROBADO")]
    Approved,
    #[serde(rename = "REJECTED", alias = "RECHAZADO")]
    Rejected,
    #[serde(rename = "DELIVERED", alias = "ENTREGADO")]
    Delivered,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 5] = [
        RequestStatus::Pending,
        RequestStatus::InReview,
        RequestStatus::Approved,
        RequestStatus::Rejected,
        RequestStatus::Delivered,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::InReview => "IN_REVIEW",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Rejected => "REJECTED",
            RequestStatus::Delivered => "DELIVERED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, RequestStatus::Rejected | RequestStatus::Delivered)
    }
}

impl core::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for RequestStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" | "PENDIENTE" => Ok(RequestStatus::Pending),
            "IN_REVIEW" | "EN_REVISION" => Ok(RequestStatus::InReview),
            "APPROVED" | "APROBADO" => Ok(RequestStatus::Approved),
            "REJECTED" | "RECHAZADO" => Ok(RequestStatus::Rejected),
            "DELIVERED" | "ENTREGADO" => Ok(RequestStatus::Delivered),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

/// Which status changes an update may perform.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransitionPolicy {
    /// Any status may follow any status.
    #[default]
    Unrestricted,
    /// PENDING → {IN_REVIEW, APPROVED, REJECTED}, IN_REVIEW → {APPROVED, REJECTED},
    /// APPROVED → {DELIVERED, REJECTED}; REJECTED and DELIVERED are terminal.
    Lifecycle,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("status cannot change from {from} to {to}")]
pub struct TransitionError {
    pub from: RequestStatus,
    pub to: RequestStatus,
}

impl TransitionPolicy {
    /// Setting the current status again is always allowed.
    pub fn permits(self, from: RequestStatus, to: RequestStatus) -> bool {
        use RequestStatus::*;

        if from == to {
            return true;
        }
        match self {
            TransitionPolicy::Unrestricted => true,
            TransitionPolicy::Lifecycle => matches!(
                (from, to),
                (Pending, InReview | Approved | Rejected) | (InReview, Approved | Rejected) | (Approved, Delivered | Rejected)
            ),
        }
    }

    pub fn check(self, from: RequestStatus, to: RequestStatus) -> Result<(), TransitionError> {
        if self.permits(from, to) {
            Ok(())
        } else {
            Err(TransitionError { from, to })
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown transition policy '{0}' (expected 'unrestricted' or 'lifecycle')")]
pub struct UnknownPolicy(pub String);

impl FromStr for TransitionPolicy {
    type Err = UnknownPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unrestricted" => Ok(TransitionPolicy::Unrestricted),
            "lifecycle" => Ok(TransitionPolicy::Lifecycle),
            _ => Err(UnknownPolicy(s.to_string())),
        }
    }
}
