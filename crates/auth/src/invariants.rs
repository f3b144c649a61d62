//! Role/department consistency rules for user records.
//!
//! - `superAdmin` always ends up in department `none` (normalized, never rejected).
//! - `coordinador` must belong to `oac`.
//! - `admin` and `basic` must belong to a real department.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::roles::{Department, Role, legal_departments_for};

/// A role/department pair that is not allowed.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("department '{attempted_department}' is not allowed for role '{role}'")]
pub struct InvariantError {
    pub role: Role,
    pub attempted_department: Department,
}

impl InvariantError {
    /// User-correctable explanation of the rule that was broken.
    pub fn message(&self) -> &'static str {
        match self.role {
            Role::Coordinador => "coordinador users can only belong to the oac department",
            _ => "admin and basic users must be assigned a department (oac, farmacia or almacen)",
        }
    }
}

/// Validate a candidate role/department pair and return the department to store.
pub fn validate_assignment(role: Role, department: Department) -> Result<Department, InvariantError> {
    if role == Role::SuperAdmin {
        return Ok(Department::Unassigned);
    }

    if !legal_departments_for(role).contains(&department) {
        return Err(InvariantError {
            role,
            attempted_department: department,
        });
    }

    Ok(department)
}

/// A role/department pair that has passed [`validate_assignment`].
///
/// Only constructible through validation, so any `User` holding one satisfies
/// the consistency rules by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawAssignment")]
pub struct Assignment {
    role: Role,
    department: Department,
}

#[derive(Deserialize)]
struct RawAssignment {
    role: Role,
    department: Department,
}

impl TryFrom<RawAssignment> for Assignment {
    type Error = InvariantError;

    fn try_from(raw: RawAssignment) -> Result<Self, Self::Error> {
        Assignment::new(raw.role, raw.department)
    }
}

impl Assignment {
    pub fn new(role: Role, department: Department) -> Result<Self, InvariantError> {
        let department = validate_assignment(role, department)?;
        Ok(Self { role, department })
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn department(&self) -> Department {
        self.department
    }
}
