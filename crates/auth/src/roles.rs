//! Role model: the closed set of staff roles and departments, and which
//! combinations of the two are legal.

use core::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Staff role. Decides what a user may see and change about other users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    #[serde(rename = "basic")]
    Basic,
    #[serde(rename = "admin")]
    Admin,
    #[serde(rename = "coordinador")]
    Coordinador,
    #[serde(rename = "superAdmin")]
    SuperAdmin,
}

/// Department a user belongs to. `Unassigned` is reserved for `superAdmin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Department {
    #[serde(rename = "oac", alias = "OAC")]
    Oac,
    #[serde(rename = "farmacia")]
    Farmacia,
    #[serde(rename = "almacen")]
    Almacen,
    #[serde(rename = "none")]
    Unassigned,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RoleModelError {
    #[error("unknown role '{0}'")]
    UnknownRole(String),

    #[error("unknown department '{0}'")]
    UnknownDepartment(String),
}

const STAFF_DEPARTMENTS: &[Department] = &[Department::Oac, Department::Farmacia, Department::Almacen];

impl Role {
    pub const ALL: [Role; 4] = [Role::Basic, Role::Admin, Role::Coordinador, Role::SuperAdmin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Basic => "basic",
            Role::Admin => "admin",
            Role::Coordinador => "coordinador",
            Role::SuperAdmin => "superAdmin",
        }
    }
}

impl Department {
    pub const ALL: [Department; 4] = [
        Department::Oac,
        Department::Farmacia,
        Department::Almacen,
        Department::Unassigned,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Department::Oac => "oac",
            Department::Farmacia => "farmacia",
            Department::Almacen => "almacen",
            Department::Unassigned => "none",
        }
    }

    /// Human-facing label shown next to the department code.
    pub fn display_name(&self) -> &'static str {
        match self {
            Department::Oac => "OAC",
            Department::Farmacia => "Farmacia",
            Department::Almacen => "Almacén",
            Department::Unassigned => "Sin departamento",
        }
    }
}

/// Pure lookup of the departments a role may be paired with.
pub fn legal_departments_for(role: Role) -> &'static [Department] {
    match role {
        Role::SuperAdmin => &[Department::Unassigned],
        Role::Coordinador => &[Department::Oac],
        Role::Admin | Role::Basic => STAFF_DEPARTMENTS,
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl core::fmt::Display for Department {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RoleModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::ALL
            .into_iter()
            .find(|r| r.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| RoleModelError::UnknownRole(s.to_string()))
    }
}

impl FromStr for Department {
    type Err = RoleModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("almacén") {
            return Ok(Department::Almacen);
        }
        Department::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| RoleModelError::UnknownDepartment(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legal_department_table() {
        assert_eq!(legal_departments_for(Role::SuperAdmin), &[Department::Unassigned]);
        assert_eq!(legal_departments_for(Role::Coordinador), &[Department::Oac]);
        for role in [Role::Admin, Role::Basic] {
            let legal = legal_departments_for(role);
            assert_eq!(legal.len(), 3);
            assert!(!legal.contains(&Department::Unassigned));
        }
    }

    #[test]
    fn parses_wire_names_case_insensitively() {
        assert_eq!("superadmin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!("superAdmin".parse::<Role>().unwrap(), Role::SuperAdmin);
        assert_eq!("OAC".parse::<Department>().unwrap(), Department::Oac);
        assert_eq!("Almacén".parse::<Department>().unwrap(), Department::Almacen);
        assert_eq!("none".parse::<Department>().unwrap(), Department::Unassigned);
        assert!("root".parse::<Role>().is_err());
        assert!("rrhh".parse::<Department>().is_err());
    }

    #[test]
    fn serde_uses_wire_names() {
        assert_eq!(serde_json::to_value(Role::SuperAdmin).unwrap(), "superAdmin");
        assert_eq!(serde_json::to_value(Department::Unassigned).unwrap(), "none");
        let d: Department = serde_json::from_value(serde_json::json!("OAC")).unwrap();
        assert_eq!(d, Department::Oac);
    }
}
