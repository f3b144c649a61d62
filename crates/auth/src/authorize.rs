//! Authorization engine: decides, for an (actor, target user) pair, whether
//! the target is visible, whether it may be changed, and which fields.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! 1. acting on yourself: read + write of the self-editable profile fields
//! 2. `superAdmin`: read + write of everything, role and department included
//! 3. `admin`: targets in the same department that are not `superAdmin`;
//!    profile fields plus role and department
//! 4. `coordinador`: `basic` targets in the same department; profile fields only
//! 5. anything else: no access
//!
//! Listing is defined through the same rules (see [`is_visible`]), so a user
//! is listed for an actor iff that actor may read it.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use casework_core::UserId;

use crate::invariants::Assignment;
use crate::roles::{Department, Role};

/// Mutable user fields, by wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserField {
    Cedula,
    Email,
    Phone,
    Username,
    FirstName,
    LastName,
    Role,
    Department,
}

impl UserField {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserField::Cedula => "cedula",
            UserField::Email => "email",
            UserField::Phone => "phone",
            UserField::Username => "username",
            UserField::FirstName => "first_name",
            UserField::LastName => "last_name",
            UserField::Role => "role",
            UserField::Department => "department",
        }
    }
}

/// Profile fields every granted writer may change.
pub const SELF_EDITABLE: [UserField; 6] = [
    UserField::Cedula,
    UserField::Email,
    UserField::Phone,
    UserField::Username,
    UserField::FirstName,
    UserField::LastName,
];

/// Read-only snapshot of the user performing a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorContext {
    pub user_id: UserId,
    pub role: Role,
    pub department: Department,
}

/// Read-only snapshot of the user being acted upon.
///
/// `user_id` is `None` for a prospective account that does not exist yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSnapshot {
    pub user_id: Option<UserId>,
    pub role: Role,
    pub department: Department,
}

impl TargetSnapshot {
    pub fn existing(user_id: UserId, role: Role, department: Department) -> Self {
        Self {
            user_id: Some(user_id),
            role,
            department,
        }
    }

    pub fn prospective(assignment: Assignment) -> Self {
        Self {
            user_id: None,
            role: assignment.role(),
            department: assignment.department(),
        }
    }
}

/// Which rule produced a grant; also names the view of the target exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewClass {
    OwnProfile,
    SuperAdmin,
    DepartmentAdmin,
    DepartmentCoordinator,
    NoAccess,
}

/// Outcome of [`resolve`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessGrant {
    pub view: ViewClass,
    pub can_read: bool,
    pub can_write: bool,
    pub editable_fields: BTreeSet<UserField>,
    pub role_field_editable: bool,
}

impl AccessGrant {
    fn granted(view: ViewClass, role_field_editable: bool) -> Self {
        let mut editable_fields: BTreeSet<UserField> = SELF_EDITABLE.into_iter().collect();
        if role_field_editable {
            editable_fields.insert(UserField::Role);
            editable_fields.insert(UserField::Department);
        }

        Self {
            view,
            can_read: true,
            can_write: true,
            editable_fields,
            role_field_editable,
        }
    }

    pub fn denied() -> Self {
        Self {
            view: ViewClass::NoAccess,
            can_read: false,
            can_write: false,
            editable_fields: BTreeSet::new(),
            role_field_editable: false,
        }
    }

    pub fn allows(&self, field: UserField) -> bool {
        self.can_write && self.editable_fields.contains(&field)
    }

    /// The subset of `fields` this grant does not allow writing.
    pub fn read_only_among(&self, fields: impl IntoIterator<Item = UserField>) -> Vec<UserField> {
        fields.into_iter().filter(|f| !self.allows(*f)).collect()
    }
}

/// Compute the grant for `actor` acting on `target`.
pub fn resolve(actor: &ActorContext, target: &TargetSnapshot) -> AccessGrant {
    if target.user_id == Some(actor.user_id) {
        return AccessGrant::granted(ViewClass::OwnProfile, false);
    }

    let same_department = target.department == actor.department;

    match actor.role {
        Role::SuperAdmin => AccessGrant::granted(ViewClass::SuperAdmin, true),
        Role::Admin if same_department && target.role != Role::SuperAdmin => {
            AccessGrant::granted(ViewClass::DepartmentAdmin, true)
        }
        Role::Coordinador if same_department && target.role == Role::Basic => {
            AccessGrant::granted(ViewClass::DepartmentCoordinator, false)
        }
        _ => AccessGrant::denied(),
    }
}

/// Listing predicate: `target` appears in the actor's user list.
pub fn is_visible(actor: &ActorContext, target: &TargetSnapshot) -> bool {
    resolve(actor, target).can_read
}

/// Whether `actor` may create an account with the given (validated) role and
/// department through the elevated creation path.
pub fn can_create(actor: &ActorContext, assignment: Assignment) -> bool {
    resolve(actor, &TargetSnapshot::prospective(assignment)).role_field_editable
}
