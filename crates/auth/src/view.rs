//! Projection of a user record through an [`AccessGrant`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use casework_core::UserId;

use crate::authorize::{AccessGrant, UserField, ViewClass};
use crate::roles::{Department, Role};
use crate::user::User;

/// What a caller is shown about a user, and what it may change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserView {
    pub id: UserId,
    pub cedula: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department: Department,
    pub department_display: &'static str,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub view: ViewClass,
    pub editable_fields: BTreeSet<UserField>,
}

impl UserView {
    /// `None` when the grant does not allow reading.
    pub fn project(user: &User, grant: &AccessGrant) -> Option<Self> {
        if !grant.can_read {
            return None;
        }

        let profile = user.profile();
        let editable_fields = if grant.can_write {
            grant.editable_fields.clone()
        } else {
            BTreeSet::new()
        };

        Some(Self {
            id: user.user_id(),
            cedula: profile.cedula.as_str().to_string(),
            username: profile.username.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            role: user.role(),
            department: user.department(),
            department_display: user.department().display_name(),
            created_at: user.created_at(),
            updated_at: user.updated_at(),
            view: grant.view,
            editable_fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authorize::resolve;
    use crate::cedula::Cedula;
    use crate::invariants::Assignment;
    use crate::password::{PasswordHasher, SaltedSha256Hasher};
    use crate::user::{NewUser, Profile};

    fn user(id: u64, role: Role, department: Department) -> User {
        User::new(
            UserId::new(id),
            NewUser {
                profile: Profile {
                    cedula: Cedula::parse("V-12.345.678").unwrap(),
                    username: format!("u{id}"),
                    email: format!("u{id}@example.com"),
                    phone: None,
                    first_name: String::new(),
                    last_name: String::new(),
                },
                assignment: Assignment::new(role, department).unwrap(),
                password_hash: SaltedSha256Hasher.hash("pw"),
            },
            Utc::now(),
        )
    }

    #[test]
    fn unreadable_targets_project_to_nothing() {
        let actor = user(1, Role::Basic, Department::Oac);
        let target = user(2, Role::Basic, Department::Oac);
        assert!(UserView::project(&target, &resolve(&actor.actor(), &target.snapshot())).is_none());
    }

    #[test]
    fn view_carries_grant_and_display_name() {
        let actor = user(1, Role::Admin, Department::Almacen);
        let target = user(2, Role::Basic, Department::Almacen);

        let view = UserView::project(&target, &resolve(&actor.actor(), &target.snapshot())).unwrap();
        assert_eq!(view.view, ViewClass::DepartmentAdmin);
        assert_eq!(view.department_display, "Almacén");
        assert!(view.editable_fields.contains(&UserField::Role));

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["cedula"], "12345678");
        assert_eq!(json["department"], "almacen");
        assert!(json.get("password_hash").is_none());
    }

    #[test]
    fn own_profile_view_hides_role_editability() {
        let me = user(1, Role::SuperAdmin, Department::Unassigned);
        let view = UserView::project(&me, &resolve(&me.actor(), &me.snapshot())).unwrap();
        assert_eq!(view.view, ViewClass::OwnProfile);
        assert!(!view.editable_fields.contains(&UserField::Role));
        assert_eq!(view.department_display, "Sin departamento");
    }
}
