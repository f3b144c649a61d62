//! Account input validation: registration, elevated creation and login.
//!
//! Uniqueness of cédula/username/email needs the user store: the caller looks
//! up [`AccountInput::unique_keys`] and passes the clashes in, so they are
//! reported together with every other field problem.

use serde::Deserialize;
use thiserror::Error;

use casework_core::{FieldErrors, UserId};

use crate::cedula::Cedula;
use crate::invariants::{Assignment, InvariantError};
use crate::password::{PasswordHash, PasswordHasher};
use crate::roles::{Department, Role};
use crate::user::{NewUser, Profile, UniqueKeys, User, check_email, check_name, check_phone, check_username};

/// Raw account fields as submitted by a client.
#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct AccountInput {
    pub cedula: String,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub password: String,
    pub confirm_password: String,
    pub role: Option<String>,
    pub department: Option<String>,
}

impl core::fmt::Debug for AccountInput {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AccountInput")
            .field("cedula", &self.cedula)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .field("department", &self.department)
            .finish_non_exhaustive()
    }
}

impl AccountInput {
    /// The unique fields of this input that are well formed, normalized.
    pub fn unique_keys(&self) -> UniqueKeys {
        UniqueKeys {
            cedula: Cedula::parse(&self.cedula).ok(),
            username: check_username(&self.username).ok(),
            email: check_email(&self.email).ok(),
        }
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AccountError {
    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

impl From<FieldErrors> for AccountError {
    fn from(errors: FieldErrors) -> Self {
        AccountError::Validation(errors)
    }
}

/// Validate a self-service registration. The role is always `basic`,
/// whatever the input says. `clashes` are the uniqueness errors found for
/// [`AccountInput::unique_keys`].
pub fn validate_registration(
    input: &AccountInput,
    clashes: FieldErrors,
    hasher: &dyn PasswordHasher,
) -> Result<NewUser, AccountError> {
    let mut errors = clashes;
    let department = parse_department(input.department.as_deref(), &mut errors);
    build(input, Role::Basic, department, errors, hasher)
}

/// Validate an account created by a privileged actor; role and department
/// come from the input. Whether the actor may create it is decided by
/// [`crate::authorize::can_create`] on the returned assignment.
pub fn validate_account(
    input: &AccountInput,
    clashes: FieldErrors,
    hasher: &dyn PasswordHasher,
) -> Result<NewUser, AccountError> {
    let mut errors = clashes;
    let role = match input.role.as_deref().map(str::trim).filter(|r| !r.is_empty()) {
        None => {
            errors.add("role", "role is required");
            Role::Basic
        }
        Some(raw) => raw.parse::<Role>().unwrap_or_else(|e| {
            errors.add("role", e.to_string());
            Role::Basic
        }),
    };
    let department = parse_department(input.department.as_deref(), &mut errors);
    build(input, role, department, errors, hasher)
}

fn parse_department(raw: Option<&str>, errors: &mut FieldErrors) -> Department {
    match raw.map(str::trim).filter(|d| !d.is_empty()) {
        None => Department::Unassigned,
        Some(raw) => raw.parse::<Department>().unwrap_or_else(|e| {
            errors.add("department", e.to_string());
            Department::Unassigned
        }),
    }
}

fn build(
    input: &AccountInput,
    role: Role,
    department: Department,
    mut errors: FieldErrors,
    hasher: &dyn PasswordHasher,
) -> Result<NewUser, AccountError> {
    let cedula = Cedula::parse(&input.cedula).map_err(|e| errors.add("cedula", e.to_string())).ok();
    let username = check_username(&input.username).map_err(|m| errors.add("username", m)).ok();
    let email = check_email(&input.email).map_err(|m| errors.add("email", m)).ok();
    let phone = check_phone(input.phone.as_deref()).map_err(|m| errors.add("phone", m)).ok();
    let first_name = check_name(input.first_name.as_deref()).map_err(|m| errors.add("first_name", m)).ok();
    let last_name = check_name(input.last_name.as_deref()).map_err(|m| errors.add("last_name", m)).ok();

    if input.password.is_empty() {
        errors.add("password", "password is required");
    }
    if input.confirm_password != input.password {
        errors.add("confirm_password", "passwords do not match");
    }

    let assignment = Assignment::new(role, department);
    if let Err(invariant) = &assignment {
        if !errors.is_empty() {
            errors.add("department", invariant.message());
        }
    }

    match (cedula, username, email, phone, first_name, last_name) {
        (Some(cedula), Some(username), Some(email), Some(phone), Some(first_name), Some(last_name))
            if errors.is_empty() =>
        {
            Ok(NewUser {
                profile: Profile {
                    cedula,
                    username,
                    email,
                    phone,
                    first_name,
                    last_name,
                },
                assignment: assignment?,
                password_hash: hasher.hash(&input.password),
            })
        }
        _ => Err(AccountError::Validation(errors)),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Login
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown cédula and wrong password are deliberately the same error.
    #[error("invalid credentials")]
    InvalidCredentials,
}

#[derive(Clone, Default, Deserialize)]
#[serde(default)]
pub struct LoginInput {
    pub cedula: String,
    pub password: String,
}

impl core::fmt::Debug for LoginInput {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("LoginInput").field("cedula", &self.cedula).finish_non_exhaustive()
    }
}

impl LoginInput {
    /// Normalized lookup key. A malformed cédula cannot match any account.
    pub fn lookup_key(&self) -> Result<Cedula, AuthError> {
        Cedula::parse(&self.cedula).map_err(|_| AuthError::InvalidCredentials)
    }
}

// Well-formed hash of a random password; verified against when no account
// matches so both failure paths do the same work.
const DUMMY_HASH: &str =
    "sha256$5f1c0e7a9b3d4c2e8a6f0b1d3e5c7a9b$0c8f1e2d3b4a596877665544332211ffeeddccbbaa99887766554433221100aa";

/// Check `password` against the account found for the login, if any.
pub fn verify_login(candidate: Option<&User>, password: &str, hasher: &dyn PasswordHasher) -> Result<UserId, AuthError> {
    match candidate {
        Some(user) if hasher.verify(password, user.password_hash()) => Ok(user.user_id()),
        Some(_) => Err(AuthError::InvalidCredentials),
        None => {
            let _ = hasher.verify(password, &PasswordHash::from_encoded(DUMMY_HASH));
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::password::SaltedSha256Hasher;

    fn input() -> AccountInput {
        AccountInput {
            cedula: "123-456-78".to_string(),
            username: "maria".to_string(),
            email: "maria@example.com".to_string(),
            phone: Some("04145551234".to_string()),
            first_name: Some("María".to_string()),
            last_name: Some("Rojas".to_string()),
            password: "s3cret".to_string(),
            confirm_password: "s3cret".to_string(),
            role: None,
            department: Some("farmacia".to_string()),
        }
    }

    #[test]
    fn registration_normalizes_cedula_and_forces_basic() {
        let mut raw = input();
        raw.role = Some("superAdmin".to_string());

        let new = validate_registration(&raw, FieldErrors::new(), &SaltedSha256Hasher).unwrap();
        assert_eq!(new.profile.cedula.as_str(), "12345678");
        assert_eq!(new.assignment.role(), Role::Basic);
        assert_eq!(new.assignment.department(), Department::Farmacia);
        assert!(SaltedSha256Hasher.verify("s3cret", &new.password_hash));
    }

    #[test]
    fn short_cedula_is_a_field_error() {
        let mut raw = input();
        raw.cedula = "1234567".to_string();

        let Err(AccountError::Validation(errors)) = validate_registration(&raw, FieldErrors::new(), &SaltedSha256Hasher) else {
            panic!("expected validation error");
        };
        assert!(errors.contains("cedula"));
    }

    #[test]
    fn registration_without_department_is_an_invariant_error() {
        let mut raw = input();
        raw.department = None;

        let err = validate_registration(&raw, FieldErrors::new(), &SaltedSha256Hasher).unwrap_err();
        assert!(matches!(err, AccountError::Invariant(e) if e.attempted_department == Department::Unassigned));
    }

    #[test]
    fn all_problems_are_reported_together() {
        let mut raw = input();
        raw.cedula = "12".to_string();
        raw.email = "nope".to_string();
        raw.confirm_password = "different".to_string();
        raw.department = None;

        let Err(AccountError::Validation(errors)) = validate_registration(&raw, FieldErrors::new(), &SaltedSha256Hasher) else {
            panic!("expected validation error");
        };
        for field in ["cedula", "email", "confirm_password", "department"] {
            assert!(errors.contains(field), "missing {field}");
        }
    }

    #[test]
    fn clashes_are_reported_with_other_field_errors() {
        let mut raw = input();
        raw.email = "not-an-email".to_string();
        let keys = raw.unique_keys();
        assert_eq!(keys.cedula.as_ref().map(Cedula::as_str), Some("12345678"));
        assert_eq!(keys.email, None);

        let mut clashes = FieldErrors::single("cedula", "cédula is already in use");
        clashes.add("username", "username is already in use");

        let Err(AccountError::Validation(errors)) = validate_registration(&raw, clashes, &SaltedSha256Hasher) else {
            panic!("expected validation error");
        };
        assert_eq!(errors.fields().collect::<Vec<_>>(), vec!["cedula", "email", "username"]);
    }

    #[test]
    fn elevated_creation_forces_none_for_super_admin() {
        let mut raw = input();
        raw.role = Some("superAdmin".to_string());
        raw.department = Some("farmacia".to_string());

        let new = validate_account(&raw, FieldErrors::new(), &SaltedSha256Hasher).unwrap();
        assert_eq!(new.assignment.role(), Role::SuperAdmin);
        assert_eq!(new.assignment.department(), Department::Unassigned);
    }

    #[test]
    fn elevated_creation_requires_a_known_role() {
        let mut raw = input();
        raw.role = Some("owner".to_string());

        let Err(AccountError::Validation(errors)) = validate_account(&raw, FieldErrors::new(), &SaltedSha256Hasher) else {
            panic!("expected validation error");
        };
        assert!(errors.contains("role"));
    }

    #[test]
    fn login_failures_are_indistinguishable() {
        let hasher = SaltedSha256Hasher;
        let user = User::new(UserId::new(7), validate_registration(&input(), FieldErrors::new(), &hasher).unwrap(), Utc::now());

        assert_eq!(verify_login(Some(&user), "s3cret", &hasher), Ok(UserId::new(7)));
        assert_eq!(verify_login(Some(&user), "wrong", &hasher), Err(AuthError::InvalidCredentials));
        assert_eq!(verify_login(None, "s3cret", &hasher), Err(AuthError::InvalidCredentials));

        let bad = LoginInput {
            cedula: "abc".to_string(),
            password: "s3cret".to_string(),
        };
        assert_eq!(bad.lookup_key(), Err(AuthError::InvalidCredentials));
    }

    #[test]
    fn debug_output_hides_passwords() {
        let rendered = format!("{:?}", input());
        assert!(!rendered.contains("s3cret"));
    }
}
