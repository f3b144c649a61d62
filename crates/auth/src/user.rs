//! Staff account entity.
//!
//! This module implements the user record and its guarded mutation path:
//! every change goes through [`User::apply_patch`], which resolves the
//! caller's grant against the *current* state, rejects fields the caller may
//! not touch, and re-validates the merged role/department pair.

use chrono::{DateTime, Utc};
use serde::Deserialize;
use thiserror::Error;

use casework_core::{AggregateRoot, FieldErrors, UserId};

use crate::authorize::{ActorContext, TargetSnapshot, UserField, resolve};
use crate::cedula::Cedula;
use crate::invariants::{Assignment, InvariantError};
use crate::password::PasswordHash;
use crate::roles::{Department, Role};

const MAX_NAME_LEN: usize = 150;
const MAX_PHONE_LEN: usize = 15;

// ─────────────────────────────────────────────────────────────────────────────
// Profile
// ─────────────────────────────────────────────────────────────────────────────

/// Identity and contact data of a user (everything except role/department).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub cedula: Cedula,
    pub username: String,
    pub email: String,
    pub phone: Option<String>,
    pub first_name: String,
    pub last_name: String,
}

/// Normalized values of the unique user fields a change would set.
/// Fields left as `None` are not checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UniqueKeys {
    pub cedula: Option<Cedula>,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl From<&Profile> for UniqueKeys {
    fn from(profile: &Profile) -> Self {
        Self {
            cedula: Some(profile.cedula.clone()),
            username: Some(profile.username.clone()),
            email: Some(profile.email.clone()),
        }
    }
}

/// Reports the unique fields whose values already belong to another user.
pub type ClashLookup<'a> = &'a dyn Fn(&UniqueKeys) -> FieldErrors;

pub(crate) fn check_username(raw: &str) -> Result<String, &'static str> {
    let value = raw.trim();
    if value.is_empty() {
        return Err("username is required");
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err("username must be at most 150 characters");
    }
    Ok(value.to_string())
}

pub(crate) fn check_email(raw: &str) -> Result<String, &'static str> {
    let value = raw.trim();
    if value.is_empty() {
        return Err("email is required");
    }
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() && !domain.contains('@') => {
            Ok(value.to_lowercase())
        }
        _ => Err("enter a valid email address"),
    }
}

pub(crate) fn check_phone(raw: Option<&str>) -> Result<Option<String>, &'static str> {
    let Some(value) = raw.map(str::trim).filter(|v| !v.is_empty()) else {
        return Ok(None);
    };
    if value.chars().count() > MAX_PHONE_LEN {
        return Err("phone number must be at most 15 characters");
    }
    Ok(Some(value.to_string()))
}

pub(crate) fn check_name(raw: Option<&str>) -> Result<String, &'static str> {
    let value = raw.unwrap_or_default().trim();
    if value.chars().count() > MAX_NAME_LEN {
        return Err("name must be at most 150 characters");
    }
    Ok(value.to_string())
}

// ─────────────────────────────────────────────────────────────────────────────
// User
// ─────────────────────────────────────────────────────────────────────────────

/// Everything needed to persist a new account; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub profile: Profile,
    pub assignment: Assignment,
    pub password_hash: PasswordHash,
}

/// Staff account.
///
/// # Invariants
/// - `role = superAdmin` implies `department = none`.
/// - `role = coordinador` implies `department = oac`.
/// - `admin` and `basic` users always have a real department.
///
/// The role/department pair is held as an [`Assignment`], which can only be
/// built through validation.
#[derive(Debug, Clone)]
pub struct User {
    id: UserId,
    profile: Profile,
    assignment: Assignment,
    password_hash: PasswordHash,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(id: UserId, new: NewUser, now: DateTime<Utc>) -> Self {
        Self {
            id,
            profile: new.profile,
            assignment: new.assignment,
            password_hash: new.password_hash,
            version: 1,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn user_id(&self) -> UserId {
        self.id
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn role(&self) -> Role {
        self.assignment.role()
    }

    pub fn department(&self) -> Department {
        self.assignment.department()
    }

    pub fn assignment(&self) -> Assignment {
        self.assignment
    }

    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// This user as the actor of a request.
    pub fn actor(&self) -> ActorContext {
        ActorContext {
            user_id: self.id,
            role: self.role(),
            department: self.department(),
        }
    }

    /// This user as the target of a request.
    pub fn snapshot(&self) -> TargetSnapshot {
        TargetSnapshot::existing(self.id, self.role(), self.department())
    }
}

impl AggregateRoot for User {
    type Id = UserId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Patch
// ─────────────────────────────────────────────────────────────────────────────

/// Partial update of a user. Absent fields are left unchanged; an empty
/// `phone` clears it. Unknown keys are a deserialization error.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct UserPatch {
    pub cedula: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<String>,
    pub department: Option<String>,
}

impl UserPatch {
    /// Fields present in the patch.
    pub fn touched_fields(&self) -> Vec<UserField> {
        [
            (UserField::Cedula, self.cedula.is_some()),
            (UserField::Email, self.email.is_some()),
            (UserField::Phone, self.phone.is_some()),
            (UserField::Username, self.username.is_some()),
            (UserField::FirstName, self.first_name.is_some()),
            (UserField::LastName, self.last_name.is_some()),
            (UserField::Role, self.role.is_some()),
            (UserField::Department, self.department.is_some()),
        ]
        .into_iter()
        .filter_map(|(field, present)| present.then_some(field))
        .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.touched_fields().is_empty()
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PatchError {
    /// The caller may not change this user (or may not move it where requested).
    #[error("forbidden")]
    Forbidden,

    #[error("validation failed: {0}")]
    Validation(FieldErrors),

    #[error(transparent)]
    Invariant(#[from] InvariantError),
}

impl User {
    /// Produce the next state of this user after `actor` applies `patch`.
    ///
    /// Authorization against the current state is decided first and reveals
    /// no field detail. After that every problem is collected together:
    /// read-only fields, malformed values, values `taken` by another user and
    /// an illegal role/department pair on the merged state. Finally a
    /// role/department change must leave the target inside the actor's reach.
    pub fn apply_patch(
        &self,
        actor: &ActorContext,
        patch: &UserPatch,
        taken: ClashLookup<'_>,
        now: DateTime<Utc>,
    ) -> Result<User, PatchError> {
        let grant = resolve(actor, &self.snapshot());
        if !grant.can_write {
            return Err(PatchError::Forbidden);
        }

        let mut errors = FieldErrors::new();
        let read_only = grant.read_only_among(patch.touched_fields());
        for field in &read_only {
            errors.add(field.as_str(), "field is read-only for this caller");
        }
        let writable = |field: UserField| !read_only.contains(&field);

        let mut profile = self.profile.clone();
        let mut keys = UniqueKeys::default();

        if let Some(raw) = patch.cedula.as_ref().filter(|_| writable(UserField::Cedula)) {
            match Cedula::parse(raw) {
                Ok(c) => {
                    keys.cedula = Some(c.clone());
                    profile.cedula = c;
                }
                Err(e) => errors.add("cedula", e.to_string()),
            }
        }
        if let Some(raw) = patch.email.as_ref().filter(|_| writable(UserField::Email)) {
            match check_email(raw) {
                Ok(v) => {
                    keys.email = Some(v.clone());
                    profile.email = v;
                }
                Err(msg) => errors.add("email", msg),
            }
        }
        if let Some(raw) = patch.phone.as_ref().filter(|_| writable(UserField::Phone)) {
            match check_phone(Some(raw)) {
                Ok(v) => profile.phone = v,
                Err(msg) => errors.add("phone", msg),
            }
        }
        if let Some(raw) = patch.username.as_ref().filter(|_| writable(UserField::Username)) {
            match check_username(raw) {
                Ok(v) => {
                    keys.username = Some(v.clone());
                    profile.username = v;
                }
                Err(msg) => errors.add("username", msg),
            }
        }
        if let Some(raw) = patch.first_name.as_ref().filter(|_| writable(UserField::FirstName)) {
            match check_name(Some(raw)) {
                Ok(v) => profile.first_name = v,
                Err(msg) => errors.add("first_name", msg),
            }
        }
        if let Some(raw) = patch.last_name.as_ref().filter(|_| writable(UserField::LastName)) {
            match check_name(Some(raw)) {
                Ok(v) => profile.last_name = v,
                Err(msg) => errors.add("last_name", msg),
            }
        }
        if keys != UniqueKeys::default() {
            errors.extend(taken(&keys));
        }

        let mut role = self.role();
        let mut department = self.department();
        if let Some(raw) = patch.role.as_ref().filter(|_| writable(UserField::Role)) {
            match raw.parse::<Role>() {
                Ok(r) => role = r,
                Err(e) => errors.add("role", e.to_string()),
            }
        }
        if let Some(raw) = patch.department.as_ref().filter(|_| writable(UserField::Department)) {
            match raw.parse::<Department>() {
                Ok(d) => department = d,
                Err(e) => errors.add("department", e.to_string()),
            }
        }

        let assignment = Assignment::new(role, department);
        if !errors.is_empty() {
            if let Err(invariant) = &assignment {
                errors.add("department", invariant.message());
            }
            return Err(PatchError::Validation(errors));
        }
        let assignment = assignment?;

        let next = User {
            profile,
            assignment,
            version: self.version + 1,
            updated_at: now,
            ..self.clone()
        };

        if assignment != self.assignment && !resolve(actor, &next.snapshot()).role_field_editable {
            return Err(PatchError::Forbidden);
        }

        Ok(next)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
