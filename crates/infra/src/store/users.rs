//! User persistence.

use chrono::{DateTime, Utc};

use casework_auth::{Cedula, ClashLookup, NewUser, UniqueKeys, User};
use casework_core::{FieldErrors, UserId};

use super::StoreError;
use super::memory::Table;
use crate::error::ServiceError;

pub trait UserStore: Send + Sync {
    fn get(&self, id: UserId) -> Result<Option<User>, StoreError>;

    fn find_by_cedula(&self, cedula: &Cedula) -> Result<Option<User>, StoreError>;

    fn query(&self, predicate: &dyn Fn(&User) -> bool) -> Result<Vec<User>, StoreError>;

    /// Unique fields of `keys` already used by a user other than `exclude`.
    fn clashes(&self, keys: &UniqueKeys, exclude: Option<UserId>) -> Result<FieldErrors, StoreError>;

    /// Persist a new account; cédula, username and email must be free.
    fn insert(&self, new: NewUser, now: DateTime<Utc>) -> Result<User, StoreError>;

    /// Replace the stored user with `change(current, taken)`, atomically.
    ///
    /// The closure sees the committed state under the write lock, and `taken`
    /// answers uniqueness questions against every other user under that same
    /// lock. The result is checked once more before it is saved.
    fn update_with(
        &self,
        id: UserId,
        change: &mut dyn FnMut(&User, ClashLookup<'_>) -> Result<User, ServiceError>,
    ) -> Result<User, ServiceError>;
}

/// Unique-field clashes of `candidate` with `existing`, skipping `exclude`.
fn uniqueness_errors<'a>(
    candidate: &UniqueKeys,
    existing: impl Iterator<Item = &'a User>,
    exclude: Option<UserId>,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    for other in existing.filter(|u| Some(u.user_id()) != exclude) {
        let p = other.profile();
        if candidate.cedula.as_ref() == Some(&p.cedula) && !errors.contains("cedula") {
            errors.add("cedula", "cédula is already in use");
        }
        if candidate.username.as_deref() == Some(p.username.as_str()) && !errors.contains("username") {
            errors.add("username", "username is already in use");
        }
        if candidate.email.as_deref() == Some(p.email.as_str()) && !errors.contains("email") {
            errors.add("email", "email is already in use");
        }
    }
    errors
}

#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    table: Table<User>,
}

impl InMemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserStore for InMemoryUserStore {
    fn get(&self, id: UserId) -> Result<Option<User>, StoreError> {
        self.table.get(id.get())
    }

    fn find_by_cedula(&self, cedula: &Cedula) -> Result<Option<User>, StoreError> {
        Ok(self.table.filter(&|u| &u.profile().cedula == cedula)?.into_iter().next())
    }

    fn query(&self, predicate: &dyn Fn(&User) -> bool) -> Result<Vec<User>, StoreError> {
        self.table.filter(predicate)
    }

    fn clashes(&self, keys: &UniqueKeys, exclude: Option<UserId>) -> Result<FieldErrors, StoreError> {
        let state = self.table.read()?;
        Ok(uniqueness_errors(keys, state.rows.values(), exclude))
    }

    fn insert(&self, new: NewUser, now: DateTime<Utc>) -> Result<User, StoreError> {
        let mut state = self.table.write()?;

        let clashes = uniqueness_errors(&UniqueKeys::from(&new.profile), state.rows.values(), None);
        if !clashes.is_empty() {
            return Err(StoreError::Duplicate(clashes));
        }

        let id = UserId::new(state.next_id());
        let user = User::new(id, new, now);
        state.rows.insert(id.get(), user.clone());
        Ok(user)
    }

    fn update_with(
        &self,
        id: UserId,
        change: &mut dyn FnMut(&User, ClashLookup<'_>) -> Result<User, ServiceError>,
    ) -> Result<User, ServiceError> {
        let mut state = self.table.write()?;

        let current = state.rows.get(&id.get()).ok_or(ServiceError::NotFound)?;
        let taken = |keys: &UniqueKeys| uniqueness_errors(keys, state.rows.values(), Some(id));
        let next = change(current, &taken)?;

        let clashes = uniqueness_errors(&UniqueKeys::from(next.profile()), state.rows.values(), Some(id));
        if !clashes.is_empty() {
            return Err(ServiceError::Validation(clashes));
        }

        state.rows.insert(id.get(), next.clone());
        Ok(next)
    }
}
