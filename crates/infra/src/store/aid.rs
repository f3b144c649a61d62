//! Aid-request and aid-type persistence.

use chrono::{DateTime, Utc};

use casework_aid::{AidRequest, AidType, NewAidRequest};
use casework_core::{AidRequestId, AidTypeId};

use super::StoreError;
use super::memory::Table;
use crate::error::ServiceError;

pub trait AidRequestStore: Send + Sync {
    fn get(&self, id: AidRequestId) -> Result<Option<AidRequest>, StoreError>;

    fn list(&self) -> Result<Vec<AidRequest>, StoreError>;

    /// Persist a request together with all of its line items in one step.
    fn insert(&self, new: NewAidRequest, now: DateTime<Utc>) -> Result<AidRequest, StoreError>;

    fn update_with(
        &self,
        id: AidRequestId,
        change: &mut dyn FnMut(&AidRequest) -> Result<AidRequest, ServiceError>,
    ) -> Result<AidRequest, ServiceError>;
}

pub trait AidTypeStore: Send + Sync {
    fn list(&self) -> Result<Vec<AidType>, StoreError>;

    /// Add `name` unless it already exists. Returns whether it was added.
    fn insert_if_absent(&self, name: &str) -> Result<bool, StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryAidRequestStore {
    table: Table<AidRequest>,
}

impl InMemoryAidRequestStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        self.table.len()
    }
}

impl AidRequestStore for InMemoryAidRequestStore {
    fn get(&self, id: AidRequestId) -> Result<Option<AidRequest>, StoreError> {
        self.table.get(id.get())
    }

    fn list(&self) -> Result<Vec<AidRequest>, StoreError> {
        self.table.filter(&|_| true)
    }

    fn insert(&self, new: NewAidRequest, now: DateTime<Utc>) -> Result<AidRequest, StoreError> {
        let mut state = self.table.write()?;
        let id = AidRequestId::new(state.next_id());
        let request = AidRequest::new(id, new, now);
        state.rows.insert(id.get(), request.clone());
        Ok(request)
    }

    fn update_with(
        &self,
        id: AidRequestId,
        change: &mut dyn FnMut(&AidRequest) -> Result<AidRequest, ServiceError>,
    ) -> Result<AidRequest, ServiceError> {
        let mut state = self.table.write()?;
        let current = state.rows.get(&id.get()).ok_or(ServiceError::NotFound)?;
        let next = change(current)?;
        state.rows.insert(id.get(), next.clone());
        Ok(next)
    }
}

#[derive(Debug, Default)]
pub struct InMemoryAidTypeStore {
    table: Table<AidType>,
}

impl InMemoryAidTypeStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl AidTypeStore for InMemoryAidTypeStore {
    fn list(&self) -> Result<Vec<AidType>, StoreError> {
        self.table.filter(&|_| true)
    }

    fn insert_if_absent(&self, name: &str) -> Result<bool, StoreError> {
        let mut state = self.table.write()?;
        if state.rows.values().any(|t| t.name == name) {
            return Ok(false);
        }
        let id = AidTypeId::new(state.next_id());
        state.rows.insert(
            id.get(),
            AidType {
                id,
                name: name.to_string(),
            },
        );
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aid_type_names_are_unique() {
        let store = InMemoryAidTypeStore::new();
        assert!(store.insert_if_absent("ANDADERA").unwrap());
        assert!(!store.insert_if_absent("ANDADERA").unwrap());
        assert!(store.insert_if_absent("NEBULIZADOR").unwrap());

        let ids: Vec<_> = store.list().unwrap().into_iter().map(|t| (t.id, t.name)).collect();
        assert_eq!(
            ids,
            vec![
                (AidTypeId::new(1), "ANDADERA".to_string()),
                (AidTypeId::new(2), "NEBULIZADOR".to_string()),
            ]
        );
    }
}
