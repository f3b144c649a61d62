//! Inventory persistence.

use casework_core::InventoryItemId;
use casework_inventory::InventoryItem;

use super::StoreError;
use super::memory::Table;
use crate::error::ServiceError;

pub trait InventoryStore: Send + Sync {
    fn get(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, StoreError>;

    fn list(&self) -> Result<Vec<InventoryItem>, StoreError>;

    /// Create a record atomically. `build` receives the id reserved for it and
    /// the code of the most recently created item.
    fn create_with(
        &self,
        build: &mut dyn FnMut(InventoryItemId, Option<&str>) -> Result<InventoryItem, ServiceError>,
    ) -> Result<InventoryItem, ServiceError>;

    fn update_with(
        &self,
        id: InventoryItemId,
        change: &mut dyn FnMut(&InventoryItem) -> Result<InventoryItem, ServiceError>,
    ) -> Result<InventoryItem, ServiceError>;

    fn delete(&self, id: InventoryItemId) -> Result<(), StoreError>;
}

#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    table: Table<InventoryItem>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InventoryStore for InMemoryInventoryStore {
    fn get(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, StoreError> {
        self.table.get(id.get())
    }

    fn list(&self) -> Result<Vec<InventoryItem>, StoreError> {
        self.table.filter(&|_| true)
    }

    fn create_with(
        &self,
        build: &mut dyn FnMut(InventoryItemId, Option<&str>) -> Result<InventoryItem, ServiceError>,
    ) -> Result<InventoryItem, ServiceError> {
        let mut state = self.table.write()?;
        let last_code = state.rows.values().next_back().map(|item| item.code().to_string());
        let id = InventoryItemId::new(state.next_id());

        let item = build(id, last_code.as_deref())?;
        state.rows.insert(id.get(), item.clone());
        Ok(item)
    }

    fn update_with(
        &self,
        id: InventoryItemId,
        change: &mut dyn FnMut(&InventoryItem) -> Result<InventoryItem, ServiceError>,
    ) -> Result<InventoryItem, ServiceError> {
        let mut state = self.table.write()?;
        let current = state.rows.get(&id.get()).ok_or(ServiceError::NotFound)?;
        let next = change(current)?;
        state.rows.insert(id.get(), next.clone());
        Ok(next)
    }

    fn delete(&self, id: InventoryItemId) -> Result<(), StoreError> {
        let mut state = self.table.write()?;
        state.rows.remove(&id.get()).map(|_| ()).ok_or(StoreError::NotFound)
    }
}
