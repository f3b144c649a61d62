//! Inventory record keeping.

use std::sync::Arc;

use chrono::Utc;

use casework_auth::ActorContext;
use casework_core::InventoryItemId;
use casework_inventory::{InventoryInput, InventoryItem, SupplyTotal, next_item_code, totals_by_supply_type};

use crate::error::{ServiceError, ServiceResult};
use crate::retry::RetryPolicy;
use crate::store::InventoryStore;

#[derive(Clone)]
pub struct InventoryService {
    items: Arc<dyn InventoryStore>,
    retry: RetryPolicy,
}

impl InventoryService {
    pub fn new(items: Arc<dyn InventoryStore>, retry: RetryPolicy) -> Self {
        Self { items, retry }
    }

    pub async fn list(&self, _actor: &ActorContext) -> ServiceResult<Vec<InventoryItem>> {
        Ok(self.retry.run("inventory.list", || self.items.list()).await?)
    }

    pub async fn get(&self, _actor: &ActorContext, id: InventoryItemId) -> ServiceResult<InventoryItem> {
        self.retry
            .run("inventory.get", || self.items.get(id))
            .await?
            .ok_or(ServiceError::NotFound)
    }

    pub async fn create(&self, actor: &ActorContext, input: &InventoryInput) -> ServiceResult<InventoryItem> {
        let item = self
            .retry
            .run("inventory.create", || {
                self.items.create_with(&mut |id, last_code| {
                    Ok(InventoryItem::create(id, next_item_code(last_code), input, Utc::now())?)
                })
            })
            .await?;

        tracing::info!(user_id = %actor.user_id, item_id = %item.item_id(), code = item.code(), "inventory item created");
        Ok(item)
    }

    pub async fn update(
        &self,
        actor: &ActorContext,
        id: InventoryItemId,
        input: &InventoryInput,
    ) -> ServiceResult<InventoryItem> {
        let item = self
            .retry
            .run("inventory.update", || {
                self.items.update_with(id, &mut |current| Ok(current.apply(input)?))
            })
            .await?;

        tracing::info!(user_id = %actor.user_id, item_id = %id, "inventory item updated");
        Ok(item)
    }

    pub async fn delete(&self, actor: &ActorContext, id: InventoryItemId) -> ServiceResult<()> {
        self.retry.run("inventory.delete", || self.items.delete(id)).await?;
        tracing::info!(user_id = %actor.user_id, item_id = %id, "inventory item deleted");
        Ok(())
    }

    pub async fn totals(&self, _actor: &ActorContext) -> ServiceResult<Vec<SupplyTotal>> {
        let items = self.retry.run("inventory.list", || self.items.list()).await?;
        Ok(totals_by_supply_type(&items))
    }
}
