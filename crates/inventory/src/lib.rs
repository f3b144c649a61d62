//! Inventory of medical aid supplies.
//!
//! Record-keeping rules only (no IO, no HTTP, no storage): article code
//! numbering, defaults, stock consistency and per-type totals.

pub mod item;

pub use item::{
    DEFAULT_STATE, DEFAULT_SUPPLY_TYPE, InventoryInput, InventoryItem, SupplyTotal, next_item_code,
    totals_by_supply_type,
};
