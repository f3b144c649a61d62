use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use casework_core::{AggregateRoot, FieldErrors, InventoryItemId};

pub const DEFAULT_SUPPLY_TYPE: &str = "No especificado";
pub const DEFAULT_STATE: &str = "Disponible";

const FIRST_CODE: &str = "0001";

/// Aggregate root: InventoryItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryItem {
    id: InventoryItemId,
    code: String,
    supply_type: String,
    description: Option<String>,
    state: String,
    invoice_number: Option<String>,
    total_stock: u64,
    delivered_stock: u64,
    acquired_on: NaiveDate,
    maintenance_on: Option<NaiveDate>,
    category: Option<String>,
    #[serde(skip)]
    created_at: DateTime<Utc>,
    #[serde(skip)]
    version: u64,
}

impl InventoryItem {
    pub fn item_id(&self) -> InventoryItemId {
        self.id
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn supply_type(&self) -> &str {
        &self.supply_type
    }

    pub fn state(&self) -> &str {
        &self.state
    }

    pub fn total_stock(&self) -> u64 {
        self.total_stock
    }

    pub fn delivered_stock(&self) -> u64 {
        self.delivered_stock
    }

    pub fn acquired_on(&self) -> NaiveDate {
        self.acquired_on
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl AggregateRoot for InventoryItem {
    type Id = InventoryItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Code for the next item, derived from the most recently created one.
///
/// `"0041"` is followed by `"0042"`; anything non-numeric (or no item at all)
/// restarts at `"0001"`.
pub fn next_item_code(last: Option<&str>) -> String {
    match last {
        Some(code) if !code.is_empty() && code.chars().all(|c| c.is_ascii_digit()) => match code.parse::<u64>() {
            Ok(n) => format!("{:04}", n.saturating_add(1)),
            Err(_) => FIRST_CODE.to_string(),
        },
        _ => FIRST_CODE.to_string(),
    }
}

/// Fields of an inventory record as sent by a client, for both create and
/// partial update. `id` and `code` are not accepted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InventoryInput {
    pub supply_type: Option<String>,
    pub description: Option<String>,
    pub state: Option<String>,
    pub invoice_number: Option<String>,
    pub total_stock: Option<i64>,
    pub delivered_stock: Option<i64>,
    pub acquired_on: Option<NaiveDate>,
    pub maintenance_on: Option<NaiveDate>,
    pub category: Option<String>,
}

fn text(value: &Option<String>) -> Option<String> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

fn check_len(errors: &mut FieldErrors, field: &str, value: &Option<String>, max: usize) {
    if let Some(v) = value {
        if v.chars().count() > max {
            errors.add(field, format!("must be at most {max} characters"));
        }
    }
}

fn stock(errors: &mut FieldErrors, field: &str, value: Option<i64>, current: u64) -> u64 {
    match value {
        None => current,
        Some(n) => u64::try_from(n).unwrap_or_else(|_| {
            errors.add(field, "must be zero or a positive integer");
            current
        }),
    }
}

impl InventoryInput {
    fn check_lengths(&self, errors: &mut FieldErrors) {
        check_len(errors, "supply_type", &self.supply_type, 250);
        check_len(errors, "state", &self.state, 50);
        check_len(errors, "invoice_number", &self.invoice_number, 50);
        check_len(errors, "category", &self.category, 70);
    }
}

impl InventoryItem {
    /// Build a new record from client input, filling defaults.
    pub fn create(
        id: InventoryItemId,
        code: String,
        input: &InventoryInput,
        now: DateTime<Utc>,
    ) -> Result<Self, FieldErrors> {
        let blank = Self {
            id,
            code,
            supply_type: DEFAULT_SUPPLY_TYPE.to_string(),
            description: None,
            state: DEFAULT_STATE.to_string(),
            invoice_number: None,
            total_stock: 0,
            delivered_stock: 0,
            acquired_on: now.date_naive(),
            maintenance_on: None,
            category: None,
            created_at: now,
            version: 0,
        };
        blank.apply(input)
    }

    /// Apply a partial update; absent fields keep their value.
    pub fn apply(&self, input: &InventoryInput) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();
        input.check_lengths(&mut errors);

        let total_stock = stock(&mut errors, "total_stock", input.total_stock, self.total_stock);
        let delivered_stock = stock(&mut errors, "delivered_stock", input.delivered_stock, self.delivered_stock);
        if errors.is_empty() && delivered_stock > total_stock {
            errors.add("delivered_stock", "delivered stock cannot exceed total stock");
        }

        let next = Self {
            supply_type: text(&input.supply_type).unwrap_or_else(|| self.supply_type.clone()),
            description: input.description.as_ref().map_or_else(|| self.description.clone(), |_| text(&input.description)),
            state: text(&input.state).unwrap_or_else(|| self.state.clone()),
            invoice_number: input
                .invoice_number
                .as_ref()
                .map_or_else(|| self.invoice_number.clone(), |_| text(&input.invoice_number)),
            total_stock,
            delivered_stock,
            acquired_on: input.acquired_on.unwrap_or(self.acquired_on),
            maintenance_on: input.maintenance_on.or(self.maintenance_on),
            category: input.category.as_ref().map_or_else(|| self.category.clone(), |_| text(&input.category)),
            version: self.version + 1,
            ..self.clone()
        };

        errors.into_result(next)
    }
}

/// Stock totals for one supply type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SupplyTotal {
    pub supply_type: String,
    pub total: u64,
    pub delivered: u64,
}

/// Sum stocks per supply type, sorted by supply type.
pub fn totals_by_supply_type<'a>(items: impl IntoIterator<Item = &'a InventoryItem>) -> Vec<SupplyTotal> {
    let mut sums: BTreeMap<&str, (u64, u64)> = BTreeMap::new();
    for item in items {
        let entry = sums.entry(item.supply_type.as_str()).or_default();
        entry.0 = entry.0.saturating_add(item.total_stock);
        entry.1 = entry.1.saturating_add(item.delivered_stock);
    }

    sums.into_iter()
        .map(|(supply_type, (total, delivered))| SupplyTotal {
            supply_type: supply_type.to_string(),
            total,
            delivered,
        })
        .collect()
}
