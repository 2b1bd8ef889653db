use chrono::NaiveDate;
use rackstock_model::{InventoryItem, PartCategory, PartStatus};
use rackstock_storage::{INVENTORY_KEY, MemoryKeyValueStore, PersistenceBridge};
use std::sync::Arc;

/// Minimal item with the given id, serial and quantity.
pub fn item(id: &str, sn: &str, quantity: u32) -> InventoryItem {
    InventoryItem {
        id: id.to_string(),
        sn: sn.to_string(),
        name: format!("Part {id}"),
        category: PartCategory::Other,
        model: format!("MODEL-{id}"),
        quantity,
        status: PartStatus::New,
        location: "Z-00".to_string(),
        last_updated: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        notes: None,
    }
}

/// Bridge over an empty in-memory store, so it loads the seed list.
pub fn seeded_bridge() -> (PersistenceBridge, Arc<MemoryKeyValueStore>) {
    let store = Arc::new(MemoryKeyValueStore::new());
    (PersistenceBridge::new(store.clone()), store)
}

/// Bridge over an in-memory store pre-populated with the given items.
pub fn memory_bridge(items: &[InventoryItem]) -> (PersistenceBridge, Arc<MemoryKeyValueStore>) {
    let raw = serde_json::to_string(items).unwrap_or_else(|_| "[]".to_string());
    let store = Arc::new(MemoryKeyValueStore::new().with_value(INVENTORY_KEY, raw));
    (PersistenceBridge::new(store.clone()), store)
}
