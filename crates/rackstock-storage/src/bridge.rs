//! Load-on-start / save-on-change synchronization of the item list.

use crate::error::StorageError;
use crate::seed::seed_items;
use crate::store::KeyValueStore;
use log::{debug, info};
use rackstock_model::InventoryItem;
use std::sync::Arc;

/// Fixed key the serialized list lives under.
pub const INVENTORY_KEY: &str = "idc_inventory";

/// Mirrors the in-memory item list into a [`KeyValueStore`].
///
/// There is no versioning or migration: a stored value that does not decode
/// as a list of items is reported as [`StorageError::Serde`].
#[derive(Clone)]
pub struct PersistenceBridge {
    store: Arc<dyn KeyValueStore>,
}

impl PersistenceBridge {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Read the persisted list, or the seed list when nothing is stored.
    pub fn load_or_seed(&self) -> Result<Vec<InventoryItem>, StorageError> {
        match self.store.get(INVENTORY_KEY)? {
            Some(raw) => {
                let items: Vec<InventoryItem> = serde_json::from_str(&raw)?;
                info!("loaded persisted inventory (count={})", items.len());
                Ok(items)
            }
            None => {
                let items = seed_items();
                info!("no persisted inventory; using seed (count={})", items.len());
                Ok(items)
            }
        }
    }

    /// Serialize the entire list and overwrite the stored value.
    pub fn save(&self, items: &[InventoryItem]) -> Result<(), StorageError> {
        let raw = serde_json::to_string(items)?;
        self.store.set(INVENTORY_KEY, &raw)?;
        debug!("persisted inventory (count={}, bytes={})", items.len(), raw.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{INVENTORY_KEY, PersistenceBridge};
    use crate::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore, StorageError, seed_items};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[test]
    fn empty_store_yields_seed_list() {
        let bridge = PersistenceBridge::new(Arc::new(MemoryKeyValueStore::new()));
        let items = bridge.load_or_seed().expect("load");
        assert_eq!(items, seed_items());
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].sn, "CPU-XG-001");
    }

    #[test]
    fn persisted_list_replaces_seed_even_when_empty() {
        let store = Arc::new(MemoryKeyValueStore::new().with_value(INVENTORY_KEY, "[]"));
        let bridge = PersistenceBridge::new(store);
        assert_eq!(bridge.load_or_seed().expect("load"), Vec::new());
    }

    #[test]
    fn corrupt_blob_propagates_parse_error() {
        let store = Arc::new(MemoryKeyValueStore::new().with_value(INVENTORY_KEY, "{not json"));
        let bridge = PersistenceBridge::new(store);
        let err = bridge.load_or_seed().unwrap_err();
        assert!(matches!(err, StorageError::Serde(_)));
    }

    #[test]
    fn save_then_reload_through_files() {
        let temp = tempdir().expect("tempdir");
        let store = Arc::new(FileKeyValueStore::new(temp.path()).expect("store"));
        let bridge = PersistenceBridge::new(store.clone());

        let mut items = seed_items();
        items.truncate(2);
        items[1].quantity = 7;
        bridge.save(&items).expect("save");

        let raw = store.get(INVENTORY_KEY).expect("get").expect("value");
        assert!(raw.contains("\"lastUpdated\":\"2023-11-01\""));

        let reopened =
            PersistenceBridge::new(Arc::new(FileKeyValueStore::new(temp.path()).expect("store")));
        assert_eq!(reopened.load_or_seed().expect("load"), items);
    }
}
