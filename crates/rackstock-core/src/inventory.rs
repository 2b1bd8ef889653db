//! The in-memory item list and its CRUD and search operations.

use crate::error::CoreError;
use chrono::NaiveDate;
use log::{debug, info};
use rackstock_model::{InventoryItem, ItemDraft};
use uuid::Uuid;

/// Ordered list of inventory records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inventory {
    items: Vec<InventoryItem>,
}

impl Inventory {
    pub fn new(items: Vec<InventoryItem>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&InventoryItem> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Append a new record with a generated id and the given date.
    pub fn create(&mut self, draft: ItemDraft, today: NaiveDate) -> &InventoryItem {
        let id = Uuid::new_v4().to_string();
        let item = InventoryItem::from_draft(id, draft, today);
        info!("created item (id={}, sn={})", item.id, item.sn);
        let idx = self.items.len();
        self.items.push(item);
        &self.items[idx]
    }

    /// Replace the editable fields of an existing record, keeping its id.
    pub fn update(
        &mut self,
        id: &str,
        draft: ItemDraft,
        today: NaiveDate,
    ) -> Result<&InventoryItem, CoreError> {
        let item = self
            .items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| CoreError::UnknownItem(id.to_string()))?;
        item.apply_draft(draft, today);
        info!("updated item (id={})", item.id);
        Ok(item)
    }

    /// Remove a record by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        let removed = self.items.len() != before;
        debug!("remove item (id={}, removed={})", id, removed);
        removed
    }

    /// First record whose serial matches case-insensitively.
    ///
    /// Serials are not unique; later duplicates are never returned.
    pub fn find_by_sn(&self, sn: &str) -> Option<&InventoryItem> {
        let needle = sn.trim().to_lowercase();
        if needle.is_empty() {
            return None;
        }
        self.items
            .iter()
            .find(|item| !item.sn.is_empty() && item.sn.to_lowercase() == needle)
    }

    /// Records whose name, model, serial or location contains the query,
    /// ignoring case. An empty query returns everything in order.
    pub fn search(&self, query: &str) -> Vec<&InventoryItem> {
        let needle = query.to_lowercase();
        self.items
            .iter()
            .filter(|item| {
                needle.is_empty()
                    || [&item.name, &item.model, &item.sn, &item.location]
                        .iter()
                        .any(|field| field.to_lowercase().contains(&needle))
            })
            .collect()
    }
}
