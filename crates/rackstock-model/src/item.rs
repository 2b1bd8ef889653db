//! Inventory record and its enumerated fields.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier for an inventory record.
pub type ItemId = String;

/// Canonical part category.
///
/// Serialized with the product labels so that persisted lists stay readable by
/// earlier builds; the English names are accepted on read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PartCategory {
    #[serde(rename = "CPU")]
    Cpu,
    #[serde(rename = "内存", alias = "RAM")]
    Ram,
    #[serde(rename = "硬盘", alias = "DISK")]
    Disk,
    #[serde(rename = "网卡", alias = "NIC")]
    Nic,
    #[serde(rename = "线缆", alias = "CABLE")]
    Cable,
    #[serde(rename = "电源", alias = "PSU")]
    Psu,
    #[default]
    #[serde(rename = "其他", alias = "OTHER")]
    Other,
}

impl PartCategory {
    /// Every category in display order.
    pub const ALL: [PartCategory; 7] = [
        PartCategory::Cpu,
        PartCategory::Ram,
        PartCategory::Disk,
        PartCategory::Nic,
        PartCategory::Cable,
        PartCategory::Psu,
        PartCategory::Other,
    ];

    /// Product label used in storage and on screen.
    pub fn label(self) -> &'static str {
        match self {
            PartCategory::Cpu => "CPU",
            PartCategory::Ram => "内存",
            PartCategory::Disk => "硬盘",
            PartCategory::Nic => "网卡",
            PartCategory::Cable => "线缆",
            PartCategory::Psu => "电源",
            PartCategory::Other => "其他",
        }
    }

    /// Next category in [`PartCategory::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|c| *c == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for PartCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Physical condition of a stocked part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PartStatus {
    #[default]
    #[serde(rename = "全新", alias = "NEW")]
    New,
    #[serde(rename = "二手", alias = "USED")]
    Used,
    #[serde(rename = "故障", alias = "FAULTY")]
    Faulty,
}

impl PartStatus {
    pub const ALL: [PartStatus; 3] = [PartStatus::New, PartStatus::Used, PartStatus::Faulty];

    pub fn label(self) -> &'static str {
        match self {
            PartStatus::New => "全新",
            PartStatus::Used => "二手",
            PartStatus::Faulty => "故障",
        }
    }

    pub fn next(self) -> Self {
        match self {
            PartStatus::New => PartStatus::Used,
            PartStatus::Used => PartStatus::Faulty,
            PartStatus::Faulty => PartStatus::New,
        }
    }
}

impl fmt::Display for PartStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A stocked hardware part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Unique record id, immutable after creation.
    pub id: ItemId,
    /// Serial number; may be empty and is not enforced unique.
    #[serde(default)]
    pub sn: String,
    /// Display name.
    pub name: String,
    /// Canonical category.
    pub category: PartCategory,
    /// Model or part number.
    pub model: String,
    /// Units on hand.
    pub quantity: u32,
    /// Physical condition.
    pub status: PartStatus,
    /// Free-text shelf location.
    pub location: String,
    /// Date of the last create or update.
    pub last_updated: NaiveDate,
    /// Optional free-text notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl InventoryItem {
    /// Build a record from a draft, stamping id and date.
    pub fn from_draft(id: ItemId, draft: ItemDraft, today: NaiveDate) -> Self {
        Self {
            id,
            sn: draft.sn,
            name: draft.name,
            category: draft.category,
            model: draft.model,
            quantity: draft.quantity,
            status: draft.status,
            location: draft.location,
            last_updated: today,
            notes: notes_from_draft(draft.notes),
        }
    }

    /// Editable fields of this record.
    pub fn to_draft(&self) -> ItemDraft {
        ItemDraft {
            sn: self.sn.clone(),
            name: self.name.clone(),
            category: self.category,
            model: self.model.clone(),
            quantity: self.quantity,
            status: self.status,
            location: self.location.clone(),
            notes: self.notes.clone().unwrap_or_default(),
        }
    }

    /// Overwrite every editable field from a draft and refresh the date.
    /// The id is left untouched.
    pub fn apply_draft(&mut self, draft: ItemDraft, today: NaiveDate) {
        self.sn = draft.sn;
        self.name = draft.name;
        self.category = draft.category;
        self.model = draft.model;
        self.quantity = draft.quantity;
        self.status = draft.status;
        self.location = draft.location;
        self.notes = notes_from_draft(draft.notes);
        self.last_updated = today;
    }
}

fn notes_from_draft(notes: String) -> Option<String> {
    if notes.is_empty() { None } else { Some(notes) }
}

/// Form contents for creating or editing a record (everything but id and date).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    pub sn: String,
    pub name: String,
    pub category: PartCategory,
    pub model: String,
    pub quantity: u32,
    pub status: PartStatus,
    pub location: String,
    pub notes: String,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            sn: String::new(),
            name: String::new(),
            category: PartCategory::Other,
            model: String::new(),
            quantity: 1,
            status: PartStatus::New,
            location: String::new(),
            notes: String::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{InventoryItem, ItemDraft, PartCategory, PartStatus};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("date")
    }

    #[test]
    fn serializes_with_product_labels_and_camel_case() {
        let item = InventoryItem {
            id: "2".to_string(),
            sn: "RAM-SS-002".to_string(),
            name: "Samsung 32GB DDR4".to_string(),
            category: PartCategory::Ram,
            model: "M393A4K40CB2".to_string(),
            quantity: 24,
            status: PartStatus::New,
            location: "A-02".to_string(),
            last_updated: date(2023, 11, 1),
            notes: None,
        };
        let value = serde_json::to_value(&item).expect("serialize");
        assert_eq!(
            value,
            json!({
                "id": "2",
                "sn": "RAM-SS-002",
                "name": "Samsung 32GB DDR4",
                "category": "内存",
                "model": "M393A4K40CB2",
                "quantity": 24,
                "status": "全新",
                "location": "A-02",
                "lastUpdated": "2023-11-01"
            })
        );
    }

    #[test]
    fn accepts_english_aliases_and_missing_sn() {
        let value = json!({
            "id": "x",
            "name": "PSU",
            "category": "PSU",
            "model": "DPS-800",
            "quantity": 2,
            "status": "FAULTY",
            "location": "",
            "lastUpdated": "2024-01-02",
            "notes": "burnt"
        });
        let item: InventoryItem = serde_json::from_value(value).expect("decode");
        assert_eq!(item.sn, "");
        assert_eq!(item.category, PartCategory::Psu);
        assert_eq!(item.status, PartStatus::Faulty);
        assert_eq!(item.notes.as_deref(), Some("burnt"));
    }

    #[test]
    fn apply_draft_keeps_id_and_refreshes_date() {
        let mut item = InventoryItem::from_draft(
            "abc".to_string(),
            ItemDraft {
                name: "old".to_string(),
                ..ItemDraft::default()
            },
            date(2023, 1, 1),
        );
        let mut draft = item.to_draft();
        draft.name = "new".to_string();
        item.apply_draft(draft, date(2024, 5, 6));
        assert_eq!(item.id, "abc");
        assert_eq!(item.name, "new");
        assert_eq!(item.quantity, 1);
        assert_eq!(item.last_updated, date(2024, 5, 6));
    }

    #[test]
    fn category_cycle_visits_every_value() {
        let mut seen = Vec::new();
        let mut current = PartCategory::Cpu;
        for _ in 0..PartCategory::ALL.len() {
            seen.push(current);
            current = current.next();
        }
        assert_eq!(seen, PartCategory::ALL.to_vec());
        assert_eq!(current, PartCategory::Cpu);
    }
}
