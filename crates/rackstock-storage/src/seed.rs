//! Built-in seed inventory.

use chrono::NaiveDate;
use rackstock_model::{InventoryItem, PartCategory, PartStatus};

/// Starter list shown on first launch, before anything has been persisted.
pub fn seed_items() -> Vec<InventoryItem> {
    vec![
        seed(
            "1",
            "CPU-XG-001",
            "Intel Xeon Gold 6248R",
            PartCategory::Cpu,
            "6248R",
            4,
            PartStatus::New,
            "A-01",
            (2023, 10, 26),
        ),
        seed(
            "2",
            "RAM-SS-002",
            "Samsung 32GB DDR4",
            PartCategory::Ram,
            "M393A4K40CB2",
            24,
            PartStatus::New,
            "A-02",
            (2023, 11, 1),
        ),
        seed(
            "3",
            "DSK-SG-003",
            "Seagate Exos 16TB",
            PartCategory::Disk,
            "ST16000NM001G",
            8,
            PartStatus::Used,
            "B-05",
            (2023, 10, 15),
        ),
        seed(
            "4",
            "NIC-CS-004",
            "Cisco SFP+ 10G SR",
            PartCategory::Nic,
            "SFP-10G-SR",
            12,
            PartStatus::New,
            "C-03",
            (2023, 11, 5),
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn seed(
    id: &str,
    sn: &str,
    name: &str,
    category: PartCategory,
    model: &str,
    quantity: u32,
    status: PartStatus,
    location: &str,
    (year, month, day): (i32, u32, u32),
) -> InventoryItem {
    InventoryItem {
        id: id.to_string(),
        sn: sn.to_string(),
        name: name.to_string(),
        category,
        model: model.to_string(),
        quantity,
        status,
        location: location.to_string(),
        last_updated: NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default(),
        notes: None,
    }
}
