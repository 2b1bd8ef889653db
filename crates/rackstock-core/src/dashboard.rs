//! Derived statistics for the dashboard tab.

use chrono::NaiveDate;
use rackstock_model::{InventoryItem, PartCategory};

/// Items with fewer units than this count as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 3;

/// Summary figures recomputed from the item list on every render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DashboardStats {
    pub total_quantity: u64,
    /// Number of distinct categories present.
    pub category_count: usize,
    pub low_stock_count: usize,
    pub record_count: usize,
    /// Most recent `last_updated` across all records.
    pub latest_update: Option<NaiveDate>,
    /// Quantity per category, in order of first appearance.
    pub per_category: Vec<(PartCategory, u64)>,
}

impl DashboardStats {
    pub fn derive(items: &[InventoryItem]) -> Self {
        let mut per_category: Vec<(PartCategory, u64)> = Vec::new();
        for item in items {
            match per_category.iter_mut().find(|(cat, _)| *cat == item.category) {
                Some((_, total)) => *total += u64::from(item.quantity),
                None => per_category.push((item.category, u64::from(item.quantity))),
            }
        }
        Self {
            total_quantity: items.iter().map(|item| u64::from(item.quantity)).sum(),
            category_count: per_category.len(),
            low_stock_count: items
                .iter()
                .filter(|item| item.quantity < LOW_STOCK_THRESHOLD)
                .count(),
            record_count: items.len(),
            latest_update: items.iter().map(|item| item.last_updated).max(),
            per_category,
        }
    }

    /// Largest per-category total, used to scale the bar chart.
    pub fn max_category_quantity(&self) -> u64 {
        self.per_category
            .iter()
            .map(|(_, qty)| *qty)
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::DashboardStats;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rackstock_model::PartCategory;
    use rackstock_storage::seed_items;

    #[test]
    fn seed_list_figures() {
        let stats = DashboardStats::derive(&seed_items());
        assert_eq!(stats.total_quantity, 48);
        assert_eq!(stats.low_stock_count, 0);
        assert_eq!(stats.category_count, 4);
        assert_eq!(stats.record_count, 4);
        assert_eq!(stats.latest_update, NaiveDate::from_ymd_opt(2023, 11, 5));
        assert_eq!(stats.max_category_quantity(), 24);
    }

    #[test]
    fn groups_by_first_appearance_and_counts_low_stock() {
        let mut items = seed_items();
        items[2].category = PartCategory::Cpu;
        items[2].quantity = 2;
        items[3].quantity = 0;
        let stats = DashboardStats::derive(&items);
        assert_eq!(
            stats.per_category,
            vec![
                (PartCategory::Cpu, 6),
                (PartCategory::Ram, 24),
                (PartCategory::Nic, 0)
            ]
        );
        assert_eq!(stats.low_stock_count, 2);
    }

    #[test]
    fn empty_list_is_all_zero() {
        assert_eq!(DashboardStats::derive(&[]), DashboardStats::default());
    }
}
