//! Local persistence for the Rackstock inventory list.
//!
//! The whole list is stored as one JSON value under a fixed key in a simple
//! key-value store. [`PersistenceBridge`] loads it once at startup (falling
//! back to the built-in seed list) and rewrites it after every change.

pub mod bridge;
pub mod error;
pub mod seed;
pub mod store;

/// Load/save synchronization for the item list.
pub use bridge::{INVENTORY_KEY, PersistenceBridge};
/// Storage error type.
pub use error::StorageError;
/// Built-in seed list used when nothing is persisted yet.
pub use seed::seed_items;
/// Key-value store interface and implementations.
pub use store::{FileKeyValueStore, KeyValueStore, MemoryKeyValueStore};
