//! Test helpers shared across Rackstock crates.

pub mod backend;
pub mod items;

pub use backend::{FailingBackend, FixedBackend, RecordingBackend};
pub use items::{item, memory_bridge, seeded_bridge};
