//! Shared data types for Rackstock: inventory records, chat messages, and
//! the payload shapes returned by AI image analysis.

mod analysis;
mod chat;
mod item;

pub use analysis::{Analysis, AnalysisMode, GeneralIdentification, LabelExtraction};
pub use chat::{ChatMessage, ChatRole};
pub use item::{InventoryItem, ItemDraft, ItemId, PartCategory, PartStatus};
