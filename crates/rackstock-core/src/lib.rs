//! Application state and workflows for Rackstock.
//!
//! This crate owns the inventory list and its editor, the dashboard
//! derivation, the scan/lookup state machine, and the chat transcript. The
//! TUI drives these types; nothing here performs terminal IO or network calls.

pub mod chat;
pub mod dashboard;
pub mod editor;
pub mod error;
pub mod inventory;
pub mod scan;
pub mod state;

pub use chat::{ChatTranscript, DEFAULT_GREETING, build_inventory_context};
pub use dashboard::{DashboardStats, LOW_STOCK_THRESHOLD};
pub use editor::{EditorField, EditorSession, EditorTarget};
pub use error::{CoreError, ScanError};
pub use inventory::Inventory;
pub use scan::{
    CATEGORY_LABELS, CapturePhase, Extraction, ExtractionField, LookupStatus, NIC_LABEL, Overlay,
    OverlayStack, ScanMode, ScanSuggestion, ScanWorkflow, SnippetTarget, map_category_label,
};
pub use state::AppState;
