//! Error types for the core crate.

use rackstock_model::ItemId;
use rackstock_storage::StorageError;
use thiserror::Error;

/// Errors returned by inventory and application state operations.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item id is unknown.
    #[error("unknown item: {0}")]
    UnknownItem(ItemId),
    /// Persisting or loading the list failed.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Rejected transitions of the scan workflow.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanError {
    /// A capture was started while an analysis is still running.
    #[error("an analysis is already in flight")]
    AnalysisInFlight,
    /// The AI label flow is only reachable after a failed lookup.
    #[error("ai label capture requires a not-found lookup")]
    LookupNotMissing,
    /// The action needs the AI label mode.
    #[error("not in ai label mode")]
    NotInAiLabelMode,
    /// No snippet editor is open.
    #[error("no snippet selected")]
    NoSnippetSelected,
    /// Snippet index is out of range.
    #[error("unknown snippet: {0}")]
    UnknownSnippet(usize),
    /// Hardware version is only assignable for network cards.
    #[error("hardware version is hidden for category {0}")]
    HardwareVersionHidden(String),
}
