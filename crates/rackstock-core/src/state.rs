//! Application state owned by the UI event loop.

use crate::chat::{ChatTranscript, build_inventory_context};
use crate::dashboard::DashboardStats;
use crate::editor::{EditorSession, EditorTarget};
use crate::error::CoreError;
use crate::inventory::Inventory;
use crate::scan::{LookupStatus, ScanSuggestion, ScanWorkflow};
use chrono::{Local, NaiveDate};
use log::{debug, info};
use rackstock_model::{InventoryItem, ItemId};
use rackstock_storage::PersistenceBridge;

/// Everything the application knows, mirrored to storage after each change
/// to the item list.
pub struct AppState {
    inventory: Inventory,
    bridge: PersistenceBridge,
    today: fn() -> NaiveDate,
    pub search: String,
    pub editor: Option<EditorSession>,
    pub scanner: Option<ScanWorkflow>,
    pub chat: ChatTranscript,
    pending_delete: Option<ItemId>,
}

fn local_today() -> NaiveDate {
    Local::now().date_naive()
}

impl AppState {
    /// Load the persisted list (or the seed list) through the bridge.
    pub fn load(bridge: PersistenceBridge, greeting: Option<&str>) -> Result<Self, CoreError> {
        let items = bridge.load_or_seed()?;
        info!("application state loaded (items={})", items.len());
        Ok(Self {
            inventory: Inventory::new(items),
            bridge,
            today: local_today,
            search: String::new(),
            editor: None,
            scanner: None,
            chat: ChatTranscript::new(greeting),
            pending_delete: None,
        })
    }

    /// Override the date source used to stamp records.
    pub fn with_clock(mut self, today: fn() -> NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn items(&self) -> &[InventoryItem] {
        self.inventory.items()
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    /// Items matching the current search query.
    pub fn visible_items(&self) -> Vec<&InventoryItem> {
        self.inventory.search(&self.search)
    }

    pub fn dashboard(&self) -> DashboardStats {
        DashboardStats::derive(self.inventory.items())
    }

    pub fn chat_context(&self) -> String {
        build_inventory_context(self.inventory.items())
    }

    fn persist(&self) -> Result<(), CoreError> {
        self.bridge.save(self.inventory.items())?;
        Ok(())
    }

    // Editor

    pub fn open_new_item(&mut self) {
        self.editor = Some(EditorSession::new_item());
    }

    pub fn open_edit(&mut self, id: &str) -> Result<(), CoreError> {
        let item = self
            .inventory
            .get(id)
            .ok_or_else(|| CoreError::UnknownItem(id.to_string()))?;
        self.editor = Some(EditorSession::edit(item));
        Ok(())
    }

    pub fn cancel_editor(&mut self) {
        self.editor = None;
    }

    /// Write the open editor's draft and close it. Returns the id written.
    pub fn save_editor(&mut self) -> Result<Option<ItemId>, CoreError> {
        let Some(session) = self.editor.take() else {
            return Ok(None);
        };
        let today = (self.today)();
        let id = match session.target {
            EditorTarget::New => self.inventory.create(session.draft, today).id.clone(),
            EditorTarget::Existing(id) => {
                self.inventory.update(&id, session.draft, today)?.id.clone()
            }
        };
        self.persist()?;
        Ok(Some(id))
    }

    // Delete

    /// Ask for confirmation before deleting `id`.
    pub fn request_delete(&mut self, id: impl Into<ItemId>) {
        self.pending_delete = Some(id.into());
    }

    pub fn pending_delete(&self) -> Option<&ItemId> {
        self.pending_delete.as_ref()
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
    }

    /// Delete the pending item. Deleting an id that is already gone is a no-op.
    pub fn confirm_delete(&mut self) -> Result<bool, CoreError> {
        let Some(id) = self.pending_delete.take() else {
            return Ok(false);
        };
        let removed = self.inventory.remove(&id);
        if removed {
            self.persist()?;
        }
        Ok(removed)
    }

    // Scanner

    pub fn open_scanner(&mut self) {
        self.scanner = Some(ScanWorkflow::new());
    }

    pub fn close_scanner(&mut self) {
        self.scanner = None;
    }

    /// Close the scanner and open the editor for the scanned part: the
    /// matching record when the serial is known, otherwise a new entry
    /// pre-filled with the suggestion.
    pub fn handle_scan_complete(&mut self, suggestion: ScanSuggestion) {
        self.scanner = None;
        let existing = self.inventory.find_by_sn(&suggestion.sn);
        self.editor = Some(match existing {
            Some(item) => {
                debug!("scan matched existing item (id={})", item.id);
                EditorSession::edit(item)
            }
            None => EditorSession::with_draft(suggestion.into_draft()),
        });
    }

    /// Run the scanner's serial lookup against the current list.
    pub fn submit_scan_sn(&mut self) {
        if let Some(scanner) = self.scanner.as_mut() {
            scanner.submit_sn(self.inventory.items());
        }
    }

    /// Close the scanner and edit the record its lookup found. Returns false
    /// when the lookup has no match.
    pub fn edit_found_item(&mut self) -> Result<bool, CoreError> {
        let id = match self.scanner.as_ref().map(|scanner| scanner.lookup()) {
            Some(LookupStatus::Found(item)) => item.id.clone(),
            _ => return Ok(false),
        };
        self.scanner = None;
        self.open_edit(&id)?;
        Ok(true)
    }
}
