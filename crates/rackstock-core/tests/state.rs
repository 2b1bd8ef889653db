use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rackstock_core::{AppState, EditorTarget, ScanSuggestion};
use rackstock_model::{PartCategory, PartStatus};
use rackstock_storage::{INVENTORY_KEY, KeyValueStore, MemoryKeyValueStore, seed_items};
use rackstock_test_utils::{item, memory_bridge, seeded_bridge};
use std::sync::Arc;

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 30).unwrap_or_default()
}

fn stored_len(store: &Arc<MemoryKeyValueStore>) -> usize {
    let raw = store.get(INVENTORY_KEY).expect("get").expect("stored");
    let items: Vec<serde_json::Value> = serde_json::from_str(&raw).expect("json");
    items.len()
}

fn suggestion(sn: &str) -> ScanSuggestion {
    ScanSuggestion {
        sn: sn.to_string(),
        name: "Intel 网卡 X710".to_string(),
        category: PartCategory::Nic,
        model: "X710".to_string(),
        quantity: 1,
        status: PartStatus::New,
        notes: "AI补录 - 来源: 拍照识别".to_string(),
    }
}

#[test]
fn load_starts_from_seed_with_greeting() {
    let (bridge, _store) = seeded_bridge();
    let state = AppState::load(bridge, Some("hi")).expect("state");
    assert_eq!(state.items(), seed_items().as_slice());
    assert_eq!(state.chat.messages()[0].text, "hi");
    assert_eq!(state.dashboard().total_quantity, 48);
}

#[test]
fn editing_preserves_id_and_refreshes_date() {
    let (bridge, store) = seeded_bridge();
    let mut state = AppState::load(bridge, None)
        .expect("state")
        .with_clock(fixed_today);

    state.open_edit("3").expect("open");
    if let Some(editor) = state.editor.as_mut() {
        editor.draft.location = "B-06".to_string();
        editor.step_quantity_down();
    }
    let id = state.save_editor().expect("save");
    assert_eq!(id.as_deref(), Some("3"));
    assert!(state.editor.is_none());

    let edited = state.inventory().get("3").expect("item");
    let original = &seed_items()[2];
    assert_eq!(edited.location, "B-06");
    assert_eq!(edited.quantity, 7);
    assert_eq!(edited.sn, original.sn);
    assert_eq!(edited.name, original.name);
    assert_eq!(edited.last_updated, fixed_today());
    assert_eq!(stored_len(&store), 4);
}

#[test]
fn create_appends_and_persists() {
    let (bridge, store) = seeded_bridge();
    let mut state = AppState::load(bridge, None)
        .expect("state")
        .with_clock(fixed_today);
    state.open_new_item();
    if let Some(editor) = state.editor.as_mut() {
        editor.draft.name = "Spare PSU".to_string();
    }
    let id = state.save_editor().expect("save").expect("id");
    assert_eq!(state.items().last().map(|item| item.id.clone()), Some(id));
    assert_eq!(stored_len(&store), 5);
}

#[test]
fn delete_requires_confirmation_and_is_idempotent() {
    let (bridge, store) = memory_bridge(&[item("a", "SN-A", 1), item("b", "SN-B", 5)]);
    let mut state = AppState::load(bridge, None).expect("state");

    state.request_delete("a");
    state.cancel_delete();
    assert!(!state.confirm_delete().expect("confirm"));
    assert_eq!(state.items().len(), 2);

    state.request_delete("a");
    assert!(state.confirm_delete().expect("confirm"));
    assert_eq!(state.items().len(), 1);
    assert_eq!(stored_len(&store), 1);

    state.request_delete("a");
    assert!(!state.confirm_delete().expect("confirm"));
    assert_eq!(state.items().len(), 1);
}

#[test]
fn search_filters_visible_items() {
    let (bridge, _store) = seeded_bridge();
    let mut state = AppState::load(bridge, None).expect("state");
    state.search = "SAMSUNG".to_string();
    let ids: Vec<_> = state.visible_items().iter().map(|i| i.id.as_str()).collect();
    assert_eq!(ids, vec!["2"]);
}

#[test]
fn scan_complete_with_known_serial_edits_existing() {
    let (bridge, _store) = seeded_bridge();
    let mut state = AppState::load(bridge, None).expect("state");
    state.open_scanner();
    state.handle_scan_complete(suggestion("nic-cs-004"));
    assert!(state.scanner.is_none());
    let editor = state.editor.as_ref().expect("editor");
    assert_eq!(editor.target, EditorTarget::Existing("4".to_string()));
    assert_eq!(editor.draft.name, "Cisco SFP+ 10G SR");
}

#[test]
fn scan_complete_with_new_serial_prefills_form() {
    let (bridge, _store) = seeded_bridge();
    let mut state = AppState::load(bridge, None).expect("state");
    state.open_scanner();
    state.handle_scan_complete(suggestion("NEW-SN"));
    let editor = state.editor.as_ref().expect("editor");
    assert!(editor.is_new());
    assert_eq!(editor.draft.sn, "NEW-SN");
    assert_eq!(editor.draft.category, PartCategory::Nic);
    assert_eq!(editor.draft.location, "");
    assert_eq!(state.items().len(), 4);
}

#[test]
fn scan_complete_without_serial_never_matches() {
    let (bridge, _store) = memory_bridge(&[item("a", "", 1)]);
    let mut state = AppState::load(bridge, None).expect("state");
    state.handle_scan_complete(suggestion(""));
    assert!(state.editor.as_ref().is_some_and(|editor| editor.is_new()));
}

#[test]
fn corrupt_store_fails_startup() {
    let store = Arc::new(MemoryKeyValueStore::new().with_value(INVENTORY_KEY, "[{"));
    let bridge = rackstock_storage::PersistenceBridge::new(store);
    assert!(AppState::load(bridge, None).is_err());
}

#[test]
fn barcode_hit_opens_editor_on_match() {
    let (bridge, _store) = seeded_bridge();
    let mut state = AppState::load(bridge, None).expect("state");
    assert!(!state.edit_found_item().expect("no scanner"));

    state.open_scanner();
    if let Some(scanner) = state.scanner.as_mut() {
        scanner.set_sn_input("RAM-SS-002");
    }
    state.submit_scan_sn();
    assert!(state.edit_found_item().expect("edit"));
    assert!(state.scanner.is_none());
    assert_eq!(
        state.editor.as_ref().map(|editor| editor.target.clone()),
        Some(EditorTarget::Existing("2".to_string()))
    );
}
