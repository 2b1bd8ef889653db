//! Scan/lookup workflow: serial lookup, AI label capture, snippet
//! assignment, category picking, and confirmation into a suggested record.
//!
//! The workflow is a plain state machine. Image reads and gateway calls
//! happen outside; their results are fed back through
//! [`ScanWorkflow::complete_analysis`] and [`ScanWorkflow::fail_analysis`].

use crate::error::ScanError;
use log::debug;
use rackstock_gateway::AnalysisOutcome;
use rackstock_model::{
    Analysis, AnalysisMode, GeneralIdentification, InventoryItem, ItemDraft, PartCategory,
    PartStatus,
};
use std::path::PathBuf;

/// Category labels offered by the picker.
pub const CATEGORY_LABELS: [&str; 7] = ["CPU", "NVME", "RAID", "SSD", "内存", "GPU", "网卡"];
/// Label that reveals the hardware-version field.
pub const NIC_LABEL: &str = "网卡";
const DEFAULT_CATEGORY_LABEL: &str = "CPU";
const UNKNOWN_BRAND: &str = "未知品牌";
const SOURCE_NOTE: &str = "AI补录 - 来源: 拍照识别";
/// Labels that do not get a `类型:` note suffix.
const CANONICAL_LABELS: [&str; 4] = ["CPU", "内存", "网卡", "硬盘"];

/// Map a free-text category label onto the canonical category.
///
/// Total: anything not listed becomes [`PartCategory::Other`], including the
/// `RAID` and `GPU` picker labels.
pub fn map_category_label(label: &str) -> PartCategory {
    match label.trim() {
        "CPU" => PartCategory::Cpu,
        "内存" => PartCategory::Ram,
        "网卡" => PartCategory::Nic,
        "SSD" | "NVME" => PartCategory::Disk,
        _ => PartCategory::Other,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    Barcode,
    AiLabel,
}

/// Outcome of the last serial lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupStatus {
    Idle,
    Found(Box<InventoryItem>),
    NotFound,
}

/// Phase of the AI label capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CapturePhase {
    /// Waiting for an image.
    Capture,
    Analyzing,
    Result,
    Error(String),
}

/// Editable fields extracted from a label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    pub sn: String,
    pub model: String,
    pub manufacturer: String,
    pub category_label: String,
    pub hardware_version: String,
}

impl Default for Extraction {
    fn default() -> Self {
        Self {
            sn: String::new(),
            model: String::new(),
            manufacturer: String::new(),
            category_label: DEFAULT_CATEGORY_LABEL.to_string(),
            hardware_version: String::new(),
        }
    }
}

/// Directly editable extraction fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionField {
    Sn,
    Model,
    Manufacturer,
    HardwareVersion,
}

/// Fields a snippet can be assigned into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnippetTarget {
    Sn,
    Model,
    HardwareVersion,
}

/// Modal layers stacked over the scanner. Only the top one takes input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    /// Found / not-found sheet after a lookup.
    LookupResult,
    CategoryPicker { selected: usize },
    SnippetEditor { index: usize, text: String },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverlayStack(Vec<Overlay>);

impl OverlayStack {
    pub fn push(&mut self, overlay: Overlay) {
        self.0.push(overlay);
    }

    pub fn pop(&mut self) -> Option<Overlay> {
        self.0.pop()
    }

    pub fn top(&self) -> Option<&Overlay> {
        self.0.last()
    }

    pub fn top_mut(&mut self) -> Option<&mut Overlay> {
        self.0.last_mut()
    }

    pub fn clear(&mut self) {
        self.0.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// Partial record produced by confirming an AI label result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSuggestion {
    pub sn: String,
    pub name: String,
    pub category: PartCategory,
    pub model: String,
    pub quantity: u32,
    pub status: PartStatus,
    pub notes: String,
}

impl ScanSuggestion {
    /// Overlay the suggested fields onto an empty form.
    pub fn into_draft(self) -> ItemDraft {
        ItemDraft {
            sn: self.sn,
            name: self.name,
            category: self.category,
            model: self.model,
            quantity: self.quantity,
            status: self.status,
            notes: self.notes,
            ..ItemDraft::default()
        }
    }
}

/// State of an open scanner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanWorkflow {
    mode: ScanMode,
    sn_input: String,
    lookup: LookupStatus,
    phase: CapturePhase,
    analysis_mode: AnalysisMode,
    image_path: Option<PathBuf>,
    pub extraction: Extraction,
    snippets: Vec<String>,
    identification: Option<GeneralIdentification>,
    demo_data: bool,
    overlays: OverlayStack,
}

impl Default for ScanWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl ScanWorkflow {
    pub fn new() -> Self {
        Self {
            mode: ScanMode::Barcode,
            sn_input: String::new(),
            lookup: LookupStatus::Idle,
            phase: CapturePhase::Capture,
            analysis_mode: AnalysisMode::Label,
            image_path: None,
            extraction: Extraction::default(),
            snippets: Vec::new(),
            identification: None,
            demo_data: false,
            overlays: OverlayStack::default(),
        }
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn sn_input(&self) -> &str {
        &self.sn_input
    }

    pub fn lookup(&self) -> &LookupStatus {
        &self.lookup
    }

    pub fn phase(&self) -> &CapturePhase {
        &self.phase
    }

    pub fn analysis_mode(&self) -> AnalysisMode {
        self.analysis_mode
    }

    pub fn image_path(&self) -> Option<&PathBuf> {
        self.image_path.as_ref()
    }

    pub fn snippets(&self) -> &[String] {
        &self.snippets
    }

    pub fn identification(&self) -> Option<&GeneralIdentification> {
        self.identification.as_ref()
    }

    /// Whether the current result came from canned demo data.
    pub fn is_demo_data(&self) -> bool {
        self.demo_data
    }

    pub fn overlays(&self) -> &OverlayStack {
        &self.overlays
    }

    pub fn is_analyzing(&self) -> bool {
        self.phase == CapturePhase::Analyzing
    }

    // Barcode lookup

    /// Replace the serial input. Editing while a lookup result is shown
    /// returns the lookup to idle.
    pub fn set_sn_input(&mut self, text: impl Into<String>) {
        self.sn_input = text.into();
        if self.lookup != LookupStatus::Idle {
            self.lookup = LookupStatus::Idle;
            if self.overlays.top() == Some(&Overlay::LookupResult) {
                self.overlays.pop();
            }
        }
    }

    pub fn push_sn_char(&mut self, ch: char) {
        let mut text = self.sn_input.clone();
        text.push(ch);
        self.set_sn_input(text);
    }

    pub fn pop_sn_char(&mut self) {
        let mut text = self.sn_input.clone();
        text.pop();
        self.set_sn_input(text);
    }

    /// Look the trimmed serial up against `items`, case-insensitively.
    /// Blank input does nothing.
    pub fn submit_sn(&mut self, items: &[InventoryItem]) -> &LookupStatus {
        let query = self.sn_input.trim().to_lowercase();
        if query.is_empty() {
            return &self.lookup;
        }
        let found = items
            .iter()
            .find(|item| !item.sn.is_empty() && item.sn.to_lowercase() == query);
        self.lookup = match found {
            Some(item) => LookupStatus::Found(Box::new(item.clone())),
            None => LookupStatus::NotFound,
        };
        debug!(
            "sn lookup (query={}, found={})",
            query,
            matches!(self.lookup, LookupStatus::Found(_))
        );
        if self.overlays.top() != Some(&Overlay::LookupResult) {
            self.overlays.push(Overlay::LookupResult);
        }
        &self.lookup
    }

    /// Back to an empty barcode prompt.
    pub fn reset(&mut self) {
        self.mode = ScanMode::Barcode;
        self.sn_input.clear();
        self.lookup = LookupStatus::Idle;
        self.overlays.clear();
    }

    /// Enter AI label capture after a failed lookup.
    pub fn switch_to_ai_label(&mut self) -> Result<(), ScanError> {
        if self.lookup != LookupStatus::NotFound {
            return Err(ScanError::LookupNotMissing);
        }
        self.mode = ScanMode::AiLabel;
        self.overlays.clear();
        self.clear_capture();
        Ok(())
    }

    /// Leave AI label capture and return to the barcode prompt.
    pub fn switch_to_barcode(&mut self) {
        self.clear_capture();
        self.reset();
    }

    // AI label capture

    /// Choose between label OCR and general identification for the next capture.
    pub fn toggle_analysis_mode(&mut self) {
        self.analysis_mode = match self.analysis_mode {
            AnalysisMode::Label => AnalysisMode::General,
            AnalysisMode::General => AnalysisMode::Label,
        };
    }

    /// Start analyzing a new image. Also used to retake from the result or
    /// error state. Returns the mode the analysis should run in.
    pub fn begin_capture(&mut self, image_path: PathBuf) -> Result<AnalysisMode, ScanError> {
        if self.mode != ScanMode::AiLabel {
            return Err(ScanError::NotInAiLabelMode);
        }
        if self.is_analyzing() {
            return Err(ScanError::AnalysisInFlight);
        }
        self.clear_capture();
        debug!(
            "capture started (path={}, mode={})",
            image_path.display(),
            self.analysis_mode
        );
        self.image_path = Some(image_path);
        self.phase = CapturePhase::Analyzing;
        Ok(self.analysis_mode)
    }

    /// Apply a gateway result. Stale results are applied to whatever state
    /// is current.
    pub fn complete_analysis(&mut self, outcome: AnalysisOutcome) {
        self.demo_data = outcome.is_fallback();
        let mut extraction = Extraction::default();
        let raw_snippets = match outcome.into_analysis() {
            Analysis::Label(label) => {
                extraction.sn = label.sn;
                extraction.model = label.model;
                extraction.manufacturer = label.manufacturer;
                self.identification = None;
                label.all_text
            }
            Analysis::General(identification) => {
                extraction.model = identification.model.clone();
                if CATEGORY_LABELS.contains(&identification.category.trim()) {
                    extraction.category_label = identification.category.trim().to_string();
                }
                let snippets = [
                    identification.name.clone(),
                    identification.model.clone(),
                    identification.specs.clone(),
                ]
                .into_iter()
                .filter(|text| !text.trim().is_empty())
                .collect();
                self.identification = Some(identification);
                snippets
            }
        };
        self.extraction = extraction;
        self.snippets = dedupe(raw_snippets);
        self.phase = CapturePhase::Result;
    }

    /// Image could not be read or analyzed.
    pub fn fail_analysis(&mut self, message: impl Into<String>) {
        self.extraction = Extraction::default();
        self.snippets.clear();
        self.identification = None;
        self.demo_data = false;
        self.phase = CapturePhase::Error(message.into());
    }

    /// Discard the image and everything extracted from it.
    pub fn cancel_capture(&mut self) {
        self.clear_capture();
    }

    fn clear_capture(&mut self) {
        self.phase = CapturePhase::Capture;
        self.image_path = None;
        self.extraction = Extraction::default();
        self.snippets.clear();
        self.identification = None;
        self.demo_data = false;
        self.overlays.clear();
    }

    pub fn field_mut(&mut self, field: ExtractionField) -> &mut String {
        match field {
            ExtractionField::Sn => &mut self.extraction.sn,
            ExtractionField::Model => &mut self.extraction.model,
            ExtractionField::Manufacturer => &mut self.extraction.manufacturer,
            ExtractionField::HardwareVersion => &mut self.extraction.hardware_version,
        }
    }

    pub fn hardware_version_visible(&self) -> bool {
        self.extraction.category_label == NIC_LABEL
    }

    // Snippets

    /// Open the snippet editor on a copy of the snippet text.
    pub fn select_snippet(&mut self, index: usize) -> Result<(), ScanError> {
        let text = self
            .snippets
            .get(index)
            .cloned()
            .ok_or(ScanError::UnknownSnippet(index))?;
        self.overlays.push(Overlay::SnippetEditor { index, text });
        Ok(())
    }

    /// Text in the open snippet editor.
    pub fn snippet_text_mut(&mut self) -> Option<&mut String> {
        match self.overlays.top_mut() {
            Some(Overlay::SnippetEditor { text, .. }) => Some(text),
            _ => None,
        }
    }

    /// Write the edited snippet into one field and close the editor.
    pub fn assign_snippet(&mut self, target: SnippetTarget) -> Result<(), ScanError> {
        if target == SnippetTarget::HardwareVersion && !self.hardware_version_visible() {
            return Err(ScanError::HardwareVersionHidden(
                self.extraction.category_label.clone(),
            ));
        }
        let text = match self.overlays.top() {
            Some(Overlay::SnippetEditor { text, .. }) => text.clone(),
            _ => return Err(ScanError::NoSnippetSelected),
        };
        self.overlays.pop();
        let field = match target {
            SnippetTarget::Sn => ExtractionField::Sn,
            SnippetTarget::Model => ExtractionField::Model,
            SnippetTarget::HardwareVersion => ExtractionField::HardwareVersion,
        };
        *self.field_mut(field) = text;
        Ok(())
    }

    // Category picker

    pub fn open_category_picker(&mut self) {
        let selected = CATEGORY_LABELS
            .iter()
            .position(|label| *label == self.extraction.category_label)
            .unwrap_or(0);
        self.overlays.push(Overlay::CategoryPicker { selected });
    }

    /// Move the picker highlight by `delta`, wrapping.
    pub fn move_picker(&mut self, delta: isize) {
        if let Some(Overlay::CategoryPicker { selected }) = self.overlays.top_mut() {
            let len = CATEGORY_LABELS.len() as isize;
            *selected = (*selected as isize + delta).rem_euclid(len) as usize;
        }
    }

    /// Set the category label and close the picker. The hardware version is
    /// kept even when the new label hides it.
    pub fn pick_category(&mut self, label: &str) {
        self.extraction.category_label = label.to_string();
        if matches!(self.overlays.top(), Some(Overlay::CategoryPicker { .. })) {
            self.overlays.pop();
        }
    }

    /// Pick the highlighted picker entry.
    pub fn pick_selected_category(&mut self) {
        let selected = match self.overlays.top() {
            Some(Overlay::CategoryPicker { selected }) => *selected,
            _ => return,
        };
        self.pick_category(CATEGORY_LABELS[selected % CATEGORY_LABELS.len()]);
    }

    /// Close the top overlay. Closing a lookup sheet returns to idle.
    pub fn close_overlay(&mut self) {
        if let Some(Overlay::LookupResult) = self.overlays.pop() {
            self.reset();
        }
    }

    // Confirm

    pub fn can_confirm(&self) -> bool {
        self.phase == CapturePhase::Result
            && (!self.extraction.sn.is_empty() || !self.extraction.model.is_empty())
    }

    /// Build the suggested record, or `None` while confirm is disabled.
    pub fn confirm(&self) -> Option<ScanSuggestion> {
        if !self.can_confirm() {
            return None;
        }
        let extraction = &self.extraction;
        let label = extraction.category_label.as_str();
        let manufacturer = if extraction.manufacturer.trim().is_empty() {
            UNKNOWN_BRAND
        } else {
            extraction.manufacturer.as_str()
        };
        Some(ScanSuggestion {
            sn: extraction.sn.clone(),
            name: format!("{manufacturer} {label} {}", extraction.model)
                .trim_end()
                .to_string(),
            category: map_category_label(label),
            model: extraction.model.clone(),
            quantity: 1,
            status: PartStatus::New,
            notes: build_notes(label, &extraction.hardware_version),
        })
    }
}

fn build_notes(label: &str, hardware_version: &str) -> String {
    let mut notes = SOURCE_NOTE.to_string();
    if label == NIC_LABEL && !hardware_version.is_empty() {
        notes.push_str(&format!(" | 硬件版本: {hardware_version}"));
    }
    if !CANONICAL_LABELS.contains(&label) {
        notes.push_str(&format!(" | 类型: {label}"));
    }
    notes
}

/// Drop repeated snippets, keeping first occurrences in order.
fn dedupe(snippets: Vec<String>) -> Vec<String> {
    let mut seen = Vec::with_capacity(snippets.len());
    for snippet in snippets {
        if !seen.contains(&snippet) {
            seen.push(snippet);
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::{build_notes, dedupe, map_category_label};
    use pretty_assertions::assert_eq;
    use rackstock_model::PartCategory;

    #[test]
    fn every_picker_label_maps() {
        let mapped: Vec<_> = super::CATEGORY_LABELS
            .iter()
            .map(|label| map_category_label(label))
            .collect();
        assert_eq!(
            mapped,
            vec![
                PartCategory::Cpu,
                PartCategory::Disk,
                PartCategory::Other,
                PartCategory::Disk,
                PartCategory::Ram,
                PartCategory::Other,
                PartCategory::Nic,
            ]
        );
        assert_eq!(map_category_label("硬盘"), PartCategory::Other);
        assert_eq!(map_category_label(""), PartCategory::Other);
    }

    #[test]
    fn notes_suffixes() {
        assert_eq!(build_notes("CPU", "v2"), "AI补录 - 来源: 拍照识别");
        assert_eq!(
            build_notes("网卡", "Ver 2.5"),
            "AI补录 - 来源: 拍照识别 | 硬件版本: Ver 2.5"
        );
        assert_eq!(build_notes("网卡", ""), "AI补录 - 来源: 拍照识别");
        assert_eq!(build_notes("GPU", "x"), "AI补录 - 来源: 拍照识别 | 类型: GPU");
        assert_eq!(build_notes("硬盘", ""), "AI补录 - 来源: 拍照识别");
    }

    #[test]
    fn dedupe_keeps_first_order() {
        let input = ["b", "a", "b", "c", "a"].map(String::from).to_vec();
        assert_eq!(dedupe(input), vec!["b", "a", "c"]);
    }
}
