//! View state for the Rackstock TUI, layered over [`AppState`].

use log::debug;
use rackstock_core::{AppState, ExtractionField, ScanWorkflow, SnippetTarget};
use rackstock_model::ChatRole;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use std::cmp::min;

/// Top-level tabs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Inventory,
    Dashboard,
    Chat,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Inventory, Tab::Dashboard, Tab::Chat];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Inventory => "库存",
            Tab::Dashboard => "看板",
            Tab::Chat => "助手",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// Focusable row in the AI result view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultRow {
    Field(ExtractionField),
    Category,
    Snippet(usize),
}

/// Rows of the AI result view in display order. The hardware-version row
/// only appears for network cards.
pub fn result_rows(scan: &ScanWorkflow) -> Vec<ResultRow> {
    let mut rows = vec![
        ResultRow::Field(ExtractionField::Sn),
        ResultRow::Field(ExtractionField::Model),
        ResultRow::Field(ExtractionField::Manufacturer),
        ResultRow::Category,
    ];
    if scan.hardware_version_visible() {
        rows.push(ResultRow::Field(ExtractionField::HardwareVersion));
    }
    rows.extend((0..scan.snippets().len()).map(ResultRow::Snippet));
    rows
}

/// Top-level application state for the TUI.
pub struct App {
    /// Domain state: items, editor, scanner, chat.
    pub state: AppState,
    pub tab: Tab,
    /// Selected row in the filtered inventory list.
    pub selected: usize,
    /// Whether keystrokes go to the search box.
    pub search_active: bool,
    /// Status line text.
    pub status: String,
    /// Model label shown in the header.
    pub model: String,
    /// Whether an API key is configured.
    pub ai_ready: bool,
    /// Image path typed in the capture view.
    pub image_path_input: String,
    /// Focused row in the AI result view.
    pub scan_cursor: usize,
    /// Target for the open snippet editor.
    pub snippet_target: SnippetTarget,
    /// Current chat scroll offset.
    pub scroll: u16,
    /// Whether to auto-scroll to the bottom.
    pub auto_scroll: bool,
    /// Maximum scroll offset for the chat view.
    pub chat_max_scroll: u16,
    /// Tick counter driving the loading spinner.
    pub ticks: u64,
}

impl App {
    pub fn new(state: AppState, model: impl Into<String>, ai_ready: bool) -> Self {
        Self {
            state,
            tab: Tab::Inventory,
            selected: 0,
            search_active: false,
            status: "idle".to_string(),
            model: model.into(),
            ai_ready,
            image_path_input: String::new(),
            scan_cursor: 0,
            snippet_target: SnippetTarget::Sn,
            scroll: 0,
            auto_scroll: true,
            chat_max_scroll: 0,
            ticks: 0,
        }
    }

    pub fn push_status(&mut self, status: impl Into<String>) {
        let status = status.into();
        debug!("status update (status={})", status);
        self.status = status;
    }

    /// Whether a popup owns the keyboard.
    pub fn has_modal(&self) -> bool {
        self.state.editor.is_some()
            || self.state.scanner.is_some()
            || self.state.pending_delete().is_some()
    }

    /// Id of the selected item in the filtered list.
    pub fn selected_id(&self) -> Option<String> {
        self.state
            .visible_items()
            .get(self.selected)
            .map(|item| item.id.clone())
    }

    pub fn select_next(&mut self) {
        let len = self.state.visible_items().len();
        if self.selected + 1 < len {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    /// Keep the selection inside the filtered list.
    pub fn clamp_selection(&mut self) {
        let len = self.state.visible_items().len();
        self.selected = min(self.selected, len.saturating_sub(1));
    }

    /// Select the item with the given id if it is visible.
    pub fn select_id(&mut self, id: &str) {
        if let Some(idx) = self
            .state
            .visible_items()
            .iter()
            .position(|item| item.id == id)
        {
            self.selected = idx;
        }
    }

    /// Move the AI result focus by `delta`, clamped to the visible rows.
    pub fn move_scan_cursor(&mut self, delta: isize) {
        let Some(scan) = self.state.scanner.as_ref() else {
            return;
        };
        let len = result_rows(scan).len();
        if len == 0 {
            self.scan_cursor = 0;
            return;
        }
        let next = (self.scan_cursor as isize + delta).clamp(0, len as isize - 1);
        self.scan_cursor = next as usize;
    }

    pub fn focused_result_row(&self) -> Option<ResultRow> {
        let scan = self.state.scanner.as_ref()?;
        let rows = result_rows(scan);
        rows.get(min(self.scan_cursor, rows.len().saturating_sub(1)))
            .copied()
    }

    /// Cycle the snippet target, skipping the hardware version when hidden.
    pub fn cycle_snippet_target(&mut self) {
        let hw_visible = self
            .state
            .scanner
            .as_ref()
            .is_some_and(|scan| scan.hardware_version_visible());
        self.snippet_target = match self.snippet_target {
            SnippetTarget::Sn => SnippetTarget::Model,
            SnippetTarget::Model if hw_visible => SnippetTarget::HardwareVersion,
            SnippetTarget::Model | SnippetTarget::HardwareVersion => SnippetTarget::Sn,
        };
    }

    /// Scroll the chat view upward by a number of lines.
    pub fn scroll_up(&mut self, lines: u16) {
        self.auto_scroll = false;
        self.scroll = self.scroll.saturating_sub(lines);
    }

    /// Scroll the chat view downward by a number of lines.
    pub fn scroll_down(&mut self, lines: u16) {
        self.scroll = min(self.scroll.saturating_add(lines), self.chat_max_scroll);
        if self.scroll >= self.chat_max_scroll {
            self.auto_scroll = true;
        }
    }

    /// Enable auto-scrolling to the bottom.
    pub fn enable_auto_scroll(&mut self) {
        self.auto_scroll = true;
        self.scroll = self.chat_max_scroll;
    }

    /// Update scroll bounds after layout changes. Only snaps to the new
    /// bottom when auto-scroll is on or the view was already at the bottom.
    pub fn update_scroll_bounds(&mut self, max_scroll: u16) {
        let was_at_bottom = self.scroll >= self.chat_max_scroll;
        self.chat_max_scroll = max_scroll;
        if self.auto_scroll || was_at_bottom {
            self.scroll = max_scroll;
            self.auto_scroll = true;
        } else {
            self.scroll = self.scroll.min(max_scroll);
        }
    }

    /// Render the chat transcript into styled lines.
    pub fn render_chat_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        let messages = self.state.chat.messages();

        for (idx, message) in messages.iter().enumerate() {
            let (prefix, bg) = match message.role {
                ChatRole::User => (" 我 ", Color::Rgb(107, 161, 230)),
                ChatRole::Assistant => (" 助手 ", Color::Rgb(238, 121, 72)),
            };
            let prefix_style = Style::default()
                .fg(Color::Rgb(10, 10, 10))
                .bg(bg)
                .add_modifier(Modifier::BOLD);
            lines.push(Line::from(vec![Span::styled(prefix, prefix_style)]));
            for line in message.text.lines() {
                lines.push(Line::from(Span::styled(
                    format!(" {line}"),
                    Style::default().fg(Color::Rgb(238, 238, 238)),
                )));
            }
            if idx + 1 < messages.len() {
                lines.push(Line::from(Span::raw("")));
            }
        }

        if self.state.chat.is_loading() {
            const SPINNER: [&str; 4] = ["·  ", "·· ", "···", " ··"];
            let frame = SPINNER[(self.ticks % SPINNER.len() as u64) as usize];
            lines.push(Line::from(Span::raw("")));
            lines.push(Line::from(Span::styled(
                format!(" 思考中 {frame}"),
                Style::default().fg(Color::Rgb(128, 128, 128)),
            )));
        }

        lines.push(Line::from(Span::raw("")));
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::{App, ResultRow, Tab, result_rows};
    use pretty_assertions::assert_eq;
    use rackstock_core::{AppState, ExtractionField, ScanWorkflow, SnippetTarget};
    use rackstock_test_utils::seeded_bridge;

    fn app() -> App {
        let (bridge, _store) = seeded_bridge();
        App::new(AppState::load(bridge, None).expect("state"), "mock", false)
    }

    #[test]
    fn tabs_cycle_both_ways() {
        assert_eq!(Tab::Inventory.next(), Tab::Dashboard);
        assert_eq!(Tab::Chat.next(), Tab::Inventory);
        assert_eq!(Tab::Inventory.prev(), Tab::Chat);
    }

    #[test]
    fn selection_follows_search_filter() {
        let mut app = app();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected_id().as_deref(), Some("3"));

        app.state.search = "cisco".to_string();
        app.clamp_selection();
        assert_eq!(app.selected, 0);
        assert_eq!(app.selected_id().as_deref(), Some("4"));
        app.select_next();
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn result_rows_hide_hardware_version_unless_nic() {
        let mut scan = ScanWorkflow::new();
        assert_eq!(result_rows(&scan).len(), 4);
        scan.pick_category("网卡");
        let rows = result_rows(&scan);
        assert_eq!(
            rows.last(),
            Some(&ResultRow::Field(ExtractionField::HardwareVersion))
        );
    }

    #[test]
    fn snippet_target_skips_hidden_hardware_version() {
        let mut app = app();
        app.state.open_scanner();
        app.cycle_snippet_target();
        app.cycle_snippet_target();
        assert_eq!(app.snippet_target, SnippetTarget::Sn);

        if let Some(scan) = app.state.scanner.as_mut() {
            scan.pick_category("网卡");
        }
        app.cycle_snippet_target();
        app.cycle_snippet_target();
        assert_eq!(app.snippet_target, SnippetTarget::HardwareVersion);
    }

    #[test]
    fn chat_lines_include_greeting_and_spinner() {
        let mut app = app();
        let idle = app.render_chat_lines().len();
        app.state.chat.input = "hi".to_string();
        app.state.chat.submit();
        assert!(app.render_chat_lines().len() > idle);
    }
}
