//! Rendering routines for the Rackstock TUI.

use crate::app::{App, ResultRow, Tab, result_rows};
use rackstock_core::{
    CATEGORY_LABELS, CapturePhase, EditorField, EditorSession, ExtractionField, LOW_STOCK_THRESHOLD,
    LookupStatus, Overlay, ScanMode, ScanWorkflow, SnippetTarget,
};
use rackstock_model::{AnalysisMode, PartStatus};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Cell, Clear, Paragraph, Row, Scrollbar, ScrollbarOrientation,
    ScrollbarState, Table, TableState, Tabs, Wrap,
};

// ── Theme colors ──────────────────────────────────────────────────────

const PRIMARY: Color = Color::Rgb(236, 91, 43); // #EC5B2B
const SECONDARY: Color = Color::Rgb(238, 121, 72); // #EE7948
const TEXT: Color = Color::Rgb(238, 238, 238); // #eeeeee
const TEXT_MUTED: Color = Color::Rgb(128, 128, 128); // #808080
const BORDER: Color = Color::Rgb(60, 60, 60); // #3c3c3c
const BORDER_ACTIVE: Color = Color::Rgb(238, 121, 72); // #EE7948
const YELLOW: Color = Color::Rgb(229, 192, 123); // #e5c07b
const GREEN: Color = Color::Rgb(120, 220, 140);
const RED: Color = Color::Rgb(255, 110, 110);

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Draw the entire TUI frame.
pub fn draw(frame: &mut Frame<'_>, app: &mut App) {
    let area = frame.area();
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // header + tabs
            Constraint::Min(0),    // body
            Constraint::Length(3), // input
            Constraint::Length(1), // status bar
        ])
        .split(area);

    draw_header(frame, app, root[0]);
    match app.tab {
        Tab::Inventory => draw_inventory(frame, app, root[1]),
        Tab::Dashboard => draw_dashboard(frame, app, root[1]),
        Tab::Chat => draw_chat(frame, app, root[1]),
    }
    draw_input(frame, app, root[2]);
    draw_status_bar(frame, app, root[3]);

    if let Some(editor) = app.state.editor.as_ref() {
        draw_editor(frame, editor, area);
    }
    if let Some(scan) = app.state.scanner.as_ref() {
        draw_scanner(frame, app, scan, area);
    }
    if app.state.pending_delete().is_some() {
        draw_delete_prompt(frame, app, area);
    }
}

fn draw_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(
            format!(" Rackstock v{VERSION} "),
            Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let ai_label = if app.ai_ready { "AI 已连接" } else { "AI 演示模式" };
    let right = format!("model {}  {} ", app.model, ai_label);
    let right_len = Line::from(right.as_str()).width() as u16 + 2;
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(right_len)])
        .split(inner);

    let titles: Vec<Line<'_>> = Tab::ALL
        .iter()
        .map(|tab| Line::from(format!(" {} ", tab.title())))
        .collect();
    let selected = Tab::ALL.iter().position(|tab| *tab == app.tab).unwrap_or(0);
    let tabs = Tabs::new(titles)
        .select(selected)
        .style(Style::default().fg(TEXT_MUTED))
        .highlight_style(Style::default().fg(SECONDARY).add_modifier(Modifier::BOLD))
        .divider(Span::styled("│", Style::default().fg(BORDER)));
    frame.render_widget(tabs, cols[0]);

    let ai_color = if app.ai_ready { GREEN } else { YELLOW };
    let info = Paragraph::new(Line::from(vec![
        Span::styled("model ", Style::default().fg(TEXT_MUTED)),
        Span::styled(app.model.as_str(), Style::default().fg(TEXT)),
        Span::styled(format!("  {ai_label}"), Style::default().fg(ai_color)),
    ]));
    frame.render_widget(info, cols[1]);
}

fn status_color(status: PartStatus) -> Color {
    match status {
        PartStatus::New => GREEN,
        PartStatus::Used => YELLOW,
        PartStatus::Faulty => RED,
    }
}

fn draw_inventory(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let items = app.state.visible_items();
    let title = if app.state.search.is_empty() {
        format!(" 库存 ({}) ", items.len())
    } else {
        format!(" 库存 ({}/{}) ", items.len(), app.state.items().len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(title, Style::default().fg(TEXT_MUTED)));

    if items.is_empty() {
        let empty = Paragraph::new(Line::from(Span::styled(
            "  没有匹配的配件",
            Style::default().fg(TEXT_MUTED),
        )))
        .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let header = Row::new(["SN", "名称", "分类", "型号", "数量", "状态", "位置", "更新"])
        .style(Style::default().fg(TEXT_MUTED).add_modifier(Modifier::BOLD));
    let rows = items.iter().map(|item| {
        let qty_style = if item.quantity < LOW_STOCK_THRESHOLD {
            Style::default().fg(RED)
        } else {
            Style::default().fg(TEXT)
        };
        Row::new(vec![
            Cell::from(item.sn.clone()),
            Cell::from(item.name.clone()),
            Cell::from(item.category.label()),
            Cell::from(item.model.clone()),
            Cell::from(Span::styled(item.quantity.to_string(), qty_style)),
            Cell::from(Span::styled(
                item.status.label(),
                Style::default().fg(status_color(item.status)),
            )),
            Cell::from(item.location.clone()),
            Cell::from(item.last_updated.to_string()),
        ])
        .style(Style::default().fg(TEXT))
    });
    let widths = [
        Constraint::Length(18),
        Constraint::Min(16),
        Constraint::Length(6),
        Constraint::Length(16),
        Constraint::Length(5),
        Constraint::Length(5),
        Constraint::Length(8),
        Constraint::Length(10),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().bg(BORDER).add_modifier(Modifier::BOLD))
        .highlight_symbol("› ");
    let mut state = TableState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(table, area, &mut state);
}

fn draw_dashboard(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let stats = app.state.dashboard();
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(0)])
        .split(area);
    let tiles = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4])
        .split(rows[0]);

    let latest = stats
        .latest_update
        .map(|date| date.to_string())
        .unwrap_or_else(|| "-".to_string());
    let tile_data = [
        ("配件总数", stats.total_quantity.to_string(), TEXT),
        ("分类数", stats.category_count.to_string(), TEXT),
        (
            "低库存",
            stats.low_stock_count.to_string(),
            if stats.low_stock_count > 0 { RED } else { GREEN },
        ),
        ("最近更新", latest, TEXT),
    ];
    for ((label, value, color), tile) in tile_data.into_iter().zip(tiles.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(BORDER))
            .title(Span::styled(format!(" {label} "), Style::default().fg(TEXT_MUTED)));
        let text = Paragraph::new(Line::from(Span::styled(
            format!(" {value}"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .block(block);
        frame.render_widget(text, *tile);
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(
            format!(" 分类库存 ({} 条记录) ", stats.record_count),
            Style::default().fg(TEXT_MUTED),
        ));
    let inner = block.inner(rows[1]);
    frame.render_widget(block, rows[1]);

    let max = stats.max_category_quantity().max(1);
    let bar_width = inner.width.saturating_sub(16) as u64;
    let lines: Vec<Line<'_>> = stats
        .per_category
        .iter()
        .map(|(category, qty)| {
            let filled = (qty * bar_width / max) as usize;
            let empty = (bar_width as usize).saturating_sub(filled);
            Line::from(vec![
                Span::styled(format!(" {:<5}", category.label()), Style::default().fg(TEXT)),
                Span::styled("█".repeat(filled), Style::default().fg(SECONDARY)),
                Span::styled("░".repeat(empty), Style::default().fg(BORDER)),
                Span::styled(format!(" {qty}"), Style::default().fg(TEXT_MUTED)),
            ])
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

/// Draw the chat transcript with border and scrollbar.
fn draw_chat(frame: &mut Frame<'_>, app: &mut App, area: Rect) {
    let lines = app.render_chat_lines();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(BORDER))
        .title(Span::styled(" 库存助手 ", Style::default().fg(TEXT_MUTED)));

    let inner = block.inner(area);
    let content_width = inner.width.saturating_sub(1);
    let content_height = inner.height as usize;

    let total_lines = Paragraph::new(lines.clone())
        .wrap(Wrap { trim: false })
        .line_count(content_width)
        .max(1);

    let max_scroll = total_lines.saturating_sub(content_height) as u16;
    app.update_scroll_bounds(max_scroll);
    let scroll = app.scroll;

    let chat_inner = Rect {
        width: inner.width.saturating_sub(1),
        ..inner
    };
    let chat = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(block, area);
    frame.render_widget(chat, chat_inner);

    if total_lines > content_height {
        let mut scrollbar_state = ScrollbarState::default()
            .content_length(total_lines)
            .position(scroll as usize)
            .viewport_content_length(content_height);
        let scrollbar_area = Rect {
            x: inner.x + inner.width.saturating_sub(1),
            y: inner.y,
            width: 1,
            height: inner.height,
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .style(Style::default().fg(BORDER))
                .thumb_style(Style::default().fg(TEXT_MUTED)),
            scrollbar_area,
            &mut scrollbar_state,
        );
    }
}

/// Input box: the search query on the inventory tab, the chat draft on the
/// chat tab.
fn draw_input(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let (title, text, placeholder, active) = match app.tab {
        Tab::Inventory => (
            " 搜索 ",
            app.state.search.as_str(),
            "按 / 搜索 SN、名称、型号或位置",
            app.search_active,
        ),
        Tab::Chat => (
            if app.state.chat.is_loading() { " 等待回复 " } else { " 提问 " },
            app.state.chat.input.as_str(),
            "例如：哪些配件库存不足？",
            !app.state.chat.is_loading(),
        ),
        Tab::Dashboard => (" 看板 ", "", "Tab 切换视图", false),
    };
    let active = active && !app.has_modal();
    let border_color = if active { BORDER_ACTIVE } else { BORDER };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border_color))
        .title(Span::styled(
            title,
            Style::default().fg(if active { SECONDARY } else { TEXT_MUTED }),
        ));
    let inner = block.inner(area);

    let prompt_style = Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD);
    let line = if text.is_empty() {
        Line::from(vec![
            Span::styled(" ", prompt_style),
            Span::styled(placeholder, Style::default().fg(TEXT_MUTED)),
        ])
    } else {
        Line::from(vec![
            Span::styled(" ", prompt_style),
            Span::styled(text, Style::default().fg(TEXT)),
        ])
    };
    frame.render_widget(block, area);
    frame.render_widget(Paragraph::new(line), inner);

    if active {
        let width = Line::from(text).width() as u16;
        frame.set_cursor_position((inner.x + 1 + width, inner.y));
    }
}

/// Shortcut hints for whatever currently owns the keyboard.
fn shortcut_hints(app: &App) -> Vec<(&'static str, &'static str)> {
    if app.state.pending_delete().is_some() {
        return vec![("y", "删除"), ("n", "取消")];
    }
    if let Some(scan) = app.state.scanner.as_ref() {
        return match (scan.overlays().top(), scan.mode(), scan.phase()) {
            (Some(Overlay::LookupResult), _, _) => match scan.lookup() {
                LookupStatus::Found(_) => vec![("e", "编辑"), ("Enter", "关闭")],
                _ => vec![("a", "AI补录"), ("Enter", "关闭")],
            },
            (Some(Overlay::CategoryPicker { .. }), _, _) => {
                vec![("↑↓", "选择"), ("Enter", "确定"), ("Esc", "返回")]
            }
            (Some(Overlay::SnippetEditor { .. }), _, _) => {
                vec![("Tab", "目标"), ("Enter", "填入"), ("Esc", "返回")]
            }
            (None, ScanMode::Barcode, _) => vec![("Enter", "查询"), ("Esc", "关闭")],
            (None, ScanMode::AiLabel, CapturePhase::Capture) => {
                vec![("Enter", "识别"), ("Ctrl+G", "模式"), ("Esc", "返回")]
            }
            (None, ScanMode::AiLabel, CapturePhase::Analyzing) => vec![("Esc", "关闭")],
            (None, ScanMode::AiLabel, CapturePhase::Error(_)) => {
                vec![("Enter", "重拍"), ("Esc", "取消")]
            }
            (None, ScanMode::AiLabel, CapturePhase::Result) => vec![
                ("↑↓", "字段"),
                ("Enter", "选择"),
                ("Ctrl+S", "确认"),
                ("Ctrl+R", "重拍"),
                ("Esc", "取消"),
            ],
        };
    }
    if app.state.editor.is_some() {
        return vec![
            ("Tab", "字段"),
            ("←→", "切换/数量"),
            ("Ctrl+S", "保存"),
            ("Esc", "取消"),
        ];
    }
    match app.tab {
        Tab::Inventory if app.search_active => vec![("Enter", "完成"), ("Esc", "清除")],
        Tab::Inventory => vec![
            ("a", "新增"),
            ("e", "编辑"),
            ("d", "删除"),
            ("s", "扫描"),
            ("/", "搜索"),
            ("Tab", "视图"),
            ("q", "退出"),
        ],
        Tab::Dashboard => vec![("Tab", "视图"), ("Ctrl+C", "退出")],
        Tab::Chat => vec![("Enter", "发送"), ("PgUp/PgDn", "滚动"), ("Tab", "视图")],
    }
}

/// Draw the status bar at the bottom.
fn draw_status_bar(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let status_color = match app.status.as_str() {
        "idle" => TEXT_MUTED,
        "saved" | "deleted" => GREEN,
        _ => YELLOW,
    };

    let mut shortcuts = Vec::new();
    for (idx, (key, label)) in shortcut_hints(app).into_iter().enumerate() {
        let lead = if idx == 0 { " " } else { "  " };
        shortcuts.push(Span::styled(
            format!("{lead}{key}"),
            Style::default().fg(TEXT_MUTED),
        ));
        shortcuts.push(Span::styled(format!(" {label}"), Style::default().fg(BORDER)));
    }

    let right_text = format!(" {} ", app.status);
    let right_len = Line::from(right_text.as_str()).width() as u16;
    let left_area = Rect {
        width: area.width.saturating_sub(right_len),
        ..area
    };
    let right_area = Rect {
        x: area.x + area.width.saturating_sub(right_len),
        width: right_len,
        ..area
    };

    frame.render_widget(Paragraph::new(Line::from(shortcuts)), left_area);
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            right_text,
            Style::default().fg(status_color),
        ))),
        right_area,
    );
}

// ── Popups ────────────────────────────────────────────────────────────

/// Rect of `width` x `height` centered in `area`, clipped to fit.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn popup_block(title: String, color: Color) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
        .title(Span::styled(
            title,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ))
}

fn field_line(label: &str, value: String, focused: bool) -> Line<'static> {
    let marker = if focused { "› " } else { "  " };
    let value_style = if focused {
        Style::default().fg(TEXT).bg(BORDER)
    } else {
        Style::default().fg(TEXT)
    };
    Line::from(vec![
        Span::styled(marker.to_string(), Style::default().fg(PRIMARY)),
        Span::styled(format!("{label:<6}"), Style::default().fg(TEXT_MUTED)),
        Span::styled(format!(" {value} "), value_style),
    ])
}

fn draw_editor(frame: &mut Frame<'_>, editor: &EditorSession, area: Rect) {
    let popup = centered(area, 64, EditorField::ALL.len() as u16 + 4);
    let title = if editor.is_new() {
        " 新增配件 ".to_string()
    } else {
        " 编辑配件 ".to_string()
    };
    let block = popup_block(title, SECONDARY);
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let draft = &editor.draft;
    let mut lines: Vec<Line<'_>> = EditorField::ALL
        .iter()
        .map(|field| {
            let value = match field {
                EditorField::Sn => draft.sn.clone(),
                EditorField::Name => draft.name.clone(),
                EditorField::Category => format!("‹ {} ›", draft.category.label()),
                EditorField::Model => draft.model.clone(),
                EditorField::Quantity => format!("- {} +", draft.quantity),
                EditorField::Status => format!("‹ {} ›", draft.status.label()),
                EditorField::Location => draft.location.clone(),
                EditorField::Notes => draft.notes.clone(),
            };
            field_line(field.label(), value, *field == editor.focus)
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "  Ctrl+S 保存  Esc 取消",
        Style::default().fg(TEXT_MUTED),
    )));
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_delete_prompt(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let name = app
        .state
        .pending_delete()
        .and_then(|id| app.state.inventory().get(id))
        .map(|item| item.name.clone())
        .unwrap_or_default();
    let popup = centered(area, 48, 5);
    let block = popup_block(" 删除配件 ".to_string(), RED);
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);
    let lines = vec![
        Line::from(Span::styled(
            format!(" 确定删除「{name}」吗？"),
            Style::default().fg(TEXT),
        )),
        Line::from(""),
        Line::from(Span::styled(
            " y 确认  n 取消",
            Style::default().fg(TEXT_MUTED),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_scanner(frame: &mut Frame<'_>, app: &App, scan: &ScanWorkflow, area: Rect) {
    let popup = centered(area, 72, 24);
    let title = match scan.mode() {
        ScanMode::Barcode => " 扫码查询 ".to_string(),
        ScanMode::AiLabel => format!(" AI 标签识别 ({}) ", mode_label(scan.analysis_mode())),
    };
    let block = popup_block(title, SECONDARY);
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    let lines = match scan.mode() {
        ScanMode::Barcode => barcode_lines(scan),
        ScanMode::AiLabel => match scan.phase() {
            CapturePhase::Capture => capture_lines(app, scan),
            CapturePhase::Analyzing => vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(
                        "  正在识别 {} ...",
                        scan.image_path()
                            .map(|path| path.display().to_string())
                            .unwrap_or_default()
                    ),
                    Style::default().fg(YELLOW),
                )),
            ],
            CapturePhase::Error(message) => vec![
                Line::from(""),
                Line::from(Span::styled(format!("  {message}"), Style::default().fg(RED))),
                Line::from(""),
                Line::from(Span::styled(
                    "  Enter 重拍  Esc 取消",
                    Style::default().fg(TEXT_MUTED),
                )),
            ],
            CapturePhase::Result => result_lines(app, scan),
        },
    };
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);

    match scan.overlays().top() {
        Some(Overlay::LookupResult) => draw_lookup_sheet(frame, scan, popup),
        Some(Overlay::CategoryPicker { selected }) => draw_category_picker(frame, *selected, popup),
        Some(Overlay::SnippetEditor { text, .. }) => {
            draw_snippet_editor(frame, text, app.snippet_target, popup)
        }
        None => {}
    }
}

fn mode_label(mode: AnalysisMode) -> &'static str {
    match mode {
        AnalysisMode::Label => "标签",
        AnalysisMode::General => "通用",
    }
}

fn barcode_lines(scan: &ScanWorkflow) -> Vec<Line<'static>> {
    vec![
        Line::from(""),
        Line::from(Span::styled(
            "  输入或扫描 SN 后按 Enter 查询",
            Style::default().fg(TEXT_MUTED),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("  SN ", Style::default().fg(TEXT_MUTED)),
            Span::styled(
                format!(" {}▏", scan.sn_input()),
                Style::default().fg(TEXT).bg(BORDER),
            ),
        ]),
    ]
}

fn capture_lines(app: &App, scan: &ScanWorkflow) -> Vec<Line<'static>> {
    let hint = match scan.analysis_mode() {
        AnalysisMode::Label => "  拍摄配件标签，提取 SN、型号与厂商",
        AnalysisMode::General => "  拍摄配件本体，识别名称与分类",
    };
    vec![
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(TEXT_MUTED))),
        Line::from(""),
        Line::from(vec![
            Span::styled("  图片 ", Style::default().fg(TEXT_MUTED)),
            Span::styled(
                format!(" {}▏", app.image_path_input),
                Style::default().fg(TEXT).bg(BORDER),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            "  Enter 开始识别  Ctrl+G 切换标签/通用",
            Style::default().fg(TEXT_MUTED),
        )),
    ]
}

fn result_lines(app: &App, scan: &ScanWorkflow) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if scan.is_demo_data() {
        lines.push(Line::from(Span::styled(
            " 演示数据 ",
            Style::default()
                .fg(Color::Rgb(10, 10, 10))
                .bg(YELLOW)
                .add_modifier(Modifier::BOLD),
        )));
    }
    if let Some(identification) = scan.identification() {
        lines.push(Line::from(Span::styled(
            format!("  {}", identification.name),
            Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
        )));
        if !identification.reasoning.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("  {}", identification.reasoning),
                Style::default().fg(TEXT_MUTED),
            )));
        }
    }

    let focused = app.focused_result_row();
    let extraction = &scan.extraction;
    let mut snippet_header = false;
    for row in result_rows(scan) {
        let is_focused = focused == Some(row);
        match row {
            ResultRow::Field(field) => {
                let (label, value) = match field {
                    ExtractionField::Sn => ("SN", extraction.sn.clone()),
                    ExtractionField::Model => ("型号", extraction.model.clone()),
                    ExtractionField::Manufacturer => ("厂商", extraction.manufacturer.clone()),
                    ExtractionField::HardwareVersion => {
                        ("硬件版本", extraction.hardware_version.clone())
                    }
                };
                lines.push(field_line(label, value, is_focused));
            }
            ResultRow::Category => lines.push(field_line(
                "分类",
                format!("{} ▾", extraction.category_label),
                is_focused,
            )),
            ResultRow::Snippet(index) => {
                if !snippet_header {
                    snippet_header = true;
                    lines.push(Line::from(""));
                    lines.push(Line::from(Span::styled(
                        "  识别到的文本 (Enter 填入字段)",
                        Style::default().fg(TEXT_MUTED),
                    )));
                }
                let text = scan.snippets().get(index).cloned().unwrap_or_default();
                let style = if is_focused {
                    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(TEXT)
                };
                lines.push(Line::from(Span::styled(format!("   · {text}"), style)));
            }
        }
    }

    lines.push(Line::from(""));
    let confirm_style = if scan.can_confirm() {
        Style::default().fg(GREEN)
    } else {
        Style::default().fg(TEXT_MUTED)
    };
    lines.push(Line::from(Span::styled("  Ctrl+S 确认入库", confirm_style)));
    lines
}

fn draw_lookup_sheet(frame: &mut Frame<'_>, scan: &ScanWorkflow, area: Rect) {
    let sheet = centered(area, 56, 10);
    let (title, color, lines) = match scan.lookup() {
        LookupStatus::Found(item) => (
            " 已找到 ",
            GREEN,
            vec![
                Line::from(Span::styled(
                    format!(" {}", item.name),
                    Style::default().fg(TEXT).add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(
                    format!(" SN {}", item.sn),
                    Style::default().fg(TEXT_MUTED),
                )),
                Line::from(Span::styled(
                    format!(" {} · {}", item.category.label(), item.model),
                    Style::default().fg(TEXT_MUTED),
                )),
                Line::from(Span::styled(
                    format!(" 数量 {}  位置 {}  {}", item.quantity, item.location, item.status.label()),
                    Style::default().fg(TEXT),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    " e 编辑  Enter 关闭",
                    Style::default().fg(TEXT_MUTED),
                )),
            ],
        ),
        _ => (
            " 未找到 ",
            YELLOW,
            vec![
                Line::from(Span::styled(
                    format!(" 库存中没有 SN「{}」", scan.sn_input().trim()),
                    Style::default().fg(TEXT),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    " a 使用 AI 标签识别补录  Enter 关闭",
                    Style::default().fg(TEXT_MUTED),
                )),
            ],
        ),
    };
    let block = popup_block(title.to_string(), color);
    let inner = block.inner(sheet);
    frame.render_widget(Clear, sheet);
    frame.render_widget(block, sheet);
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

fn draw_category_picker(frame: &mut Frame<'_>, selected: usize, area: Rect) {
    let picker = centered(area, 24, CATEGORY_LABELS.len() as u16 + 2);
    let block = popup_block(" 分类 ".to_string(), SECONDARY);
    let inner = block.inner(picker);
    frame.render_widget(Clear, picker);
    frame.render_widget(block, picker);
    let lines: Vec<Line<'_>> = CATEGORY_LABELS
        .iter()
        .enumerate()
        .map(|(idx, label)| {
            if idx == selected {
                Line::from(Span::styled(
                    format!("› {label}"),
                    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(format!("  {label}"), Style::default().fg(TEXT)))
            }
        })
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);
}

fn draw_snippet_editor(frame: &mut Frame<'_>, text: &str, target: SnippetTarget, area: Rect) {
    let editor = centered(area, 56, 6);
    let block = popup_block(" 编辑文本 ".to_string(), SECONDARY);
    let inner = block.inner(editor);
    frame.render_widget(Clear, editor);
    frame.render_widget(block, editor);
    let target_label = match target {
        SnippetTarget::Sn => "SN",
        SnippetTarget::Model => "型号",
        SnippetTarget::HardwareVersion => "硬件版本",
    };
    let lines = vec![
        Line::from(Span::styled(
            format!(" {text}▏"),
            Style::default().fg(TEXT).bg(BORDER),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled(" 填入 ", Style::default().fg(TEXT_MUTED)),
            Span::styled(
                target_label,
                Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  (Tab 切换)", Style::default().fg(TEXT_MUTED)),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}
