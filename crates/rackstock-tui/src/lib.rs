//! Terminal UI for the Rackstock parts inventory.

mod app;
mod event;
mod ui;

use anyhow::anyhow;
use app::{App, ResultRow, Tab};
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event as CrosstermEvent, KeyCode, KeyEvent,
    KeyEventKind, KeyModifiers, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use event::AppEvent;
use log::{debug, info, warn};
use rackstock_core::{AppState, CapturePhase, EditorField, LookupStatus, Overlay, ScanMode};
use rackstock_gateway::{AiGateway, ChatReply, ImageInput};
use rackstock_model::AnalysisMode;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::io::{self, Stdout};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;

/// Display settings for the TUI.
#[derive(Debug, Clone, Default)]
pub struct TuiConfig {
    /// Model label shown in the header.
    pub model_name: String,
}

/// Launch the Rackstock TUI over a loaded application state.
///
/// The caller is responsible for initializing logging before calling `run`.
///
/// # Errors
/// Returns an error if terminal setup or the event loop fails.
pub async fn run(state: AppState, gateway: AiGateway, config: TuiConfig) -> anyhow::Result<()> {
    let mut app = App::new(state, config.model_name, gateway.is_configured());
    if !app.ai_ready {
        app.push_status("未配置 API Key，AI 使用演示数据");
    }

    let mut terminal = setup_terminal()?;
    let (tx, mut rx) = mpsc::channel(256);
    spawn_input_handler(tx.clone());
    spawn_tick(tx.clone());

    let result = async {
        loop {
            terminal.draw(|frame| ui::draw(frame, &mut app))?;
            let event = rx
                .recv()
                .await
                .ok_or_else(|| anyhow!("event channel closed unexpectedly"))?;
            if handle_app_event(event, &gateway, &mut app, tx.clone())? {
                break;
            }
        }
        Ok::<(), anyhow::Error>(())
    }
    .await;

    restore_terminal(&mut terminal)?;
    info!("tui exited");
    result
}

/// Dispatch a UI event and return true when the app should exit.
fn handle_app_event(
    event: AppEvent,
    gateway: &AiGateway,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) -> anyhow::Result<bool> {
    match event {
        AppEvent::Input(key) => handle_input(key, gateway, app, sender),
        AppEvent::Tick => {
            app.ticks = app.ticks.wrapping_add(1);
            Ok(false)
        }
        AppEvent::Scroll(delta) => {
            if app.tab == Tab::Chat {
                if delta < 0 {
                    app.scroll_up((-delta) as u16);
                } else if delta > 0 {
                    app.scroll_down(delta as u16);
                }
            } else if app.tab == Tab::Inventory && !app.has_modal() {
                if delta < 0 {
                    app.select_prev();
                } else if delta > 0 {
                    app.select_next();
                }
            }
            Ok(false)
        }
        AppEvent::AnalysisFinished(outcome) => {
            let Some(scan) = app.state.scanner.as_mut() else {
                debug!("dropping analysis result for closed scanner");
                return Ok(false);
            };
            let demo = outcome.is_fallback();
            scan.complete_analysis(outcome);
            app.scan_cursor = 0;
            app.push_status(if demo { "AI 不可用，显示演示数据" } else { "识别完成" });
            Ok(false)
        }
        AppEvent::AnalysisFailed(message) => {
            if let Some(scan) = app.state.scanner.as_mut() {
                scan.fail_analysis(message.clone());
            }
            app.push_status(message);
            Ok(false)
        }
        AppEvent::ChatReplied(reply) => {
            app.state.chat.receive(&reply);
            app.enable_auto_scroll();
            match reply {
                ChatReply::Answer(_) => app.push_status("idle"),
                ChatReply::NotConfigured => app.push_status("未配置 API Key"),
                ChatReply::Unavailable { reason } => app.push_status(format!("AI 错误: {reason}")),
            }
            Ok(false)
        }
    }
}

/// Route a keystroke to whichever layer owns the keyboard.
fn handle_input(
    key: KeyEvent,
    gateway: &AiGateway,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) -> anyhow::Result<bool> {
    if key.kind == KeyEventKind::Release {
        return Ok(false);
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        return Ok(true);
    }

    if app.state.pending_delete().is_some() {
        handle_delete_input(key, app)?;
        return Ok(false);
    }
    if app.state.scanner.is_some() {
        handle_scanner_input(key, gateway, app, sender)?;
        return Ok(false);
    }
    if app.state.editor.is_some() {
        handle_editor_input(key, app)?;
        return Ok(false);
    }
    handle_main_input(key, gateway, app, sender)
}

fn handle_delete_input(key: KeyEvent, app: &mut App) -> anyhow::Result<()> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Enter => {
            if app.state.confirm_delete()? {
                app.push_status("deleted");
            }
            app.clamp_selection();
        }
        KeyCode::Char('n') | KeyCode::Esc => app.state.cancel_delete(),
        _ => {}
    }
    Ok(())
}

fn handle_editor_input(key: KeyEvent, app: &mut App) -> anyhow::Result<()> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if key.code == KeyCode::Enter || (ctrl && key.code == KeyCode::Char('s')) {
        if let Some(id) = app.state.save_editor()? {
            app.select_id(&id);
            app.push_status("saved");
        }
        return Ok(());
    }

    if key.code == KeyCode::Esc {
        app.state.cancel_editor();
        return Ok(());
    }

    let Some(editor) = app.state.editor.as_mut() else {
        return Ok(());
    };
    match key.code {
        KeyCode::Tab | KeyCode::Down => editor.focus = editor.focus.next(),
        KeyCode::BackTab | KeyCode::Up => editor.focus = editor.focus.prev(),
        KeyCode::Right | KeyCode::Char('+') if editor.focus == EditorField::Quantity => {
            editor.step_quantity_up()
        }
        KeyCode::Left | KeyCode::Char('-') if editor.focus == EditorField::Quantity => {
            editor.step_quantity_down()
        }
        KeyCode::Left | KeyCode::Right if editor.focus == EditorField::Category => {
            editor.draft.category = editor.draft.category.next()
        }
        KeyCode::Left | KeyCode::Right if editor.focus == EditorField::Status => {
            editor.draft.status = editor.draft.status.next()
        }
        KeyCode::Backspace => editor.backspace(),
        KeyCode::Char(ch) if !ctrl => editor.input_char(ch),
        _ => {}
    }
    Ok(())
}

fn handle_main_input(
    key: KeyEvent,
    gateway: &AiGateway,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) -> anyhow::Result<bool> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if app.tab == Tab::Inventory && app.search_active {
        match key.code {
            KeyCode::Enter | KeyCode::Tab => app.search_active = false,
            KeyCode::Esc => {
                app.state.search.clear();
                app.search_active = false;
            }
            KeyCode::Backspace => {
                app.state.search.pop();
            }
            KeyCode::Char(ch) if !ctrl => app.state.search.push(ch),
            _ => {}
        }
        app.clamp_selection();
        return Ok(false);
    }

    match key.code {
        KeyCode::Tab => {
            app.tab = app.tab.next();
            return Ok(false);
        }
        KeyCode::BackTab => {
            app.tab = app.tab.prev();
            return Ok(false);
        }
        _ => {}
    }

    match app.tab {
        Tab::Inventory => match key.code {
            KeyCode::Char('q') => return Ok(true),
            KeyCode::Char('/') => app.search_active = true,
            KeyCode::Char('j') | KeyCode::Down => app.select_next(),
            KeyCode::Char('k') | KeyCode::Up => app.select_prev(),
            KeyCode::Char('a') => app.state.open_new_item(),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some(id) = app.selected_id() {
                    app.state.open_edit(&id)?;
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = app.selected_id() {
                    app.state.request_delete(id);
                }
            }
            KeyCode::Char('s') => {
                app.state.open_scanner();
                app.image_path_input.clear();
                app.scan_cursor = 0;
            }
            _ => {}
        },
        Tab::Dashboard => {
            if key.code == KeyCode::Char('q') {
                return Ok(true);
            }
        }
        Tab::Chat => match key.code {
            KeyCode::Enter => {
                if let Some(message) = app.state.chat.submit() {
                    let context = app.state.chat_context();
                    app.enable_auto_scroll();
                    app.push_status("thinking");
                    spawn_chat(gateway.clone(), message, context, sender);
                }
            }
            KeyCode::Backspace => {
                app.state.chat.input.pop();
            }
            KeyCode::PageUp => app.scroll_up(10),
            KeyCode::PageDown => app.scroll_down(10),
            KeyCode::Up => app.scroll_up(1),
            KeyCode::Down => app.scroll_down(1),
            KeyCode::Char(ch) if !ctrl => app.state.chat.input.push(ch),
            _ => {}
        },
    }
    Ok(false)
}

fn handle_scanner_input(
    key: KeyEvent,
    gateway: &AiGateway,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) -> anyhow::Result<()> {
    let Some(scan) = app.state.scanner.as_ref() else {
        return Ok(());
    };
    let top = scan.overlays().top().cloned();
    let mode = scan.mode();
    let phase = scan.phase().clone();
    let found = matches!(scan.lookup(), LookupStatus::Found(_));

    match top {
        Some(Overlay::LookupResult) => handle_lookup_input(key, app, found),
        Some(Overlay::CategoryPicker { .. }) => {
            if let Some(scan) = app.state.scanner.as_mut() {
                match key.code {
                    KeyCode::Up | KeyCode::Char('k') => scan.move_picker(-1),
                    KeyCode::Down | KeyCode::Char('j') => scan.move_picker(1),
                    KeyCode::Enter => scan.pick_selected_category(),
                    KeyCode::Esc => scan.close_overlay(),
                    _ => {}
                }
            }
            app.move_scan_cursor(0);
            Ok(())
        }
        Some(Overlay::SnippetEditor { .. }) => {
            handle_snippet_input(key, app);
            Ok(())
        }
        None => match (mode, phase) {
            (ScanMode::Barcode, _) => {
                handle_barcode_input(key, app);
                Ok(())
            }
            (ScanMode::AiLabel, CapturePhase::Capture) => {
                handle_capture_input(key, gateway, app, sender);
                Ok(())
            }
            (ScanMode::AiLabel, CapturePhase::Analyzing) => {
                if key.code == KeyCode::Esc {
                    app.state.close_scanner();
                }
                Ok(())
            }
            (ScanMode::AiLabel, CapturePhase::Error(_)) => {
                let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
                match key.code {
                    KeyCode::Enter => start_capture(gateway, app, sender),
                    KeyCode::Char('r') if ctrl => start_capture(gateway, app, sender),
                    KeyCode::Esc => {
                        if let Some(scan) = app.state.scanner.as_mut() {
                            scan.cancel_capture();
                        }
                    }
                    _ => {}
                }
                Ok(())
            }
            (ScanMode::AiLabel, CapturePhase::Result) => {
                handle_result_input(key, gateway, app, sender);
                Ok(())
            }
        },
    }
}

fn handle_lookup_input(key: KeyEvent, app: &mut App, found: bool) -> anyhow::Result<()> {
    match key.code {
        KeyCode::Char('e') if found => {
            if app.state.edit_found_item()? {
                app.tab = Tab::Inventory;
            }
        }
        KeyCode::Char('a') if !found => {
            let switched = app
                .state
                .scanner
                .as_mut()
                .map(|scan| scan.switch_to_ai_label());
            match switched {
                Some(Ok(())) => {
                    app.image_path_input.clear();
                    app.push_status("拍摄标签补录");
                }
                Some(Err(err)) => app.push_status(err.to_string()),
                None => {}
            }
        }
        KeyCode::Enter | KeyCode::Esc => {
            if let Some(scan) = app.state.scanner.as_mut() {
                scan.close_overlay();
            }
        }
        _ => {}
    }
    Ok(())
}

fn handle_barcode_input(key: KeyEvent, app: &mut App) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => app.state.submit_scan_sn(),
        KeyCode::Esc => app.state.close_scanner(),
        KeyCode::Backspace => {
            if let Some(scan) = app.state.scanner.as_mut() {
                scan.pop_sn_char();
            }
        }
        KeyCode::Char(ch) if !ctrl => {
            if let Some(scan) = app.state.scanner.as_mut() {
                scan.push_sn_char(ch);
            }
        }
        _ => {}
    }
}

fn handle_capture_input(
    key: KeyEvent,
    gateway: &AiGateway,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => start_capture(gateway, app, sender),
        KeyCode::Char('g') if ctrl => {
            if let Some(scan) = app.state.scanner.as_mut() {
                scan.toggle_analysis_mode();
            }
        }
        KeyCode::Esc => {
            if let Some(scan) = app.state.scanner.as_mut() {
                scan.switch_to_barcode();
            }
        }
        KeyCode::Backspace => {
            app.image_path_input.pop();
        }
        KeyCode::Char(ch) if !ctrl => app.image_path_input.push(ch),
        _ => {}
    }
}

fn handle_result_input(
    key: KeyEvent,
    gateway: &AiGateway,
    app: &mut App,
    sender: mpsc::Sender<AppEvent>,
) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let focused = app.focused_result_row();
    match key.code {
        KeyCode::Up => app.move_scan_cursor(-1),
        KeyCode::Down | KeyCode::Tab => app.move_scan_cursor(1),
        KeyCode::BackTab => app.move_scan_cursor(-1),
        KeyCode::Char('s') if ctrl => {
            let suggestion = app.state.scanner.as_ref().and_then(|scan| scan.confirm());
            match suggestion {
                Some(suggestion) => {
                    app.state.handle_scan_complete(suggestion);
                    app.tab = Tab::Inventory;
                    app.push_status("请核对后保存");
                }
                None => app.push_status("需要 SN 或型号才能确认"),
            }
        }
        KeyCode::Char('r') if ctrl => start_capture(gateway, app, sender),
        KeyCode::Esc => {
            if let Some(scan) = app.state.scanner.as_mut() {
                scan.cancel_capture();
            }
        }
        KeyCode::Enter => match focused {
            Some(ResultRow::Category) => {
                if let Some(scan) = app.state.scanner.as_mut() {
                    scan.open_category_picker();
                }
            }
            Some(ResultRow::Snippet(index)) => {
                let selected = app
                    .state
                    .scanner
                    .as_mut()
                    .map(|scan| scan.select_snippet(index));
                match selected {
                    Some(Ok(())) => app.snippet_target = rackstock_core::SnippetTarget::Sn,
                    Some(Err(err)) => app.push_status(err.to_string()),
                    None => {}
                }
            }
            Some(ResultRow::Field(_)) => app.move_scan_cursor(1),
            None => {}
        },
        KeyCode::Backspace => {
            if let (Some(ResultRow::Field(field)), Some(scan)) =
                (focused, app.state.scanner.as_mut())
            {
                scan.field_mut(field).pop();
            }
        }
        KeyCode::Char(ch) if !ctrl => {
            if let (Some(ResultRow::Field(field)), Some(scan)) =
                (focused, app.state.scanner.as_mut())
            {
                scan.field_mut(field).push(ch);
            }
        }
        _ => {}
    }
}

fn handle_snippet_input(key: KeyEvent, app: &mut App) {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Tab => app.cycle_snippet_target(),
        KeyCode::Enter => {
            let target = app.snippet_target;
            let assigned = app
                .state
                .scanner
                .as_mut()
                .map(|scan| scan.assign_snippet(target));
            if let Some(Err(err)) = assigned {
                app.push_status(err.to_string());
            }
        }
        KeyCode::Esc => {
            if let Some(scan) = app.state.scanner.as_mut() {
                scan.close_overlay();
            }
        }
        KeyCode::Backspace => {
            if let Some(text) = app
                .state
                .scanner
                .as_mut()
                .and_then(|scan| scan.snippet_text_mut())
            {
                text.pop();
            }
        }
        KeyCode::Char(ch) if !ctrl => {
            if let Some(text) = app
                .state
                .scanner
                .as_mut()
                .and_then(|scan| scan.snippet_text_mut())
            {
                text.push(ch);
            }
        }
        _ => {}
    }
}

/// Begin analyzing the image at the typed path.
fn start_capture(gateway: &AiGateway, app: &mut App, sender: mpsc::Sender<AppEvent>) {
    let path = app.image_path_input.trim().to_string();
    if path.is_empty() {
        app.push_status("请输入图片路径");
        return;
    }
    let path = PathBuf::from(path);
    let Some(scan) = app.state.scanner.as_mut() else {
        return;
    };
    match scan.begin_capture(path.clone()) {
        Ok(mode) => {
            app.scan_cursor = 0;
            app.push_status("analyzing");
            spawn_analysis(gateway.clone(), path, mode, sender);
        }
        Err(err) => app.push_status(err.to_string()),
    }
}

fn spawn_analysis(
    gateway: AiGateway,
    path: PathBuf,
    mode: AnalysisMode,
    sender: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        let event = match ImageInput::load(&path).await {
            Ok(image) => AppEvent::AnalysisFinished(gateway.analyze(&image, mode).await),
            Err(err) => {
                warn!(
                    "failed to read image (path={}, error={})",
                    path.display(),
                    err
                );
                AppEvent::AnalysisFailed(format!("读取图片失败: {err}"))
            }
        };
        let _ = sender.send(event).await;
    });
}

fn spawn_chat(
    gateway: AiGateway,
    message: String,
    context: String,
    sender: mpsc::Sender<AppEvent>,
) {
    tokio::spawn(async move {
        let reply = gateway.ask(&message, &context).await;
        let _ = sender.send(AppEvent::ChatReplied(reply)).await;
    });
}

/// Spawn a task to poll for input events.
fn spawn_input_handler(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        const MOUSE_SCROLL_LINES: i16 = 3;
        loop {
            if matches!(crossterm::event::poll(Duration::from_millis(30)), Ok(true)) {
                while matches!(crossterm::event::poll(Duration::from_millis(0)), Ok(true)) {
                    let event = match crossterm::event::read() {
                        Ok(event) => event,
                        Err(_) => break,
                    };
                    match event {
                        CrosstermEvent::Key(key) => {
                            let _ = sender.send(AppEvent::Input(key)).await;
                        }
                        CrosstermEvent::Mouse(mouse) => match mouse.kind {
                            MouseEventKind::ScrollUp => {
                                let _ = sender.send(AppEvent::Scroll(-MOUSE_SCROLL_LINES)).await;
                            }
                            MouseEventKind::ScrollDown => {
                                let _ = sender.send(AppEvent::Scroll(MOUSE_SCROLL_LINES)).await;
                            }
                            _ => {}
                        },
                        _ => {}
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    });
}

/// Spawn a periodic tick event generator.
fn spawn_tick(sender: mpsc::Sender<AppEvent>) {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_millis(250));
        loop {
            interval.tick().await;
            let _ = sender.send(AppEvent::Tick).await;
        }
    });
}

/// Configure terminal in raw mode with alternate screen.
fn setup_terminal() -> anyhow::Result<Terminal<CrosstermBackend<Stdout>>> {
    debug!("setting up terminal");
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal state on exit.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> anyhow::Result<()> {
    debug!("restoring terminal");
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    Ok(())
}
