//! TUI event types for input and background task results.

use crossterm::event::KeyEvent;
use rackstock_gateway::{AnalysisOutcome, ChatReply};

/// Application event emitted by input handlers or spawned tasks.
#[derive(Debug)]
pub enum AppEvent {
    /// Keyboard input event.
    Input(KeyEvent),
    /// Periodic tick event.
    Tick,
    /// Scroll event in the chat view.
    Scroll(i16),
    /// Image analysis finished (live or demo data).
    AnalysisFinished(AnalysisOutcome),
    /// The image could not be read.
    AnalysisFailed(String),
    /// The assistant answered.
    ChatReplied(ChatReply),
}
