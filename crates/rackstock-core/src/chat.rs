//! Chat transcript with the inventory assistant.

use rackstock_gateway::ChatReply;
use rackstock_model::{ChatMessage, InventoryItem};

pub const DEFAULT_GREETING: &str =
    "你好！我是机房盘点助手。你可以问我关于库存的问题，或者让我协助分析配置。";

/// One line per item, used as grounding context for the assistant.
pub fn build_inventory_context(items: &[InventoryItem]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "{} (SN:{}, Model:{}): {}个, 位置 {}",
                item.name, item.sn, item.model, item.quantity, item.location
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Messages, the pending input line, and the loading flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
    pub input: String,
    loading: bool,
}

impl ChatTranscript {
    pub fn new(greeting: Option<&str>) -> Self {
        Self {
            messages: vec![ChatMessage::assistant(greeting.unwrap_or(DEFAULT_GREETING))],
            input: String::new(),
            loading: false,
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Move the input line into the transcript and mark a reply as pending.
    /// Blank input, or a question while one is pending, is ignored.
    pub fn submit(&mut self) -> Option<String> {
        if self.loading || self.input.trim().is_empty() {
            return None;
        }
        let message = std::mem::take(&mut self.input);
        self.messages.push(ChatMessage::user(message.clone()));
        self.loading = true;
        Some(message)
    }

    pub fn receive(&mut self, reply: &ChatReply) {
        self.messages.push(ChatMessage::assistant(reply.text()));
        self.loading = false;
    }
}
