//! Add/edit form state.

use rackstock_model::{InventoryItem, ItemDraft, ItemId};

/// Which record the editor writes to on save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorTarget {
    New,
    Existing(ItemId),
}

/// Form fields in tab order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorField {
    Sn,
    Name,
    Category,
    Model,
    Quantity,
    Status,
    Location,
    Notes,
}

impl EditorField {
    pub const ALL: [EditorField; 8] = [
        EditorField::Sn,
        EditorField::Name,
        EditorField::Category,
        EditorField::Model,
        EditorField::Quantity,
        EditorField::Status,
        EditorField::Location,
        EditorField::Notes,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EditorField::Sn => "SN",
            EditorField::Name => "名称",
            EditorField::Category => "类别",
            EditorField::Model => "型号",
            EditorField::Quantity => "数量",
            EditorField::Status => "状态",
            EditorField::Location => "位置",
            EditorField::Notes => "备注",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// An open editor: the target record plus the draft being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorSession {
    pub target: EditorTarget,
    pub draft: ItemDraft,
    pub focus: EditorField,
}

impl EditorSession {
    /// Empty form for a new record.
    pub fn new_item() -> Self {
        Self::with_draft(ItemDraft::default())
    }

    /// New-record form pre-filled with the given draft.
    pub fn with_draft(draft: ItemDraft) -> Self {
        Self {
            target: EditorTarget::New,
            draft,
            focus: EditorField::Sn,
        }
    }

    /// Form pre-filled from an existing record.
    pub fn edit(item: &InventoryItem) -> Self {
        Self {
            target: EditorTarget::Existing(item.id.clone()),
            draft: item.to_draft(),
            focus: EditorField::Sn,
        }
    }

    pub fn is_new(&self) -> bool {
        self.target == EditorTarget::New
    }

    /// Mutable text for free-text fields; `None` for enum and numeric fields.
    pub fn text_mut(&mut self, field: EditorField) -> Option<&mut String> {
        match field {
            EditorField::Sn => Some(&mut self.draft.sn),
            EditorField::Name => Some(&mut self.draft.name),
            EditorField::Model => Some(&mut self.draft.model),
            EditorField::Location => Some(&mut self.draft.location),
            EditorField::Notes => Some(&mut self.draft.notes),
            EditorField::Category | EditorField::Quantity | EditorField::Status => None,
        }
    }

    /// Type a character into the focused field.
    pub fn input_char(&mut self, ch: char) {
        match self.focus {
            EditorField::Quantity => {
                if ch.is_ascii_digit() {
                    let text = format!("{}{}", self.quantity_text(), ch);
                    self.set_quantity_text(&text);
                }
            }
            EditorField::Category => self.draft.category = self.draft.category.next(),
            EditorField::Status => self.draft.status = self.draft.status.next(),
            field => {
                if let Some(text) = self.text_mut(field) {
                    text.push(ch);
                }
            }
        }
    }

    /// Delete the last character of the focused field.
    pub fn backspace(&mut self) {
        match self.focus {
            EditorField::Quantity => {
                let mut text = self.quantity_text();
                text.pop();
                self.set_quantity_text(&text);
            }
            field => {
                if let Some(text) = self.text_mut(field) {
                    text.pop();
                }
            }
        }
    }

    fn quantity_text(&self) -> String {
        if self.draft.quantity == 0 {
            String::new()
        } else {
            self.draft.quantity.to_string()
        }
    }

    pub fn step_quantity_up(&mut self) {
        self.draft.quantity = self.draft.quantity.saturating_add(1);
    }

    /// Decrement, never going below 1.
    pub fn step_quantity_down(&mut self) {
        self.draft.quantity = self.draft.quantity.saturating_sub(1).max(1);
    }

    /// Direct numeric entry; anything unparseable becomes 0.
    pub fn set_quantity_text(&mut self, text: &str) {
        self.draft.quantity = text.trim().parse::<u32>().unwrap_or(0);
    }
}

#[cfg(test)]
mod tests {
    use super::{EditorField, EditorSession};
    use pretty_assertions::assert_eq;
    use rackstock_model::{PartCategory, PartStatus};

    #[test]
    fn new_form_defaults() {
        let session = EditorSession::new_item();
        assert!(session.is_new());
        assert_eq!(session.draft.category, PartCategory::Other);
        assert_eq!(session.draft.status, PartStatus::New);
        assert_eq!(session.draft.quantity, 1);
        assert_eq!(session.draft.name, "");
    }

    #[test]
    fn stepper_clamps_at_one() {
        let mut session = EditorSession::new_item();
        session.step_quantity_down();
        assert_eq!(session.draft.quantity, 1);
        session.step_quantity_up();
        session.step_quantity_up();
        assert_eq!(session.draft.quantity, 3);
        session.set_quantity_text("0");
        session.step_quantity_down();
        assert_eq!(session.draft.quantity, 1);
    }

    #[test]
    fn direct_entry_falls_back_to_zero() {
        let mut session = EditorSession::new_item();
        session.set_quantity_text("42");
        assert_eq!(session.draft.quantity, 42);
        session.set_quantity_text("lots");
        assert_eq!(session.draft.quantity, 0);
        session.set_quantity_text("-3");
        assert_eq!(session.draft.quantity, 0);
    }

    #[test]
    fn typing_routes_by_focus() {
        let mut session = EditorSession::new_item();
        session.focus = EditorField::Quantity;
        session.backspace();
        assert_eq!(session.draft.quantity, 0);
        session.input_char('1');
        session.input_char('2');
        session.input_char('x');
        assert_eq!(session.draft.quantity, 12);

        session.focus = EditorField::Category;
        session.input_char(' ');
        assert_eq!(session.draft.category, PartCategory::Cpu);

        session.focus = EditorField::Sn.prev();
        assert_eq!(session.focus, EditorField::Notes);
        session.input_char('o');
        session.input_char('k');
        session.backspace();
        assert_eq!(session.draft.notes, "o");
    }
}
