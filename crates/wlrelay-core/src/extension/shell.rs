//! The surrounding extension shell.

use super::InputItem;
use crate::session::{Journal, JournalEntry};

/// Host-facing side of the extension request.
pub trait ExtensionShell {
    /// Complete the extension request. This system always returns no items.
    fn complete_request(&mut self, returned_items: Vec<InputItem>);
}

/// Shell that appends its completion calls to a [`Journal`].
#[derive(Debug, Clone, Default)]
pub struct RecordingShell {
    journal: Journal,
}

impl RecordingShell {
    pub fn new(journal: Journal) -> Self {
        Self { journal }
    }
}

impl ExtensionShell for RecordingShell {
    fn complete_request(&mut self, returned_items: Vec<InputItem>) {
        self.journal.record(JournalEntry::RequestCompleted {
            returned_items: returned_items.len(),
        });
    }
}
