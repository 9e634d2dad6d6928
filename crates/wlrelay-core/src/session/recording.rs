//! In-memory transfer runtime that journals every call.
//!
//! Used by `wlrelay invoke --dry-run` and by tests that check the order of
//! the hand-off. The journal is shareable so an extension shell can append
//! its completion call to the same sequence.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use url::Url;

use super::{TransferRuntime, TransferSession, TransferTask, TransportError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JournalEntry {
    RequestCompleted { returned_items: usize },
    SessionOpened { identifier: String },
    TaskCreated { url: Url },
    TaskResumed { url: Url },
    SessionFinished { identifier: String },
}

/// Ordered, shared record of protocol calls.
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Arc<Mutex<Vec<JournalEntry>>>,
}

impl Journal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, entry: JournalEntry) {
        lock(&self.entries).push(entry);
    }

    pub fn entries(&self) -> Vec<JournalEntry> {
        lock(&self.entries).clone()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.entries).is_empty()
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Runtime whose sessions and tasks only write to a [`Journal`].
#[derive(Debug, Clone, Default)]
pub struct RecordingRuntime {
    journal: Journal,
    live: Arc<Mutex<HashSet<String>>>,
    fail_sessions: bool,
    fail_tasks: bool,
}

impl RecordingRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_journal(journal: Journal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    /// Make every `background_session` call fail.
    pub fn failing_sessions(mut self) -> Self {
        self.fail_sessions = true;
        self
    }

    /// Make every `download_task` call fail.
    pub fn failing_tasks(mut self) -> Self {
        self.fail_tasks = true;
        self
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Identifiers whose sessions are acquired and not yet finished.
    pub fn live_identifiers(&self) -> Vec<String> {
        let mut ids: Vec<String> = lock(&self.live).iter().cloned().collect();
        ids.sort();
        ids
    }
}

impl TransferRuntime for RecordingRuntime {
    fn background_session(
        &self,
        identifier: &str,
    ) -> Result<Box<dyn TransferSession>, TransportError> {
        if self.fail_sessions {
            return Err(TransportError::Unavailable(
                "session creation disabled".to_string(),
            ));
        }
        if !lock(&self.live).insert(identifier.to_string()) {
            return Err(TransportError::SessionBusy {
                identifier: identifier.to_string(),
            });
        }
        self.journal.record(JournalEntry::SessionOpened {
            identifier: identifier.to_string(),
        });
        Ok(Box::new(RecordingSession {
            identifier: identifier.to_string(),
            journal: self.journal.clone(),
            live: Arc::clone(&self.live),
            fail_tasks: self.fail_tasks,
        }))
    }
}

struct RecordingSession {
    identifier: String,
    journal: Journal,
    live: Arc<Mutex<HashSet<String>>>,
    fail_tasks: bool,
}

impl TransferSession for RecordingSession {
    fn download_task(&mut self, url: &Url) -> Result<Box<dyn TransferTask>, TransportError> {
        if self.fail_tasks {
            return Err(TransportError::Unavailable(
                "task creation disabled".to_string(),
            ));
        }
        self.journal
            .record(JournalEntry::TaskCreated { url: url.clone() });
        Ok(Box::new(RecordingTask {
            url: url.clone(),
            journal: self.journal.clone(),
        }))
    }

    fn finish_tasks_and_invalidate(self: Box<Self>) -> Result<(), TransportError> {
        self.journal.record(JournalEntry::SessionFinished {
            identifier: self.identifier.clone(),
        });
        Ok(())
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        lock(&self.live).remove(&self.identifier);
    }
}

struct RecordingTask {
    url: Url,
    journal: Journal,
}

impl TransferTask for RecordingTask {
    fn resume(&mut self) -> Result<(), TransportError> {
        self.journal.record(JournalEntry::TaskResumed {
            url: self.url.clone(),
        });
        Ok(())
    }
}
