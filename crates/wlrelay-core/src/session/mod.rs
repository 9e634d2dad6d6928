//! Background transfer sessions and the one-shot hand-off.
//!
//! The runtime behind these traits owns sessions and tasks once they are
//! started and keeps them running after the sending process exits. Nothing
//! here can cancel a task: the only terminal action is `resume`.

mod bridge;
mod error;
mod handle;
mod identifier;
mod recording;

pub use bridge::{HandOff, TransferSessionBridge};
pub use error::TransportError;
pub use handle::TransferSessionHandle;
pub use identifier::SessionIdentifierScheme;
pub use recording::{Journal, JournalEntry, RecordingRuntime};

use url::Url;

/// Provider of background-capable transfer sessions.
pub trait TransferRuntime {
    /// Acquire the session for `identifier`. At most one live owner per
    /// identifier exists at a time; a second owner gets
    /// [`TransportError::SessionBusy`].
    fn background_session(&self, identifier: &str)
        -> Result<Box<dyn TransferSession>, TransportError>;
}

/// A session scoped to one identifier.
pub trait TransferSession: Send {
    fn download_task(&mut self, url: &Url) -> Result<Box<dyn TransferTask>, TransportError>;

    /// Accept no further tasks; in-flight tasks keep running.
    fn finish_tasks_and_invalidate(self: Box<Self>) -> Result<(), TransportError>;
}

/// A created transfer. Dropping the handle never cancels the transfer.
pub trait TransferTask: Send {
    fn resume(&mut self) -> Result<(), TransportError>;
}
