//! One session, at most one task.

use url::Url;

use super::{TransferRuntime, TransferSession, TransferTask, TransportError};

/// Owns a freshly acquired session and the single task started on it.
///
/// [`finish`](Self::finish) consumes the handle, so no task can be added
/// after the session is invalidated.
pub struct TransferSessionHandle {
    identifier: String,
    session: Box<dyn TransferSession>,
    task: Option<Box<dyn TransferTask>>,
}

impl TransferSessionHandle {
    pub fn open<R: TransferRuntime + ?Sized>(
        runtime: &R,
        identifier: &str,
    ) -> Result<Self, TransportError> {
        let session = runtime.background_session(identifier)?;
        tracing::debug!(identifier, "background session acquired");
        Ok(Self {
            identifier: identifier.to_string(),
            session,
            task: None,
        })
    }

    pub fn has_task(&self) -> bool {
        self.task.is_some()
    }

    /// Create the session's only task for `url` and resume it.
    pub fn start_task(&mut self, url: &Url) -> Result<(), TransportError> {
        if self.task.is_some() {
            return Err(TransportError::TaskAlreadyStarted {
                identifier: self.identifier.clone(),
            });
        }
        let mut task = self.session.download_task(url)?;
        task.resume()?;
        tracing::debug!(identifier = %self.identifier, url = %url, "transfer task resumed");
        self.task = Some(task);
        Ok(())
    }

    /// Invalidate the session, leaving the in-flight task to the runtime.
    pub fn finish(self) -> Result<String, TransportError> {
        let Self {
            identifier,
            session,
            task,
        } = self;
        session.finish_tasks_and_invalidate()?;
        // Released, not cancelled.
        drop(task);
        tracing::debug!(identifier = %identifier, "session finished and invalidated");
        Ok(identifier)
    }
}

impl std::fmt::Debug for TransferSessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TransferSessionHandle")
            .field("identifier", &self.identifier)
            .field("has_task", &self.task.is_some())
            .finish()
    }
}
