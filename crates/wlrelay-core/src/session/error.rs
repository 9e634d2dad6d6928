use thiserror::Error;

/// Session, task or spool failure. Never retried and never shown to the user.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("session {identifier} already has a live owner")]
    SessionBusy { identifier: String },
    #[error("session {identifier} already carries a task")]
    TaskAlreadyStarted { identifier: String },
    #[error("transfer runtime unavailable: {0}")]
    Unavailable(String),
    #[error("spool I/O: {0}")]
    Io(#[from] std::io::Error),
    #[error("spool record: {0}")]
    Record(#[from] serde_json::Error),
}
