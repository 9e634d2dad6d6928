//! Advisory ownership lock for one session identifier.
//!
//! `owner.lock` is held with an exclusive `flock`, so the OS releases it
//! when the owning process exits, crash included. The file itself stays on
//! disk; its content is the last owner's PID, for diagnostics only.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use fs2::FileExt;

use crate::session::TransportError;

pub(super) const LOCK_FILE: &str = "owner.lock";

/// Releases the owner lock when dropped.
#[derive(Debug)]
pub(super) struct OwnerGuard {
    file: File,
}

impl OwnerGuard {
    /// Lock `<session_dir>/owner.lock`; fails if a live owner holds it.
    pub(super) fn acquire(session_dir: &Path, identifier: &str) -> Result<Self, TransportError> {
        fs::create_dir_all(session_dir)?;
        let mut file = fs::OpenOptions::new()
            .create(true)
            .truncate(false)
            .read(true)
            .write(true)
            .open(session_dir.join(LOCK_FILE))?;

        if let Err(e) = file.try_lock_exclusive() {
            if e.kind() == fs2::lock_contended_error().kind() {
                return Err(TransportError::SessionBusy {
                    identifier: identifier.to_string(),
                });
            }
            return Err(e.into());
        }

        file.set_len(0)?;
        write!(file, "{}", std::process::id())?;
        tracing::trace!(identifier, pid = std::process::id(), "session owner lock taken");
        Ok(Self { file })
    }
}

impl Drop for OwnerGuard {
    fn drop(&mut self) {
        if let Err(e) = self.file.unlock() {
            tracing::warn!(error = %e, "failed to release session owner lock");
        }
    }
}
