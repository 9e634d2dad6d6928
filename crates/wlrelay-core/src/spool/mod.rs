//! Filesystem-backed background transfer runtime.
//!
//! Layout under the spool root:
//! - `<identifier>/owner.lock`: locked while a process owns the session;
//!   a crashed owner's lock is released by the OS.
//! - `<identifier>/tasks/<sha256(url)>.json`: one [`TransferRecord`] per
//!   resumed task.
//!
//! Records are on disk by the time `resume` returns, so they outlive the
//! process that queued them. The host side drains them with
//! [`SpoolRuntime::take_outstanding`].

mod lock;
mod record;

pub use record::TransferRecord;

use std::fs;
use std::path::{Path, PathBuf};

use url::Url;

use crate::session::{TransferRuntime, TransferSession, TransferTask, TransportError};
use crate::signal::unix_timestamp;
use lock::OwnerGuard;
use record::record_file_name;

const TASKS_DIR: &str = "tasks";
const TMP_EXTENSION: &str = "tmp";

#[derive(Debug, Clone)]
pub struct SpoolRuntime {
    root: PathBuf,
}

impl SpoolRuntime {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn session_dir(&self, identifier: &str) -> Result<PathBuf, TransportError> {
        let valid = !identifier.is_empty()
            && !identifier.starts_with('.')
            && identifier
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(TransportError::Unavailable(format!(
                "unusable session identifier {identifier:?}"
            )));
        }
        Ok(self.root.join(identifier))
    }

    /// Take ownership of `identifier`, remove every queued record and
    /// return them oldest first. Unreadable records and partial writes
    /// left by a crashed sender are dropped.
    pub fn take_outstanding(&self, identifier: &str) -> Result<Vec<TransferRecord>, TransportError> {
        let session_dir = self.session_dir(identifier)?;
        let _owner = OwnerGuard::acquire(&session_dir, identifier)?;
        let tasks_dir = session_dir.join(TASKS_DIR);
        if !tasks_dir.exists() {
            return Ok(Vec::new());
        }

        let mut records = Vec::new();
        for entry in fs::read_dir(&tasks_dir)? {
            let path = entry?.path();
            match path.extension().and_then(|e| e.to_str()) {
                Some("json") => {}
                Some(TMP_EXTENSION) => {
                    tracing::debug!(path = %path.display(), "removing partial transfer record");
                    fs::remove_file(&path)?;
                    continue;
                }
                _ => continue,
            }
            match read_record(&path) {
                Ok(record) => records.push(record),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "dropping unreadable transfer record")
                }
            }
            fs::remove_file(&path)?;
        }
        records.sort_by(|a, b| a.queued_at.cmp(&b.queued_at).then_with(|| a.url.cmp(&b.url)));
        Ok(records)
    }
}

fn read_record(path: &Path) -> Result<TransferRecord, TransportError> {
    let data = fs::read(path)?;
    Ok(serde_json::from_slice(&data)?)
}

impl TransferRuntime for SpoolRuntime {
    fn background_session(
        &self,
        identifier: &str,
    ) -> Result<Box<dyn TransferSession>, TransportError> {
        let session_dir = self.session_dir(identifier)?;
        let owner = OwnerGuard::acquire(&session_dir, identifier)?;
        let tasks_dir = session_dir.join(TASKS_DIR);
        fs::create_dir_all(&tasks_dir)?;
        Ok(Box::new(SpoolSession {
            tasks_dir,
            _owner: owner,
        }))
    }
}

struct SpoolSession {
    tasks_dir: PathBuf,
    _owner: OwnerGuard,
}

impl TransferSession for SpoolSession {
    fn download_task(&mut self, url: &Url) -> Result<Box<dyn TransferTask>, TransportError> {
        Ok(Box::new(SpoolTask {
            tasks_dir: self.tasks_dir.clone(),
            url: url.to_string(),
        }))
    }

    fn finish_tasks_and_invalidate(self: Box<Self>) -> Result<(), TransportError> {
        // Dropping the guard releases ownership; queued records stay.
        Ok(())
    }
}

struct SpoolTask {
    tasks_dir: PathBuf,
    url: String,
}

impl TransferTask for SpoolTask {
    fn resume(&mut self) -> Result<(), TransportError> {
        let record = TransferRecord {
            url: self.url.clone(),
            queued_at: unix_timestamp(),
        };
        let name = record_file_name(&self.url);
        let tmp = self.tasks_dir.join(format!("{name}.{TMP_EXTENSION}"));
        let written = fs::write(&tmp, serde_json::to_vec(&record)?)
            .and_then(|()| fs::rename(&tmp, self.tasks_dir.join(&name)));
        if let Err(e) = written {
            let _ = fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}
