//! Spooled transfer records.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// One resumed task waiting for the runtime to perform it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRecord {
    pub url: String,
    /// Unix seconds at which the task was resumed.
    pub queued_at: u64,
}

/// Record file name: the same URL always maps to the same file.
pub(super) fn record_file_name(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    format!("{}.json", hex::encode(digest))
}
