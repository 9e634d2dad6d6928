//! Whitelist signals and the sentinel URI that carries them.
//!
//! The sentinel is `http://localhost/invalidimage-<unix-seconds>.png?website=<host>`.
//! Scheme and host are fixed and unroutable so the request cannot leave the
//! device; the image-like path keeps incidental logging and caching quiet;
//! the timestamp only makes each path unique.

mod decode;
mod encode;

pub use decode::{decode_signal, HostSignalDecoder, WhitelistCollector};
pub use encode::{encode, EncodeError, EncodedSignal};

use std::time::{SystemTime, UNIX_EPOCH};

use crate::hostname::CanonicalHostname;

pub const SENTINEL_SCHEME: &str = "http";
pub const SENTINEL_HOST: &str = "localhost";
pub const SENTINEL_PATH_PREFIX: &str = "/invalidimage-";
pub const SENTINEL_PATH_SUFFIX: &str = ".png";
pub const WEBSITE_PARAM: &str = "website";

/// One user confirmation. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WhitelistSignal {
    hostname: CanonicalHostname,
    created_at: u64,
}

impl WhitelistSignal {
    pub fn new(hostname: CanonicalHostname, created_at: u64) -> Self {
        Self {
            hostname,
            created_at,
        }
    }

    /// Signal stamped with the current wall-clock time.
    pub fn now(hostname: CanonicalHostname) -> Self {
        Self::new(hostname, unix_timestamp())
    }

    pub fn hostname(&self) -> &CanonicalHostname {
        &self.hostname
    }

    /// Seconds since the Unix epoch.
    pub fn created_at(&self) -> u64 {
        self.created_at
    }
}

/// Wall-clock seconds since the Unix epoch; 0 if the clock is before it.
pub fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
