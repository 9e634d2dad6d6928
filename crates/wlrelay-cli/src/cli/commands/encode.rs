//! `wlrelay encode <hostname>` – print the sentinel URI.

use anyhow::{Context, Result};
use wlrelay_core::hostname::canonicalize;
use wlrelay_core::signal::{encode, WhitelistSignal};

pub fn run_encode(hostname: &str, timestamp: Option<u64>) -> Result<()> {
    let host = canonicalize(hostname)
        .with_context(|| format!("{hostname:?} has no usable hostname"))?;
    let signal = match timestamp {
        Some(t) => WhitelistSignal::new(host, t),
        None => WhitelistSignal::now(host),
    };
    let encoded = encode(&signal)?;
    println!("{}", encoded.url);
    Ok(())
}
