//! `wlrelay decode <uri>` – apply the host-side decoder contract.

use anyhow::{Context, Result};
use url::Url;
use wlrelay_core::signal::decode_signal;

pub fn run_decode(uri: &str) -> Result<()> {
    let url = Url::parse(uri).with_context(|| format!("invalid URI: {uri}"))?;
    match decode_signal(&url) {
        Some(host) => println!("{host}"),
        None => println!("(not a whitelist signal)"),
    }
    Ok(())
}
