//! `wlrelay drain` – host side: deliver spooled transfers to the decoder.

use anyhow::{Context, Result};
use wlrelay_core::config::WlrelayConfig;
use wlrelay_core::delivery;
use wlrelay_core::signal::WhitelistCollector;
use wlrelay_core::spool::SpoolRuntime;

pub async fn run_drain(cfg: &WlrelayConfig) -> Result<()> {
    let runtime = SpoolRuntime::new(cfg.spool_dir()?);
    let identifier = cfg.session_identifier();
    let delivery_cfg = cfg.delivery();

    let (summary, collector) = tokio::task::spawn_blocking(move || -> Result<_> {
        let mut collector = WhitelistCollector::new();
        let summary = delivery::drain(&runtime, &identifier, &mut collector, &delivery_cfg)?;
        Ok((summary, collector))
    })
    .await
    .context("drain task panicked")??;

    if collector.hostnames().is_empty() {
        println!("No whitelist signals ({} transfers taken).", summary.taken);
    } else {
        for host in collector.hostnames() {
            println!("whitelist {host}");
        }
    }
    Ok(())
}
