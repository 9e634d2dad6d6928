//! Host-side delivery of spooled transfers.
//!
//! Plays the part of the OS transfer subsystem on the host's behalf: every
//! queued task is performed with libcurl, and failed ones are redelivered
//! to the session's decoder. Sentinel transfers are expected to fail;
//! completed transfers are never shown to the decoder.

use anyhow::{Context, Result};
use url::Url;

use crate::config::DeliveryConfig;
use crate::signal::HostSignalDecoder;
use crate::spool::{SpoolRuntime, TransferRecord};

/// Result of performing one transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransferOutcome {
    /// 2xx response.
    Completed { status: u32 },
    /// Transport error or non-2xx response.
    Failed { reason: String },
}

/// Per-drain counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DrainSummary {
    pub taken: usize,
    pub failed: usize,
    pub completed: usize,
    pub invalid: usize,
}

/// Perform a GET of `url`, discarding the body.
///
/// Runs in the current thread; call from `spawn_blocking` in async code.
pub fn attempt_transfer(url: &Url, cfg: &DeliveryConfig) -> TransferOutcome {
    match perform_get(url, cfg) {
        Ok(status) if (200..300).contains(&status) => TransferOutcome::Completed { status },
        Ok(status) => TransferOutcome::Failed {
            reason: format!("HTTP {status}"),
        },
        Err(e) => TransferOutcome::Failed {
            reason: format!("{e:#}"),
        },
    }
}

fn perform_get(url: &Url, cfg: &DeliveryConfig) -> Result<u32> {
    let mut easy = curl::easy::Easy::new();
    easy.url(url.as_str()).context("invalid URL")?;
    easy.get(true)?;
    easy.follow_location(false)?;
    easy.connect_timeout(cfg.connect_timeout())?;
    easy.timeout(cfg.timeout())?;
    {
        let mut transfer = easy.transfer();
        transfer.write_function(|data| Ok(data.len()))?;
        transfer.perform().context("transfer failed")?;
    }
    easy.response_code().context("no response code")
}

/// Drain the spool for `identifier`, attempting each record with `attempt`
/// and passing failed transfers to `decoder`.
pub fn drain_with<A, D>(
    runtime: &SpoolRuntime,
    identifier: &str,
    decoder: &mut D,
    mut attempt: A,
) -> Result<DrainSummary>
where
    A: FnMut(&Url) -> TransferOutcome,
    D: HostSignalDecoder + ?Sized,
{
    let records = runtime
        .take_outstanding(identifier)
        .with_context(|| format!("take spooled transfers for {identifier}"))?;

    let mut summary = DrainSummary {
        taken: records.len(),
        ..DrainSummary::default()
    };

    for TransferRecord { url, queued_at } in records {
        let Ok(parsed) = Url::parse(&url) else {
            tracing::warn!(url = %url, "spooled transfer has an unparseable URL");
            summary.invalid += 1;
            continue;
        };
        match attempt(&parsed) {
            TransferOutcome::Failed { reason } => {
                tracing::debug!(url = %parsed, queued_at, reason = %reason, "transfer failed; redelivering");
                summary.failed += 1;
                decoder.on_failed_transfer(&parsed);
            }
            TransferOutcome::Completed { status } => {
                tracing::debug!(url = %parsed, status, "transfer completed; nothing to redeliver");
                summary.completed += 1;
            }
        }
    }

    tracing::info!(
        identifier,
        taken = summary.taken,
        failed = summary.failed,
        completed = summary.completed,
        "spool drained"
    );
    Ok(summary)
}

/// [`drain_with`] using real transfers via [`attempt_transfer`].
pub fn drain<D>(
    runtime: &SpoolRuntime,
    identifier: &str,
    decoder: &mut D,
    cfg: &DeliveryConfig,
) -> Result<DrainSummary>
where
    D: HostSignalDecoder + ?Sized,
{
    drain_with(runtime, identifier, decoder, |url| attempt_transfer(url, cfg))
}
