//! CLI for the wlrelay whitelist signaling protocol.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use wlrelay_core::config;

use commands::{run_canonicalize, run_decode, run_drain, run_encode, run_identifier, run_invoke};

/// Top-level CLI for wlrelay.
#[derive(Debug, Parser)]
#[command(name = "wlrelay")]
#[command(about = "wlrelay: hand whitelist requests from an extension to its host app", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Print the whitelist key for a page URI or host.
    Canonicalize {
        /// Page URI or bare host.
        uri: String,
    },

    /// Print the sentinel URI carrying a hostname.
    Encode {
        /// Hostname (canonicalized before encoding).
        hostname: String,
        /// Unix seconds to embed instead of the current time.
        #[arg(long, value_name = "SECS")]
        timestamp: Option<u64>,
    },

    /// Decode a failed transfer URI the way the host application does.
    Decode {
        /// Transfer URI.
        uri: String,
    },

    /// Print the background session identifier both sides derive.
    Identifier,

    /// Run one extension invocation for a preprocessed page payload.
    Invoke {
        /// JSON file holding the page preprocessing payload.
        #[arg(long, value_name = "FILE")]
        payload: PathBuf,
        /// Cancel at the prompt instead of confirming.
        #[arg(long)]
        cancel: bool,
        /// Record the hand-off in memory instead of spooling it.
        #[arg(long)]
        dry_run: bool,
    },

    /// Host side: perform spooled transfers and decode the failed ones.
    Drain,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match cli.command {
            CliCommand::Canonicalize { uri } => run_canonicalize(&uri),
            CliCommand::Encode {
                hostname,
                timestamp,
            } => run_encode(&hostname, timestamp)?,
            CliCommand::Decode { uri } => run_decode(&uri)?,
            CliCommand::Identifier => {
                let cfg = config::load_or_init()?;
                run_identifier(&cfg);
            }
            CliCommand::Invoke {
                payload,
                cancel,
                dry_run,
            } => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_invoke(&cfg, &payload, cancel, dry_run).await?;
            }
            CliCommand::Drain => {
                let cfg = config::load_or_init()?;
                tracing::debug!("loaded config: {:?}", cfg);
                run_drain(&cfg).await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
