//! `wlrelay invoke --payload <file>` – run one extension invocation.

use anyhow::Result;
use serde_json::Value;
use std::path::Path;
use wlrelay_core::config::WlrelayConfig;
use wlrelay_core::extension::{
    ExtensionInvocationContext, ExtensionLifecycleController, ExtensionShell, InputItem,
    PayloadProvider, Termination, UserDecision,
};
use wlrelay_core::session::{RecordingRuntime, TransferRuntime, TransferSessionBridge};
use wlrelay_core::spool::SpoolRuntime;

/// Shell for a terminal session: reports the completion call.
struct ConsoleShell;

impl ExtensionShell for ConsoleShell {
    fn complete_request(&mut self, returned_items: Vec<InputItem>) {
        tracing::info!(returned_items = returned_items.len(), "extension request completed");
        println!("request completed ({} items)", returned_items.len());
    }
}

/// Payload files that cannot be read or parsed become a failed load, like
/// any other attachment error.
pub(crate) fn provider_for(path: &Path) -> PayloadProvider {
    let parsed = std::fs::read(path)
        .map_err(|e| e.to_string())
        .and_then(|data| serde_json::from_slice::<Value>(&data).map_err(|e| e.to_string()));
    match parsed {
        Ok(value) => PayloadProvider::property_list(value),
        Err(reason) => {
            tracing::warn!(path = %path.display(), reason = %reason, "payload file unusable");
            PayloadProvider::failing(reason)
        }
    }
}

async fn invoke_with<R: TransferRuntime>(
    cfg: &WlrelayConfig,
    runtime: R,
    payload: &Path,
    decision: UserDecision,
) -> Termination {
    let bridge = TransferSessionBridge::new(runtime, cfg.identifier_scheme(), &cfg.extension_name);
    let context = ExtensionInvocationContext::new(vec![InputItem::with_attachment(provider_for(
        payload,
    ))]);
    let mut controller = ExtensionLifecycleController::new(context, bridge, ConsoleShell);

    match controller.wait_for_prompt().await {
        Ok(prompt) => {
            println!(
                "address: {}",
                prompt.address.as_deref().unwrap_or("(unknown)")
            );
            if let Some(title) = &prompt.description {
                println!("title: {title}");
            }
        }
        Err(termination) => return termination,
    }

    controller.decisions().send(decision);
    controller.run().await
}

pub async fn run_invoke(
    cfg: &WlrelayConfig,
    payload: &Path,
    cancel: bool,
    dry_run: bool,
) -> Result<()> {
    let decision = if cancel {
        UserDecision::Cancel
    } else {
        UserDecision::Confirm
    };

    let termination = if dry_run {
        let runtime = RecordingRuntime::new();
        let journal = runtime.journal().clone();
        let termination = invoke_with(cfg, runtime, payload, decision).await;
        for entry in journal.entries() {
            println!("{entry:?}");
        }
        termination
    } else {
        let runtime = SpoolRuntime::new(cfg.spool_dir()?);
        invoke_with(cfg, runtime, payload, decision).await
    };

    println!("outcome: {:?}", termination.outcome());
    termination.exit()
}
