//! The irreversible hand-off of one encoded signal.

use super::{SessionIdentifierScheme, TransferRuntime, TransferSessionHandle, TransportError};
use crate::signal::EncodedSignal;

/// What the bridge did with a signal. Every variant is final: there is no
/// retry and no delivery confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandOff {
    /// No signal; no session was created.
    NoPayload,
    /// Task resumed and session finished under `identifier`.
    Dispatched { identifier: String },
    /// Session or task creation failed; the signal may never arrive.
    TransportFailed { identifier: String, reason: String },
}

/// Dispatches signals through background sessions named by the shared
/// identifier convention.
pub struct TransferSessionBridge<R> {
    runtime: R,
    identifiers: SessionIdentifierScheme,
    extension_name: String,
}

impl<R: TransferRuntime> TransferSessionBridge<R> {
    pub fn new(
        runtime: R,
        identifiers: SessionIdentifierScheme,
        extension_name: impl Into<String>,
    ) -> Self {
        Self {
            runtime,
            identifiers,
            extension_name: extension_name.into(),
        }
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    pub fn session_identifier(&self) -> String {
        self.identifiers.derive(&self.extension_name)
    }

    /// Open the session, start the one task, finish the session.
    ///
    /// Without a signal nothing is touched. Transport failures are logged
    /// and reported, never retried.
    pub fn hand_off(&self, signal: Option<&EncodedSignal>) -> HandOff {
        let Some(encoded) = signal else {
            tracing::debug!("no signal to hand off");
            return HandOff::NoPayload;
        };

        let identifier = self.session_identifier();
        match self.dispatch(&identifier, encoded) {
            Ok(identifier) => {
                tracing::info!(
                    identifier = %identifier,
                    hostname = %encoded.signal.hostname(),
                    "whitelist signal handed off"
                );
                HandOff::Dispatched { identifier }
            }
            Err(err) => {
                tracing::warn!(identifier = %identifier, error = %err, "whitelist signal dropped");
                HandOff::TransportFailed {
                    identifier,
                    reason: err.to_string(),
                }
            }
        }
    }

    fn dispatch(&self, identifier: &str, encoded: &EncodedSignal) -> Result<String, TransportError> {
        let mut handle = TransferSessionHandle::open(&self.runtime, identifier)?;
        handle.start_task(&encoded.url)?;
        handle.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hostname::canonicalize;
    use crate::session::{JournalEntry, RecordingRuntime};
    use crate::signal::{encode, WhitelistSignal};

    fn bridge(runtime: RecordingRuntime) -> TransferSessionBridge<RecordingRuntime> {
        TransferSessionBridge::new(runtime, SessionIdentifierScheme::new("org.example.Session"), "ext")
    }

    fn encoded(host: &str) -> EncodedSignal {
        encode(&WhitelistSignal::new(canonicalize(host).unwrap(), 99)).unwrap()
    }

    #[test]
    fn no_signal_creates_no_session() {
        let bridge = bridge(RecordingRuntime::new());
        assert_eq!(bridge.hand_off(None), HandOff::NoPayload);
        assert!(bridge.runtime().journal().is_empty());
    }

    #[test]
    fn dispatch_order_is_open_create_resume_finish() {
        let bridge = bridge(RecordingRuntime::new());
        let signal = encoded("www.adblock-test.org");
        assert_eq!(
            bridge.hand_off(Some(&signal)),
            HandOff::Dispatched {
                identifier: "org.example.Session.ext".to_string()
            }
        );

        let kinds: Vec<&str> = bridge
            .runtime()
            .journal()
            .entries()
            .iter()
            .map(|e| match e {
                JournalEntry::SessionOpened { .. } => "open",
                JournalEntry::TaskCreated { .. } => "create",
                JournalEntry::TaskResumed { .. } => "resume",
                JournalEntry::SessionFinished { .. } => "finish",
                JournalEntry::RequestCompleted { .. } => "complete",
            })
            .collect();
        assert_eq!(kinds, ["open", "create", "resume", "finish"]);
        assert!(bridge.runtime().live_identifiers().is_empty());
    }

    #[test]
    fn same_identifier_on_every_invocation() {
        let bridge = bridge(RecordingRuntime::new());
        let first = bridge.hand_off(Some(&encoded("a.com")));
        let second = bridge.hand_off(Some(&encoded("b.com")));
        assert_eq!(first, second);
    }

    #[test]
    fn transport_failures_are_reported_not_retried() {
        let bridge = bridge(RecordingRuntime::new().failing_tasks());
        let outcome = bridge.hand_off(Some(&encoded("example.com")));
        assert!(matches!(outcome, HandOff::TransportFailed { .. }));

        let entries = bridge.runtime().journal().entries();
        assert_eq!(entries.len(), 1, "only the session open is recorded: {entries:?}");
        assert!(bridge.runtime().live_identifiers().is_empty());
    }
}
