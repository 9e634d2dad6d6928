//! Lifecycle of one extension invocation.
//!
//! `Idle -> AwaitingAttachment -> PromptVisible -> {Cancelled | Confirmed} -> Exited`
//!
//! Attachment completions arrive on provider threads and user decisions on
//! the UI; both are posted to one channel and handled in order on the task
//! that owns the controller, so no field is ever written concurrently.

use serde_json::Value;
use tokio::sync::mpsc;

use super::{
    decode_payload, AttachmentError, ExtensionInvocationContext, ExtensionShell, PromptFields,
    PROPERTY_LIST_TYPE,
};
use crate::hostname::canonicalize;
use crate::session::{HandOff, TransferRuntime, TransferSessionBridge};
use crate::signal::{encode, EncodedSignal, WhitelistSignal};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    AwaitingAttachment,
    PromptVisible,
    Cancelled,
    Confirmed,
    Exited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserDecision {
    Cancel,
    Confirm,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LifecycleEvent {
    AttachmentLoaded(Result<Value, AttachmentError>),
    Decision(UserDecision),
}

/// How the invocation ended. Every outcome looks the same from outside
/// except `HandedOff(HandOff::Dispatched { .. })`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// User cancelled.
    Cancelled,
    /// User confirmed without a known website.
    NoWebsite,
    /// User confirmed with a website; the bridge ran.
    HandedOff(HandOff),
}

/// Terminal state. The request is completed and the hand-off, if any, is
/// done; all that is left is leaving the process.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a Termination should end the process via exit()"]
pub struct Termination {
    outcome: Outcome,
}

impl Termination {
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    /// End the process with code 0.
    pub fn exit(self) -> ! {
        tracing::debug!(outcome = ?self.outcome, "exiting");
        std::process::exit(0)
    }
}

/// Posts user decisions onto the controller's sequencing context.
#[derive(Debug, Clone)]
pub struct DecisionSender {
    tx: mpsc::UnboundedSender<LifecycleEvent>,
}

impl DecisionSender {
    /// Post `decision`. Ignored once the controller is gone.
    pub fn send(&self, decision: UserDecision) {
        let _ = self.tx.send(LifecycleEvent::Decision(decision));
    }

    pub fn confirm(&self) {
        self.send(UserDecision::Confirm);
    }

    pub fn cancel(&self) {
        self.send(UserDecision::Cancel);
    }
}

pub struct ExtensionLifecycleController<R, S> {
    state: LifecycleState,
    context: ExtensionInvocationContext,
    bridge: TransferSessionBridge<R>,
    shell: S,
    events_tx: mpsc::UnboundedSender<LifecycleEvent>,
    events_rx: mpsc::UnboundedReceiver<LifecycleEvent>,
}

impl<R: TransferRuntime, S: ExtensionShell> ExtensionLifecycleController<R, S> {
    pub fn new(context: ExtensionInvocationContext, bridge: TransferSessionBridge<R>, shell: S) -> Self {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        Self {
            state: LifecycleState::Idle,
            context,
            bridge,
            shell,
            events_tx,
            events_rx,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn context(&self) -> &ExtensionInvocationContext {
        &self.context
    }

    pub fn decisions(&self) -> DecisionSender {
        DecisionSender {
            tx: self.events_tx.clone(),
        }
    }

    /// Request the first property-list attachment. Its completion is posted
    /// back as [`LifecycleEvent::AttachmentLoaded`]. No-op unless idle.
    pub fn launch(&mut self) {
        if self.state != LifecycleState::Idle {
            return;
        }
        self.transition(LifecycleState::AwaitingAttachment);

        let tx = self.events_tx.clone();
        match self.context.first_conforming_provider(PROPERTY_LIST_TYPE) {
            Some(provider) => provider.load_item(
                PROPERTY_LIST_TYPE,
                Box::new(move |result| {
                    let _ = tx.send(LifecycleEvent::AttachmentLoaded(result));
                }),
            ),
            None => {
                let _ = tx.send(LifecycleEvent::AttachmentLoaded(Err(
                    AttachmentError::NoConformingItem(PROPERTY_LIST_TYPE.to_string()),
                )));
            }
        }
    }

    /// Handle queued events until the prompt is visible.
    ///
    /// Returns the termination instead if a decision ended the invocation
    /// before the attachment arrived.
    pub async fn wait_for_prompt(&mut self) -> Result<&PromptFields, Termination> {
        self.launch();
        while matches!(
            self.state,
            LifecycleState::Idle | LifecycleState::AwaitingAttachment
        ) {
            if let Some(termination) = self.step().await {
                return Err(termination);
            }
        }
        Ok(self.context.prompt())
    }

    /// Launch and handle events until the invocation terminates.
    pub async fn run(mut self) -> Termination {
        self.launch();
        loop {
            if let Some(termination) = self.step().await {
                return termination;
            }
        }
    }

    /// Apply a decision made on the controller's own task.
    pub fn decide(&mut self, decision: UserDecision) -> Option<Termination> {
        self.handle(LifecycleEvent::Decision(decision))
    }

    async fn step(&mut self) -> Option<Termination> {
        // The controller holds a sender, so the channel never closes.
        let event = self.events_rx.recv().await?;
        self.handle(event)
    }

    /// Apply one event. Returns the termination when it ends the invocation.
    pub fn handle(&mut self, event: LifecycleEvent) -> Option<Termination> {
        match (self.state, event) {
            (LifecycleState::AwaitingAttachment, LifecycleEvent::AttachmentLoaded(result)) => {
                self.apply_attachment(result);
                self.transition(LifecycleState::PromptVisible);
                None
            }
            (state, LifecycleEvent::AttachmentLoaded(_)) => {
                tracing::debug!(?state, "ignoring attachment completion");
                None
            }
            (
                LifecycleState::Cancelled | LifecycleState::Confirmed | LifecycleState::Exited,
                LifecycleEvent::Decision(decision),
            ) => {
                tracing::debug!(?decision, "ignoring decision after termination");
                None
            }
            (_, LifecycleEvent::Decision(UserDecision::Cancel)) => {
                Some(self.complete_without_signal(Outcome::Cancelled))
            }
            (_, LifecycleEvent::Decision(UserDecision::Confirm)) => Some(self.confirm()),
        }
    }

    fn apply_attachment(&mut self, result: Result<Value, AttachmentError>) {
        let value = match result {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(error = %e, "attachment unavailable; no website known");
                return;
            }
        };
        match decode_payload(&value) {
            Ok(page) => {
                let address = canonicalize(&page.base_uri).map(|h| h.into_string());
                tracing::debug!(base_uri = %page.base_uri, ?address, "page payload loaded");
                self.context.set_page(
                    page.base_uri,
                    PromptFields {
                        address,
                        description: page.title,
                    },
                );
            }
            Err(e) => tracing::warn!(error = %e, "malformed page payload; no website known"),
        }
    }

    fn confirm(&mut self) -> Termination {
        let Some(website) = self.context.website().map(str::to_string) else {
            return self.complete_without_signal(Outcome::NoWebsite);
        };
        self.transition(LifecycleState::Confirmed);

        let signal = build_signal(&website);
        self.shell.complete_request(Vec::new());
        let hand_off = self.bridge.hand_off(signal.as_ref());
        self.transition(LifecycleState::Exited);

        Termination {
            outcome: Outcome::HandedOff(hand_off),
        }
    }

    fn complete_without_signal(&mut self, outcome: Outcome) -> Termination {
        self.transition(LifecycleState::Cancelled);
        self.shell.complete_request(Vec::new());
        self.transition(LifecycleState::Exited);
        Termination { outcome }
    }

    fn transition(&mut self, next: LifecycleState) {
        tracing::debug!(from = ?self.state, to = ?next, "lifecycle transition");
        self.state = next;
    }
}

fn build_signal(website: &str) -> Option<EncodedSignal> {
    let Some(hostname) = canonicalize(website) else {
        tracing::warn!(website, "website has no usable hostname; no signal");
        return None;
    };
    match encode(&WhitelistSignal::now(hostname)) {
        Ok(encoded) => Some(encoded),
        Err(e) => {
            tracing::warn!(error = %e, "signal encoding failed; no signal");
            None
        }
    }
}
