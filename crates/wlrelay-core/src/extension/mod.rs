//! Extension side of the protocol: one process, one interaction, one exit.

mod context;
mod lifecycle;
mod payload;
mod provider;
mod shell;

pub use context::{ExtensionInvocationContext, InputItem, PromptFields};
pub use lifecycle::{
    DecisionSender, ExtensionLifecycleController, LifecycleEvent, LifecycleState, Outcome,
    Termination, UserDecision,
};
pub use payload::{decode_payload, PagePayload, PayloadError, PREPROCESSING_RESULTS_KEY};
pub use provider::{
    AttachmentError, ItemProvider, LoadCompletion, PayloadProvider, PROPERTY_LIST_TYPE,
};
pub use shell::{ExtensionShell, RecordingShell};
