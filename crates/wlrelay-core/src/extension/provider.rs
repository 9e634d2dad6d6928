//! Attachment item providers.
//!
//! A provider completes its load on whatever thread it likes; callers must
//! marshal the result back to their own sequencing context.

use serde_json::Value;
use thiserror::Error;

/// Type identifier of property-list payloads produced by page preprocessing.
pub const PROPERTY_LIST_TYPE: &str = "com.apple.property-list";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttachmentError {
    #[error("no attachment conforms to {0}")]
    NoConformingItem(String),
    #[error("attachment load failed: {0}")]
    Load(String),
}

/// Completion callback of [`ItemProvider::load_item`]; called exactly once.
pub type LoadCompletion = Box<dyn FnOnce(Result<Value, AttachmentError>) + Send + 'static>;

pub trait ItemProvider: Send + Sync {
    fn has_item_conforming_to(&self, type_identifier: &str) -> bool;

    fn load_item(&self, type_identifier: &str, completion: LoadCompletion);
}

/// Provider holding one payload in memory; completes on a worker thread.
#[derive(Debug, Clone)]
pub struct PayloadProvider {
    type_identifier: String,
    payload: Result<Value, AttachmentError>,
}

impl PayloadProvider {
    /// A property-list attachment that loads `payload`.
    pub fn property_list(payload: Value) -> Self {
        Self {
            type_identifier: PROPERTY_LIST_TYPE.to_string(),
            payload: Ok(payload),
        }
    }

    /// A property-list attachment whose load fails with `reason`.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            type_identifier: PROPERTY_LIST_TYPE.to_string(),
            payload: Err(AttachmentError::Load(reason.into())),
        }
    }

    /// An attachment of some other type.
    pub fn of_type(type_identifier: impl Into<String>, payload: Value) -> Self {
        Self {
            type_identifier: type_identifier.into(),
            payload: Ok(payload),
        }
    }
}

impl ItemProvider for PayloadProvider {
    fn has_item_conforming_to(&self, type_identifier: &str) -> bool {
        self.type_identifier == type_identifier
    }

    fn load_item(&self, type_identifier: &str, completion: LoadCompletion) {
        let result = if self.has_item_conforming_to(type_identifier) {
            self.payload.clone()
        } else {
            Err(AttachmentError::NoConformingItem(type_identifier.to_string()))
        };
        std::thread::spawn(move || completion(result));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn loads_on_another_thread() {
        let provider = PayloadProvider::property_list(Value::from("x"));
        let caller = std::thread::current().id();
        let (tx, rx) = mpsc::channel();
        provider.load_item(
            PROPERTY_LIST_TYPE,
            Box::new(move |r| {
                tx.send((r, std::thread::current().id())).unwrap();
            }),
        );
        let (result, thread) = rx.recv().unwrap();
        assert_eq!(result, Ok(Value::from("x")));
        assert_ne!(thread, caller);
    }

    #[test]
    fn wrong_type_completes_with_error() {
        let provider = PayloadProvider::of_type("public.url", Value::Null);
        assert!(!provider.has_item_conforming_to(PROPERTY_LIST_TYPE));
        let (tx, rx) = mpsc::channel();
        provider.load_item(PROPERTY_LIST_TYPE, Box::new(move |r| tx.send(r).unwrap()));
        assert!(matches!(
            rx.recv().unwrap(),
            Err(AttachmentError::NoConformingItem(_))
        ));
    }
}
