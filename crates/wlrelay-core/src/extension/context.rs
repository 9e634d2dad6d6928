//! Per-invocation state.

use std::fmt;
use std::sync::Arc;

use super::ItemProvider;

/// One input item handed to the extension, with its attachments in order.
#[derive(Clone, Default)]
pub struct InputItem {
    pub attachments: Vec<Arc<dyn ItemProvider>>,
}

impl InputItem {
    pub fn new(attachments: Vec<Arc<dyn ItemProvider>>) -> Self {
        Self { attachments }
    }

    pub fn with_attachment(provider: impl ItemProvider + 'static) -> Self {
        Self {
            attachments: vec![Arc::new(provider)],
        }
    }
}

impl fmt::Debug for InputItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputItem")
            .field("attachments", &self.attachments.len())
            .finish()
    }
}

/// Values surfaced to the prompt. Rendering them is the UI's business.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptFields {
    /// Canonical hostname shown as the address.
    pub address: Option<String>,
    /// Page title shown as the description.
    pub description: Option<String>,
}

/// Everything one invocation knows. Exactly one exists per process and it
/// is owned by the lifecycle controller.
#[derive(Debug, Default)]
pub struct ExtensionInvocationContext {
    input_items: Vec<InputItem>,
    website: Option<String>,
    prompt: PromptFields,
}

impl ExtensionInvocationContext {
    pub fn new(input_items: Vec<InputItem>) -> Self {
        Self {
            input_items,
            website: None,
            prompt: PromptFields::default(),
        }
    }

    /// Raw `baseURI` of the page, once loaded.
    pub fn website(&self) -> Option<&str> {
        self.website.as_deref()
    }

    pub fn prompt(&self) -> &PromptFields {
        &self.prompt
    }

    pub(super) fn set_page(&mut self, website: String, prompt: PromptFields) {
        self.website = Some(website);
        self.prompt = prompt;
    }

    /// First attachment, across all items in order, conforming to
    /// `type_identifier`. Later matches are ignored.
    pub fn first_conforming_provider(&self, type_identifier: &str) -> Option<Arc<dyn ItemProvider>> {
        self.input_items
            .iter()
            .flat_map(|item| item.attachments.iter())
            .find(|p| p.has_item_conforming_to(type_identifier))
            .cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extension::{PayloadProvider, PROPERTY_LIST_TYPE};
    use serde_json::json;

    #[test]
    fn first_conforming_provider_skips_other_types_and_empty_items() {
        let ctx = ExtensionInvocationContext::new(vec![
            InputItem::default(),
            InputItem::with_attachment(PayloadProvider::of_type("public.url", json!(1))),
            InputItem::new(vec![
                Arc::new(PayloadProvider::property_list(json!("first"))),
                Arc::new(PayloadProvider::property_list(json!("second"))),
            ]),
        ]);
        let provider = ctx.first_conforming_provider(PROPERTY_LIST_TYPE).unwrap();
        let (tx, rx) = std::sync::mpsc::channel();
        provider.load_item(PROPERTY_LIST_TYPE, Box::new(move |r| tx.send(r).unwrap()));
        assert_eq!(rx.recv().unwrap(), Ok(json!("first")));
    }

    #[test]
    fn no_items_no_provider() {
        let ctx = ExtensionInvocationContext::new(Vec::new());
        assert!(ctx.first_conforming_provider(PROPERTY_LIST_TYPE).is_none());
        assert!(ctx.website().is_none());
    }
}
