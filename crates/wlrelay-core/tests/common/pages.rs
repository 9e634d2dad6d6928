//! Input items shaped like the ones Safari hands to an action extension.

use serde_json::json;
use wlrelay_core::extension::{InputItem, PayloadProvider, PREPROCESSING_RESULTS_KEY};

/// One item with a property-list attachment for a page at `base_uri`.
pub fn page_item(base_uri: &str, title: &str) -> InputItem {
    InputItem::with_attachment(PayloadProvider::property_list(json!({
        PREPROCESSING_RESULTS_KEY: { "baseURI": base_uri, "title": title }
    })))
}
