//! Browser-state snapshot captured after a scenario attempt.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Merged view of browser state assembled from several endpoint commands.
///
/// `tabs` is the only required sub-query; the other fields degrade to empty
/// defaults when their command fails, so one broken sub-query never aborts
/// the whole capture.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StateSnapshot {
    /// Open browser contexts as reported by `list_tabs`.
    pub tabs: Vec<Value>,
    /// Metadata of the active tab (`get_page_info`), empty object on failure.
    pub active_page_info: Value,
    /// Element listing of the active tab (`get_dom`).
    pub dom_elements: Vec<Value>,
    /// Visible text content of the active tab (`get_page_text`).
    pub page_text: String,
}

impl StateSnapshot {
    /// Active tab URL, if the endpoint reported one.
    pub fn active_url(&self) -> Option<&str> {
        self.active_page_info.get("url").and_then(Value::as_str)
    }

    /// Active tab title, if the endpoint reported one.
    pub fn active_title(&self) -> Option<&str> {
        self.active_page_info.get("title").and_then(Value::as_str)
    }

    /// Case-insensitive search over the captured page text.
    pub fn page_text_contains(&self, needle: &str) -> bool {
        self.page_text.to_lowercase().contains(&needle.to_lowercase())
    }
}
