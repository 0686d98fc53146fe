//! Page contract shared by the wasm client and host-side tests.
//!
//! Keeping these out of the wasm-only `web` module lets us unit-test them on
//! the host.

use nexus_chat::context::ContextPreferences;
use thiserror::Error;

/// Element ids the page must provide.
pub mod ids {
    pub const MESSAGE_INPUT: &str = "message-input";
    pub const CHAT_HISTORY: &str = "chat-history";
    pub const EXECUTION_DETAILS: &str = "execution-details";
    pub const GRAPH_VIEWER: &str = "ueir-graph-viewer";
    pub const METRICS_DISPLAY: &str = "metrics-display";
    /// Optional; feedback goes to the console when absent.
    pub const LEARNING_FEEDBACK: &str = "learning-feedback";

    pub fn required() -> &'static [&'static str] {
        &[
            MESSAGE_INPUT,
            CHAT_HISTORY,
            EXECUTION_DETAILS,
            GRAPH_VIEWER,
            METRICS_DISPLAY,
        ]
    }
}

/// localStorage key holding the JSON execution preferences.
pub const CONTEXT_STORAGE_KEY: &str = "nexus.context.v1";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum WebError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("missing DOM element #{0}")]
    MissingElement(&'static str),
    #[error("DOM element #{0} has the wrong type")]
    WrongElementType(&'static str),
    #[error("javascript error: {0}")]
    Js(String),
}

/// CSS class of a transcript entry, e.g. `message user`.
pub fn entry_class(sender: &str) -> String {
    format!("message {sender}")
}

/// Parse stored preferences; anything missing or unreadable falls back to defaults.
pub fn parse_context_preferences(raw: Option<&str>) -> ContextPreferences {
    raw.and_then(|s| serde_json::from_str(s).ok())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn required_ids_are_unique() {
        let req = ids::required();
        for (i, a) in req.iter().enumerate() {
            assert!(!req[i + 1..].contains(a), "duplicate id {a}");
        }
        assert!(!req.contains(&ids::LEARNING_FEEDBACK));
    }

    #[test]
    fn stored_preferences_parse_or_default() {
        let prefs = parse_context_preferences(Some(r#"{"hardware_preferences":{"prefer":"cpu"}}"#));
        assert_eq!(prefs.hardware_preferences["prefer"], "cpu");
        assert_eq!(prefs.cost_limits, json!({}));

        assert_eq!(parse_context_preferences(None), ContextPreferences::default());
        assert_eq!(
            parse_context_preferences(Some("not json")),
            ContextPreferences::default()
        );
    }

    #[test]
    fn entry_class_tags_sender() {
        assert_eq!(entry_class("assistant"), "message assistant");
    }
}
