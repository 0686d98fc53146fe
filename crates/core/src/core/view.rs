use serde_json::Value;

use crate::render::MetricsList;
use crate::transcript::Message;

/// The surface the client paints onto.
///
/// A DOM page, a terminal, or a test recorder. The client assumes every
/// target exists for its whole lifetime.
pub trait ChatView {
    /// Current contents of the text-entry control.
    fn input_value(&self) -> String;

    fn clear_input(&mut self);

    /// Append one transcript entry and scroll the transcript to its end.
    /// Implementations must insert the text as plain content, never as markup.
    fn append_entry(&mut self, message: &Message);

    /// Make the execution details panel visible.
    fn reveal_details(&mut self);

    fn set_graph_placeholder(&mut self, placeholder: &str);

    fn set_metrics(&mut self, metrics: &MetricsList);

    fn show_learning_feedback(&mut self, _feedback: &Value) {}

    fn show_note(&mut self, _note: &str) {}
}
