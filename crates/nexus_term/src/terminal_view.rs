//! Line-oriented view: stdin is the input control, stdout the transcript.
//!
//! A terminal scrolls on its own, so "scroll to end" is simply writing the next line.

use std::io::Write;

use nexus_chat::render::{self, plain_text, MetricsList};
use nexus_chat::transcript::Message;
use nexus_chat::view::ChatView;
use serde_json::Value;
use tracing::warn;

pub struct TerminalView<W: Write> {
    out: W,
    input: String,
    details_visible: bool,
}

impl<W: Write> TerminalView<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            input: String::new(),
            details_visible: false,
        }
    }

    /// Load a line the user just committed into the input control.
    pub fn set_input(&mut self, line: impl Into<String>) {
        self.input = line.into();
    }

    pub fn details_visible(&self) -> bool {
        self.details_visible
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn emit(&mut self, line: &str) {
        let res = writeln!(self.out, "{}", plain_text(line)).and_then(|_| self.out.flush());
        if let Err(e) = res {
            warn!("Failed to write to terminal: {}", e);
        }
    }
}

impl<W: Write> ChatView for TerminalView<W> {
    fn input_value(&self) -> String {
        self.input.clone()
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn append_entry(&mut self, message: &Message) {
        self.emit(&message.display_line());
    }

    fn reveal_details(&mut self) {
        self.details_visible = true;
        self.emit("── Execution Details ──");
    }

    fn set_graph_placeholder(&mut self, placeholder: &str) {
        self.emit(&format!("  {placeholder}"));
    }

    fn set_metrics(&mut self, metrics: &MetricsList) {
        self.emit(&format!("  {}", metrics.title));
        for item in &metrics.items {
            self.emit(&format!("    - {item}"));
        }
    }

    fn show_learning_feedback(&mut self, feedback: &Value) {
        let lines = render::learning_feedback_lines(feedback);
        if lines.is_empty() {
            return;
        }
        self.emit("  Learning feedback:");
        for line in lines {
            self.emit(&format!("    {line}"));
        }
    }

    fn show_note(&mut self, note: &str) {
        self.emit(&format!("  (note: {note})"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexus_chat::prelude::*;
    use serde_json::json;

    fn printed(view: TerminalView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn entries_are_printed_with_sender() {
        let mut view = TerminalView::new(Vec::new());
        view.append_entry(&Message::new(Sender::User, "hello"));
        view.append_entry(&Message::new(Sender::Assistant, "hi there"));
        assert_eq!(printed(view), "user: hello\nassistant: hi there\n");
    }

    #[test]
    fn server_text_cannot_emit_escape_sequences() {
        let mut view = TerminalView::new(Vec::new());
        view.append_entry(&Message::new(Sender::Assistant, "\u{1b}[2Jgotcha"));
        let out = printed(view);
        assert!(!out.contains('\u{1b}'));
        assert!(out.contains("gotcha"));
    }

    #[test]
    fn client_paints_summary_block() {
        let mut client = ChatClient::with_session(
            SessionId::from_raw("session_term00001"),
            NullTransport,
            TerminalView::new(Vec::new()),
            StaticContext::default(),
        );
        client.on_open();
        client
            .on_inbound_frame(
                &json!({
                    "human_response": "ok",
                    "execution_summary": {
                        "ueir_graph_id": "g1",
                        "metrics": {"energy_joules": 1.5, "cost_dollars": 0.02, "performance_score": 0.9},
                        "constraints_satisfied": true
                    },
                    "learning_feedback": {"hint": "batch smaller"}
                })
                .to_string(),
            )
            .unwrap();
        assert!(client.view().details_visible());

        let view = std::mem::replace(client.view_mut(), TerminalView::new(Vec::new()));
        let out = printed(view);
        for needle in [
            "assistant: ok",
            "UEIR graph g1",
            "Energy Used: 1.5 J",
            "Cost: $0.02",
            "Performance Score: 0.9",
            "Constraints Satisfied: Yes",
            "hint: batch smaller",
        ] {
            assert!(out.contains(needle), "missing {needle:?} in:\n{out}");
        }
    }

    #[test]
    fn submit_reads_and_clears_input() {
        let mut client = ChatClient::with_session(
            SessionId::from_raw("session_term00002"),
            NullTransport,
            TerminalView::new(Vec::new()),
            StaticContext::default(),
        );
        client.on_open();
        client.view_mut().set_input("  run the benchmark  ");
        assert_eq!(client.submit().unwrap(), Submission::Sent);
        assert!(client.view().input_value().is_empty());
        assert_eq!(
            client.transcript().last().unwrap().text,
            "run the benchmark"
        );
    }

    struct NullTransport;

    impl Transport for NullTransport {
        fn send_text(&mut self, _frame: &str) -> Result<(), TransportError> {
            Ok(())
        }
    }
}
