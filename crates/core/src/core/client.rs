//! The Chat Client: one connection, one session, one transcript.
//!
//! All entry points run on the host's single event thread. The host forwards
//! the socket's open, close and text-frame notifications to [`ChatClient::on_open`],
//! [`ChatClient::on_close`] and [`ChatClient::on_inbound_frame`], and calls
//! [`ChatClient::submit`] when the user commits the input.
//!
//! There is no request/response correlation: every inbound frame is rendered
//! in arrival order, independently of what was sent.

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::context::ContextProvider;
use crate::protocol::{InboundResponse, OutboundRequest};
use crate::render::{self, MetricsList};
use crate::session::{Endpoint, SessionId};
use crate::transcript::{Message, Sender, Transcript};
use crate::transport::{ConnectionState, Connector, Transport, TransportError};
use crate::view::ChatView;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Sending while the socket is still connecting or already closed.
    #[error("connection is not open (state: {0})")]
    NotOpen(ConnectionState),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("failed to encode request: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("malformed inbound frame: {0}")]
    MalformedFrame(#[source] serde_json::Error),
}

/// What [`ChatClient::submit`] did with the current input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// Input was empty after trimming; nothing changed.
    Empty,
    Sent,
}

pub struct ChatClient<V, T, P> {
    session: SessionId,
    state: ConnectionState,
    transport: T,
    view: V,
    context: P,
    transcript: Transcript,
}

impl<V, T, P> ChatClient<V, T, P>
where
    V: ChatView,
    T: Transport,
    P: ContextProvider,
{
    /// Generate a session id and start connecting to `endpoint`.
    pub fn connect<C>(
        connector: &mut C,
        endpoint: &Endpoint,
        view: V,
        context: P,
    ) -> Result<Self, ClientError>
    where
        C: Connector<Transport = T>,
    {
        let session = SessionId::generate();
        let url = endpoint.url_for(&session);
        debug!(%url, "Connecting to executor");
        let transport = connector.connect(&url)?;
        Ok(Self::with_session(session, transport, view, context))
    }

    /// Build a client around an already started connection.
    pub fn with_session(session: SessionId, transport: T, view: V, context: P) -> Self {
        Self {
            session,
            state: ConnectionState::Connecting,
            transport,
            view,
            context,
            transcript: Transcript::new(),
        }
    }

    pub fn session(&self) -> &SessionId {
        &self.session
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn context_mut(&mut self) -> &mut P {
        &mut self.context
    }

    /// The transport acknowledged the connection.
    pub fn on_open(&mut self) {
        match self.state {
            ConnectionState::Connecting => {
                self.state = ConnectionState::Open;
                info!(session = %self.session, "Connected to Nexus Executor");
            }
            other => debug!(state = %other, "Ignoring open notification"),
        }
    }

    /// The transport closed or errored. There is no way back to `Open`.
    pub fn on_close(&mut self, reason: Option<&str>) {
        if self.state == ConnectionState::Closed {
            return;
        }
        self.state = ConnectionState::Closed;
        warn!(
            session = %self.session,
            reason = reason.unwrap_or("none"),
            "Connection to executor closed"
        );
    }

    /// Send the current input as a request.
    ///
    /// The user entry is appended and the input cleared before the send is
    /// attempted, so a closed connection still leaves the message in the
    /// transcript.
    pub fn submit(&mut self) -> Result<Submission, ClientError> {
        let raw = self.view.input_value();
        let text = raw.trim();
        if text.is_empty() {
            return Ok(Submission::Empty);
        }
        let text = text.to_string();

        self.render_entry(Sender::User, &text);
        self.view.clear_input();

        let request = OutboundRequest {
            message: text,
            context: self.context.request_context(),
        };
        let frame = request.encode().map_err(ClientError::Encode)?;

        if self.state != ConnectionState::Open {
            return Err(ClientError::NotOpen(self.state));
        }
        self.transport.send_text(&frame)?;
        Ok(Submission::Sent)
    }

    /// Decode one text frame and paint it.
    ///
    /// A frame that is not valid JSON or lacks a string `human_response` is
    /// rejected before anything is rendered. The optional sections are read
    /// leniently and never cause a rejection.
    pub fn on_inbound_frame(&mut self, frame: &str) -> Result<(), ClientError> {
        let response = match InboundResponse::decode(frame) {
            Ok(r) => r,
            Err(e) => {
                warn!(error = %e, "Rejected inbound frame");
                return Err(ClientError::MalformedFrame(e));
            }
        };
        self.display_response(&response);
        Ok(())
    }

    fn display_response(&mut self, response: &InboundResponse) {
        self.render_entry(Sender::Assistant, &response.human_response);

        // Without a summary the details panel keeps whatever the previous
        // turn left in it.
        if let Some(summary) = response.summary() {
            self.view.reveal_details();
            let graph_id = render::display_value(&summary.ueir_graph_id);
            self.view
                .set_graph_placeholder(&render::graph_placeholder(&graph_id));
            self.view.set_metrics(&MetricsList::from_summary(&summary));
        }

        if let Some(feedback) = response.feedback() {
            self.view.show_learning_feedback(feedback);
        }

        if let Some(note) = &response.note {
            self.view.show_note(note);
        }
    }

    /// Append one entry to the transcript and the view.
    pub fn render_entry(&mut self, sender: Sender, text: &str) {
        let entry = self.transcript.push(Message::new(sender, text));
        self.view.append_entry(entry);
    }
}
