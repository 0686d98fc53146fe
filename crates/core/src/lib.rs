//! # nexus_chat
//!
//! Host-independent chat client for the Nexus executor.
//!
//! The client owns one connection, a generated session identifier and an
//! append-only transcript. Everything that touches the outside world is
//! injected: the view (DOM or terminal), the connection factory and the
//! provider of per-request execution context.
//!
//! ```
//! use nexus_chat::prelude::*;
//!
//! let session = SessionId::generate();
//! let endpoint = Endpoint::from_page("https:", "nexus.example:443");
//! assert!(endpoint.url_for(&session).starts_with("wss://nexus.example:443/ws/session_"));
//! ```
//!
//! ## Modules
//!
//! - [`client`]: the Chat Client and its connection state machine
//! - [`protocol`]: outbound/inbound JSON envelopes
//! - [`session`]: session identifiers and endpoint URLs
//! - [`render`]: fixed-format text for metrics, graph placeholder and feedback
//! - [`view`] / [`transport`] / [`context`]: injected collaborator seams

#[path = "core/clock.rs"]
mod clock;

#[path = "core/prng.rs"]
pub mod prng;

#[path = "core/session.rs"]
pub mod session;

#[path = "core/protocol.rs"]
pub mod protocol;

#[path = "core/context.rs"]
pub mod context;

#[path = "core/transcript.rs"]
pub mod transcript;

#[path = "core/render.rs"]
pub mod render;

#[path = "core/view.rs"]
pub mod view;

#[path = "core/transport.rs"]
pub mod transport;

#[path = "core/client.rs"]
pub mod client;

pub use client::{ChatClient, ClientError, Submission};
pub use transport::{ConnectionState, TransportError};

/// Prelude module for convenient imports.
///
/// ```
/// use nexus_chat::prelude::*;
/// ```
pub mod prelude {
    pub use crate::client::{ChatClient, ClientError, Submission};
    pub use crate::context::{ContextPreferences, ContextProvider, StaticContext};
    pub use crate::protocol::{
        ExecutionMetrics, ExecutionSummary, InboundResponse, OutboundRequest, RequestContext,
    };
    pub use crate::render::MetricsList;
    pub use crate::session::{Endpoint, SessionId};
    pub use crate::transcript::{Message, Sender, Transcript};
    pub use crate::transport::{ConnectionState, Connector, Transport, TransportError};
    pub use crate::view::ChatView;
}
