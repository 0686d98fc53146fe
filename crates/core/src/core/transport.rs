//! Connection seams: a factory that opens the socket and the send half the
//! client keeps. Open/close/frame notifications are delivered by the host
//! calling into [`ChatClient`](crate::ChatClient).

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Connecting,
    Open,
    Closed,
}

impl ConnectionState {
    pub fn as_str(self) -> &'static str {
        match self {
            ConnectionState::Connecting => "connecting",
            ConnectionState::Open => "open",
            ConnectionState::Closed => "closed",
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("connection closed")]
    Closed,
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("send failed: {0}")]
    Send(String),
}

/// Send half of an open connection. Sends never block or wait for an ack.
pub trait Transport {
    fn send_text(&mut self, frame: &str) -> Result<(), TransportError>;
}

/// Starts a connection to `url`. The returned transport is `Connecting`
/// until the host reports the open acknowledgment.
pub trait Connector {
    type Transport: Transport;

    fn connect(&mut self, url: &str) -> Result<Self::Transport, TransportError>;
}
