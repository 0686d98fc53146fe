//! WebSocket transport backed by tokio-tungstenite.
//!
//! A spawned task owns the socket. Outbound frames reach it over an unbounded
//! channel; open/frame/close notifications come back over another, so the
//! task holding the [`ChatClient`](nexus_chat::ChatClient) is the only one
//! that ever touches client state.

use futures::{SinkExt, StreamExt};
use nexus_chat::transport::{Connector, Transport, TransportError};
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, error};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SocketEvent {
    Opened,
    Frame(String),
    Closed(Option<String>),
}

pub struct SocketTransport {
    outbound: mpsc::UnboundedSender<String>,
}

impl Transport for SocketTransport {
    fn send_text(&mut self, frame: &str) -> Result<(), TransportError> {
        self.outbound
            .send(frame.to_string())
            .map_err(|_| TransportError::Closed)
    }
}

/// Spawns one socket task per `connect`. Must be used inside a tokio runtime.
pub struct SocketConnector {
    events: mpsc::UnboundedSender<SocketEvent>,
}

impl SocketConnector {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<SocketEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        (Self { events }, rx)
    }
}

impl Connector for SocketConnector {
    type Transport = SocketTransport;

    fn connect(&mut self, url: &str) -> Result<SocketTransport, TransportError> {
        let (outbound, outbound_rx) = mpsc::unbounded_channel();
        tokio::spawn(run_socket(url.to_string(), outbound_rx, self.events.clone()));
        Ok(SocketTransport { outbound })
    }
}

async fn run_socket(
    url: String,
    mut outbound: mpsc::UnboundedReceiver<String>,
    events: mpsc::UnboundedSender<SocketEvent>,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _response)) => stream,
        Err(e) => {
            error!("Failed to connect to {}: {}", url, e);
            let _ = events.send(SocketEvent::Closed(Some(e.to_string())));
            return;
        }
    };
    let _ = events.send(SocketEvent::Opened);

    let (mut sink, mut source) = stream.split();
    loop {
        tokio::select! {
            frame = outbound.recv() => match frame {
                Some(text) => {
                    if let Err(e) = sink.send(Message::Text(text)).await {
                        let _ = events.send(SocketEvent::Closed(Some(e.to_string())));
                        break;
                    }
                }
                // Client dropped its transport.
                None => {
                    let _ = sink.close().await;
                    break;
                }
            },
            incoming = source.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let _ = events.send(SocketEvent::Frame(text));
                }
                Some(Ok(Message::Close(frame))) => {
                    let _ = events.send(SocketEvent::Closed(frame.map(|f| f.reason.to_string())));
                    break;
                }
                Some(Ok(other)) => debug!("Ignoring non-text frame: {:?}", other),
                Some(Err(e)) => {
                    let _ = events.send(SocketEvent::Closed(Some(e.to_string())));
                    break;
                }
                None => {
                    let _ = events.send(SocketEvent::Closed(None));
                    break;
                }
            },
        }
    }
}
