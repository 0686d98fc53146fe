//! The terminal session loop: stdin lines in, socket events in, transcript out.
//!
//! Input is only read once the socket has opened, so lines piped in before the
//! handshake finishes are not lost to a `NotOpen` error. After stdin ends the
//! loop keeps draining socket events until every sent message has been
//! answered or the server closes the session.

use std::io::{self, Write};

use nexus_chat::context::ContextProvider;
use nexus_chat::transport::Transport;
use nexus_chat::{ChatClient, ConnectionState, Submission};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::socket::SocketEvent;
use crate::terminal_view::TerminalView;

pub async fn run_session<W, T, P, R>(
    client: &mut ChatClient<TerminalView<W>, T, P>,
    input: R,
    events: &mut mpsc::UnboundedReceiver<SocketEvent>,
) -> io::Result<()>
where
    W: Write,
    T: Transport,
    P: ContextProvider,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    let mut input_open = true;
    let mut awaiting: usize = 0;

    loop {
        let reading = input_open && client.state() != ConnectionState::Connecting;

        tokio::select! {
            biased;

            line = lines.next_line(), if reading => match line? {
                Some(line) => {
                    client.view_mut().set_input(line);
                    match client.submit() {
                        Ok(Submission::Sent) => awaiting += 1,
                        Ok(Submission::Empty) => {}
                        Err(e) => error!("Send failed: {}", e),
                    }
                }
                None => {
                    input_open = false;
                    if awaiting == 0 || client.state() == ConnectionState::Closed {
                        break;
                    }
                    info!("Input closed; waiting for {} response(s)", awaiting);
                }
            },
            event = events.recv() => match event {
                Some(SocketEvent::Opened) => client.on_open(),
                Some(SocketEvent::Frame(text)) => {
                    match client.on_inbound_frame(&text) {
                        Ok(()) => awaiting = awaiting.saturating_sub(1),
                        Err(e) => error!("{}", e),
                    }
                    if !input_open && awaiting == 0 {
                        break;
                    }
                }
                Some(SocketEvent::Closed(reason)) => {
                    client.on_close(reason.as_deref());
                    if !input_open {
                        break;
                    }
                }
                None => break,
            },
        }
    }

    Ok(())
}
