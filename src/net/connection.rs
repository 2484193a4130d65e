//! Websocket lifecycle: connect, read, reconnect forever.
//!
//! The lifecycle decisions live in [`LinkState`], a pure state machine the
//! async driver consults on every transport event. That keeps the reconnect
//! bookkeeping (exactly one scheduled attempt per drop) testable without a
//! socket.

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{error, info, warn};
use url::Url;

use super::protocol::{self, ClientMessage, ServerMessage};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionPhase {
    Connecting,
    Connected,
    /// Transient by construction: a reconnect is always pending.
    Disconnected,
}

impl ConnectionPhase {
    /// User-facing text for the connection status strip.
    pub fn status_text(&self) -> &'static str {
        match self {
            ConnectionPhase::Connecting => "Connecting...",
            ConnectionPhase::Connected => "Connected",
            ConnectionPhase::Disconnected => "Disconnected. Reconnecting...",
        }
    }
}

/// Pure connection lifecycle machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkState {
    phase: ConnectionPhase,
    reconnect_pending: bool,
}

impl Default for LinkState {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkState {
    pub fn new() -> Self {
        Self {
            phase: ConnectionPhase::Disconnected,
            reconnect_pending: false,
        }
    }

    pub fn begin_connect(&mut self) -> ConnectionPhase {
        self.reconnect_pending = false;
        self.phase = ConnectionPhase::Connecting;
        self.phase
    }

    pub fn connection_opened(&mut self) -> ConnectionPhase {
        self.phase = ConnectionPhase::Connected;
        self.phase
    }

    /// The transport dropped (close, error, or failed connect). Returns true
    /// exactly once per connection attempt: the caller starts the reconnect
    /// timer only on a true answer, so duplicate close/error events for the
    /// same attempt cannot stack a second timer.
    pub fn connection_lost(&mut self) -> bool {
        self.phase = ConnectionPhase::Disconnected;
        if self.reconnect_pending {
            return false;
        }
        self.reconnect_pending = true;
        true
    }

    pub fn phase(&self) -> ConnectionPhase {
        self.phase
    }

    pub fn can_send(&self) -> bool {
        self.phase == ConnectionPhase::Connected
    }
}

/// Events delivered to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NetEvent {
    Phase(ConnectionPhase),
    Message(ServerMessage),
}

enum SessionEnd {
    /// Transport dropped; reconnect.
    Lost,
    /// The client side went away; stop the task.
    Shutdown,
}

/// Owns the websocket task. Presses go out through the returned sender;
/// phase changes and parsed messages come back on the receiver.
pub struct ConnectionManager {
    endpoint: Url,
    reconnect_delay: Duration,
}

impl ConnectionManager {
    pub fn new(endpoint: Url, reconnect_delay: Duration) -> Self {
        Self {
            endpoint,
            reconnect_delay,
        }
    }

    /// Spawn the connection task. It runs for the life of the client,
    /// reconnecting after every drop, until the event receiver is dropped.
    pub fn spawn(
        self,
    ) -> (
        mpsc::UnboundedSender<ClientMessage>,
        mpsc::UnboundedReceiver<NetEvent>,
    ) {
        let (press_tx, press_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        tokio::spawn(self.run(press_rx, event_tx));
        (press_tx, event_rx)
    }

    async fn run(
        self,
        mut presses: mpsc::UnboundedReceiver<ClientMessage>,
        events: mpsc::UnboundedSender<NetEvent>,
    ) {
        let mut link = LinkState::new();
        loop {
            link.begin_connect();
            if events.send(NetEvent::Phase(link.phase())).is_err() {
                return;
            }
            match connect_async(self.endpoint.as_str()).await {
                Ok((socket, _)) => {
                    info!("connected to {}", self.endpoint);
                    link.connection_opened();
                    if events.send(NetEvent::Phase(link.phase())).is_err() {
                        return;
                    }
                    match serve_socket(socket, &mut presses, &events).await {
                        SessionEnd::Lost => {}
                        SessionEnd::Shutdown => return,
                    }
                }
                Err(err) => {
                    warn!("connect to {} failed: {err}", self.endpoint);
                }
            }
            if link.connection_lost() {
                if events.send(NetEvent::Phase(link.phase())).is_err() {
                    return;
                }
                tokio::time::sleep(self.reconnect_delay).await;
            }
        }
    }
}

async fn serve_socket(
    socket: WebSocketStream<MaybeTlsStream<TcpStream>>,
    presses: &mut mpsc::UnboundedReceiver<ClientMessage>,
    events: &mpsc::UnboundedSender<NetEvent>,
) -> SessionEnd {
    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            frame = stream.next() => match frame {
                Some(Ok(Message::Text(text))) => {
                    if let Some(message) = protocol::parse_server_message(&text) {
                        if events.send(NetEvent::Message(message)).is_err() {
                            return SessionEnd::Shutdown;
                        }
                    }
                }
                Some(Ok(Message::Close(_))) | None => {
                    info!("server closed the connection");
                    return SessionEnd::Lost;
                }
                // Pings and pongs are handled by the library; binary frames
                // are not part of this protocol.
                Some(Ok(_)) => {}
                Some(Err(err)) => {
                    warn!("websocket error: {err}");
                    return SessionEnd::Lost;
                }
            },
            outbound = presses.recv() => match outbound {
                Some(message) => {
                    let text = match serde_json::to_string(&message) {
                        Ok(text) => text,
                        Err(err) => {
                            error!("failed to encode outbound message: {err}");
                            continue;
                        }
                    };
                    if let Err(err) = sink.send(Message::Text(text)).await {
                        warn!("send failed: {err}");
                        return SessionEnd::Lost;
                    }
                }
                None => return SessionEnd::Shutdown,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_cycle() {
        let mut link = LinkState::new();
        assert_eq!(link.begin_connect(), ConnectionPhase::Connecting);
        assert_eq!(link.connection_opened(), ConnectionPhase::Connected);
        assert!(link.can_send());
        assert!(link.connection_lost());
        assert_eq!(link.phase(), ConnectionPhase::Disconnected);
        assert!(!link.can_send());
        // The cycle restarts; disconnected is never terminal.
        assert_eq!(link.begin_connect(), ConnectionPhase::Connecting);
    }

    #[test]
    fn test_duplicate_drop_schedules_exactly_one_reconnect() {
        let mut link = LinkState::new();
        link.begin_connect();
        link.connection_opened();

        let mut scheduled = 0;
        // A close event followed by an error event for the same attempt.
        for _ in 0..2 {
            if link.connection_lost() {
                scheduled += 1;
            }
        }
        assert_eq!(scheduled, 1);
    }

    #[test]
    fn test_next_attempt_rearms_the_reconnect() {
        let mut link = LinkState::new();
        link.begin_connect();
        assert!(link.connection_lost());
        assert!(!link.connection_lost());
        // A fresh attempt clears the pending flag so its own drop schedules
        // again.
        link.begin_connect();
        assert!(link.connection_lost());
    }

    #[test]
    fn test_immediate_close_after_open() {
        let mut link = LinkState::new();
        link.begin_connect();
        link.connection_opened();
        assert!(link.connection_lost());
        // Reconnect path: connecting then connected on the next open.
        assert_eq!(link.begin_connect(), ConnectionPhase::Connecting);
        assert_eq!(link.connection_opened(), ConnectionPhase::Connected);
    }

    #[test]
    fn test_status_text() {
        assert_eq!(ConnectionPhase::Connecting.status_text(), "Connecting...");
        assert_eq!(ConnectionPhase::Connected.status_text(), "Connected");
        assert_eq!(
            ConnectionPhase::Disconnected.status_text(),
            "Disconnected. Reconnecting..."
        );
    }
}
