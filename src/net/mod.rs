//! Websocket transport: connection lifecycle and wire messages.

mod connection;
pub mod protocol;

pub use connection::{ConnectionManager, ConnectionPhase, LinkState, NetEvent};
pub use protocol::{parse_server_message, ClientMessage, ServerMessage};
