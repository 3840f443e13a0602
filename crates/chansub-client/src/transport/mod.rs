//! Transport layer (WebSocket client).
//!
//! The subscription core never touches sockets directly. It drives a
//! [`Transport`] with fire-and-forget commands and receives outcomes later as
//! [`TransportEvent`]s tagged with the [`ConnectionId`] they belong to.

use std::fmt;

use chansub_core::InboundFrame;

pub mod codec;
pub mod ws;

#[cfg(test)]
pub(crate) mod recording;

/// Handle for one transport session. Never reused within a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub u64);

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "conn-{}", self.0)
    }
}

/// Something the transport reports about a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    /// Handshake finished; sends are now accepted.
    Opened(ConnectionId),
    /// A text or binary data frame arrived.
    Frame(ConnectionId, InboundFrame),
    /// The session failed. Always followed by `Closed` for the same id.
    Error(ConnectionId, String),
    /// The session is gone (peer close, local close, or failure).
    Closed(ConnectionId),
}

impl TransportEvent {
    pub fn id(&self) -> ConnectionId {
        match self {
            TransportEvent::Opened(id)
            | TransportEvent::Frame(id, _)
            | TransportEvent::Error(id, _)
            | TransportEvent::Closed(id) => *id,
        }
    }
}

/// Outbound side of a transport. Calls never block; results arrive as events.
pub trait Transport {
    /// Begin connecting session `id` to `url`.
    fn open(&mut self, id: ConnectionId, url: &str);
    /// Queue a text frame on session `id`, preserving call order.
    fn send(&mut self, id: ConnectionId, text: String);
    /// Start closing session `id`.
    fn close(&mut self, id: ConnectionId);
}
