//! Decode-once mapping from WebSocket messages to transport-level inbound kinds.
//!
//! - Text / Binary => data frames for the subscription core
//! - Ping / Pong are answered by the WebSocket library and only surfaced
//! - Close ends the session

use tokio_tungstenite::tungstenite::Message;

use chansub_core::InboundFrame;

#[derive(Debug, PartialEq, Eq)]
pub enum Inbound {
    Data(InboundFrame),
    Ping,
    Pong,
    Close,
    Other,
}

pub fn classify(msg: Message) -> Inbound {
    match msg {
        Message::Text(s) => Inbound::Data(InboundFrame::Text(s.as_str().to_owned())),
        Message::Binary(b) => Inbound::Data(InboundFrame::Binary(b)),
        Message::Ping(_) => Inbound::Ping,
        Message::Pong(_) => Inbound::Pong,
        Message::Close(_) => Inbound::Close,
        // raw frames are never yielded by the reader
        Message::Frame(_) => Inbound::Other,
    }
}
