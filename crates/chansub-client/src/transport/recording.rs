//! Recording transport for unit tests.

use crate::transport::{ConnectionId, Transport};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Open(ConnectionId, String),
    Send(ConnectionId, String),
    Close(ConnectionId),
}

#[derive(Debug, Default)]
pub struct RecordingTransport {
    pub ops: Vec<Op>,
}

impl RecordingTransport {
    pub fn opens(&self) -> Vec<ConnectionId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Open(id, _) => Some(*id),
                _ => None,
            })
            .collect()
    }

    pub fn sends(&self) -> Vec<(ConnectionId, String)> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Send(id, text) => Some((*id, text.clone())),
                _ => None,
            })
            .collect()
    }

    /// Channels of every subscription request sent, in order.
    pub fn subscribed_channels(&self) -> Vec<String> {
        self.sends()
            .iter()
            .filter_map(|(_, text)| chansub_core::protocol::SubscribeRequest::parse(text))
            .map(|r| r.channel)
            .collect()
    }

    pub fn closes(&self) -> Vec<ConnectionId> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                Op::Close(id) => Some(*id),
                _ => None,
            })
            .collect()
    }
}

impl Transport for RecordingTransport {
    fn open(&mut self, id: ConnectionId, url: &str) {
        self.ops.push(Op::Open(id, url.to_string()));
    }

    fn send(&mut self, id: ConnectionId, text: String) {
        self.ops.push(Op::Send(id, text));
    }

    fn close(&mut self, id: ConnectionId) {
        self.ops.push(Op::Close(id));
    }
}
