//! Inbound frame classification.

use bytes::Bytes;

use crate::error::{ChanSubError, Result};
use crate::protocol::text::{decode_text, ChannelMessage};

/// A data frame as received from the transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundFrame {
    Text(String),
    Binary(Bytes),
}

impl InboundFrame {
    /// Frame kind label (logs/metrics).
    pub fn kind(&self) -> &'static str {
        match self {
            InboundFrame::Text(_) => "text",
            InboundFrame::Binary(_) => "binary",
        }
    }

    pub fn len(&self) -> usize {
        match self {
            InboundFrame::Text(s) => s.len(),
            InboundFrame::Binary(b) => b.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outcome of decoding one inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// Structured channel message.
    Message(ChannelMessage),
    /// Text that is not a channel message. Never delivered.
    Opaque(String),
    /// Binary payload. Never delivered.
    NonTextual(Bytes),
}

impl Decoded {
    /// Outcome label (logs/metrics).
    pub fn kind(&self) -> &'static str {
        match self {
            Decoded::Message(_) => "structured",
            Decoded::Opaque(_) => "opaque",
            Decoded::NonTextual(_) => "non_textual",
        }
    }

    /// The deliverable message, or `DecodeMismatch` describing what arrived.
    pub fn into_message(self) -> Result<ChannelMessage> {
        match self {
            Decoded::Message(m) => Ok(m),
            Decoded::Opaque(text) => Err(ChanSubError::DecodeMismatch(format!(
                "flat string ({} bytes): {text}",
                text.len()
            ))),
            Decoded::NonTextual(b) => Err(ChanSubError::DecodeMismatch(format!(
                "non-text data ({} bytes)",
                b.len()
            ))),
        }
    }
}

/// Decode an inbound frame. Total: never panics, never errors.
pub fn decode(frame: &InboundFrame) -> Decoded {
    match frame {
        InboundFrame::Text(s) => decode_text(s),
        InboundFrame::Binary(b) => Decoded::NonTextual(b.clone()),
    }
}
