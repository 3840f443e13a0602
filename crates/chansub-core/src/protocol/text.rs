//! Text frames (JSON).
//!
//! Field names (`action`, `channel`, `datum`) are the wire contract. Field
//! order is not significant.

use serde::{Deserialize, Serialize};

use crate::error::{ChanSubError, Result};
use crate::protocol::frame::Decoded;

/// `action` value carried by subscription requests.
pub const SUBSCRIBE_ACTION: &str = "subscribe";

/// A unit of data delivered over a channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelMessage {
    /// Channel the server addressed this message to.
    pub channel: String,
    /// Opaque payload.
    pub datum: String,
    /// App-defined discriminator (e.g. `"data"`), passed through unchanged.
    /// Missing or `null` reads as empty; non-string values keep their JSON text.
    #[serde(default, deserialize_with = "action_lenient")]
    pub action: String,
}

fn action_lenient<'de, D>(de: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(match serde_json::Value::deserialize(de)? {
        serde_json::Value::Null => String::new(),
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    })
}

/// Outbound subscription control frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    pub action: String,
    pub channel: String,
}

impl SubscribeRequest {
    pub fn new(channel: impl Into<String>) -> Self {
        Self {
            action: SUBSCRIBE_ACTION.to_string(),
            channel: channel.into(),
        }
    }

    /// Serialize to the JSON text sent on the wire.
    pub fn to_text(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| ChanSubError::Internal(format!("subscribe encode failed: {e}")))
    }

    /// Parse a subscription request (server side / tests).
    /// Returns `None` for any other frame.
    pub fn parse(raw: &str) -> Option<Self> {
        serde_json::from_str::<SubscribeRequest>(raw)
            .ok()
            .filter(|r| r.action == SUBSCRIBE_ACTION)
    }
}

/// Encode a subscription request for `channel`.
pub fn encode_subscribe(channel: &str) -> Result<String> {
    SubscribeRequest::new(channel).to_text()
}

/// Classify a text frame: structured channel message or opaque text.
pub fn decode_text(raw: &str) -> Decoded {
    match serde_json::from_str::<ChannelMessage>(raw) {
        Ok(msg) => Decoded::Message(msg),
        Err(e) => {
            tracing::trace!(error = %e, "text frame is not a channel message");
            Decoded::Opaque(raw.to_string())
        }
    }
}
