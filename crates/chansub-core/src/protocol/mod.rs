//! Wire protocol for channel subscription.
//!
//! - Outbound: `{"action":"subscribe","channel":"..."}` control frames.
//! - Inbound: text frames carrying `{"channel","datum","action"}` messages,
//!   arbitrary text, or binary payloads.
//!
//! Decoding is total: every inbound frame maps to exactly one [`Decoded`]
//! variant, so callers handle all outcomes with an exhaustive `match`.

pub mod frame;
pub mod text;

pub use frame::{decode, Decoded, InboundFrame};
pub use text::{decode_text, encode_subscribe, ChannelMessage, SubscribeRequest, SUBSCRIBE_ACTION};
