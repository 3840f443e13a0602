//! chansub core: transport-agnostic wire codec and error types.
//!
//! This crate defines the channel-subscription wire contract and the error
//! surface shared by the client and any tooling. It carries no transport or
//! runtime dependencies so the codec can be exercised in isolation.
//!
//! # Panic-free decoding
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! Malformed inbound traffic is classified, never propagated as a crash.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod protocol;

/// Shared result type.
pub use error::{ChanSubError, ErrorKind, Result};
pub use protocol::{decode, decode_text, encode_subscribe, ChannelMessage, Decoded, InboundFrame};
