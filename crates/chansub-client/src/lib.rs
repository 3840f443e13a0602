//! chansub client library entry.
//!
//! Wires the connection lifecycle manager, subscription controller, delivery
//! sink, and WebSocket transport into a single-channel subscriber. Consumed by
//! the binary (`main.rs`) and by integration tests.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod client;
pub mod config;
pub mod lifecycle;
pub mod obs;
pub mod sink;
pub mod subscription;
pub mod transport;

pub use client::{spawn, ClientHandle};
pub use sink::{DeliverySink, FnSink};
pub use subscription::SubscriptionController;
