//! Top-level facade crate for chansub.
//!
//! Re-exports the wire types and the client library so users can depend on a single crate.

pub mod core {
    pub use chansub_core::*;
}

pub mod client {
    pub use chansub_client::*;
}
