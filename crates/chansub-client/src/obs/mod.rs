//! Client observability.
//!
//! Counters are stored as atomics keyed by sorted label sets and rendered in
//! Prometheus text format on demand.

pub mod metrics;

pub use metrics::ClientMetrics;
