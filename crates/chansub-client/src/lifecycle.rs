//! Connection lifecycle manager.
//!
//! Owns the single connection slot. `Absent -> Connecting -> Open -> Closed`,
//! where Absent and Closed both mean "slot empty"; a new connection may only be
//! created while the slot is empty.
//!
//! Transport events carry the id of the session they belong to. Events for any
//! id other than the current connection are stale and ignored.

use std::sync::Arc;
use std::time::Instant;

use chansub_core::error::{ChanSubError, Result};

use crate::obs::ClientMetrics;
use crate::transport::{ConnectionId, Transport};

/// State of a live connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnState {
    Connecting,
    Open,
}

/// Externally visible lifecycle phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No connection has ever been created.
    Absent,
    Connecting,
    Open,
    /// The last connection is gone; a new one may be created.
    Closed,
}

/// The single permitted transport session.
#[derive(Debug)]
pub struct Connection {
    id: ConnectionId,
    state: ConnState,
    url: String,
    created_at: Instant,
}

impl Connection {
    pub fn id(&self) -> ConnectionId {
        self.id
    }
    pub fn state(&self) -> ConnState {
        self.state
    }
    pub fn url(&self) -> &str {
        &self.url
    }
}

pub struct ConnectionManager {
    url: String,
    slot: Option<Connection>,
    next_id: u64,
    metrics: Arc<ClientMetrics>,
}

impl ConnectionManager {
    pub fn new(url: impl Into<String>, metrics: Arc<ClientMetrics>) -> Self {
        Self {
            url: url.into(),
            slot: None,
            next_id: 1,
            metrics,
        }
    }

    pub fn phase(&self) -> Phase {
        match &self.slot {
            Some(c) if c.state == ConnState::Open => Phase::Open,
            Some(_) => Phase::Connecting,
            None if self.next_id == 1 => Phase::Absent,
            None => Phase::Closed,
        }
    }

    pub fn current(&self) -> Option<&Connection> {
        self.slot.as_ref()
    }

    /// Safe to send: true only in `Open`.
    pub fn is_open(&self) -> bool {
        self.phase() == Phase::Open
    }

    /// Whether `id` is the current connection and it is open.
    pub fn is_current_open(&self, id: ConnectionId) -> bool {
        matches!(&self.slot, Some(c) if c.id == id && c.state == ConnState::Open)
    }

    /// Total connections created over the manager's life.
    pub fn connections_created(&self) -> u64 {
        self.next_id - 1
    }

    /// `Absent/Closed -> Connecting`. Returns true if a connection was created.
    pub fn ensure_connection<T: Transport>(&mut self, transport: &mut T) -> bool {
        if self.slot.is_some() {
            return false;
        }

        let id = ConnectionId(self.next_id);
        self.next_id += 1;

        self.slot = Some(Connection {
            id,
            state: ConnState::Connecting,
            url: self.url.clone(),
            created_at: Instant::now(),
        });
        self.metrics.connection_events.inc(&[("event", "created")]);
        tracing::info!(conn = %id, url = %self.url, "connection created");

        transport.open(id, &self.url);
        true
    }

    /// `Connecting -> Open`. Returns true if the current connection just opened.
    ///
    /// A stale session that opens late is closed straight away.
    pub fn on_opened<T: Transport>(&mut self, transport: &mut T, id: ConnectionId) -> bool {
        match &mut self.slot {
            Some(c) if c.id == id && c.state == ConnState::Connecting => {
                c.state = ConnState::Open;
                self.metrics.connection_events.inc(&[("event", "opened")]);
                self.metrics.connection_open.set(&[], 1);
                self.metrics
                    .connect_duration
                    .observe(&[], c.created_at.elapsed());
                tracing::info!(conn = %id, "connection established");
                true
            }
            Some(c) if c.id == id => {
                tracing::debug!(conn = %id, "duplicate open ignored");
                false
            }
            _ => {
                tracing::debug!(conn = %id, "stale session opened; closing it");
                transport.close(id);
                false
            }
        }
    }

    /// `* -> Closed`. Clears the slot if `id` is the current connection.
    pub fn on_closed(&mut self, id: ConnectionId) -> bool {
        if self.slot.as_ref().map(Connection::id) != Some(id) {
            tracing::debug!(conn = %id, "close for stale session ignored");
            return false;
        }
        self.slot = None;
        self.metrics.connection_events.inc(&[("event", "closed")]);
        self.metrics.connection_open.set(&[], 0);
        tracing::info!(conn = %id, "connection closed");
        true
    }

    /// Surface a transport error. State is unchanged; `Closed` follows.
    pub fn on_error(&self, id: ConnectionId, err: &str) {
        let e = ChanSubError::Transport(err.to_string());
        self.metrics
            .transport_errors
            .inc(&[("kind", e.kind().as_str())]);
        let current = matches!(&self.slot, Some(c) if c.id == id);
        tracing::warn!(conn = %id, current, error = %e, "websocket error");
    }

    /// Write a text frame. Only valid while `Open`.
    pub fn send<T: Transport>(&self, transport: &mut T, text: String) -> Result<()> {
        match &self.slot {
            Some(c) if c.state == ConnState::Open => {
                transport.send(c.id, text);
                Ok(())
            }
            Some(_) => Err(ChanSubError::InvalidState("send while connecting")),
            None if self.phase() == Phase::Closed => Err(ChanSubError::TransportClosed),
            None => Err(ChanSubError::InvalidState("send without connection")),
        }
    }

    /// `Open -> Closed` on local request. A `Connecting` connection is left
    /// alone. Returns the id that was closed.
    pub fn close<T: Transport>(&mut self, transport: &mut T) -> Option<ConnectionId> {
        let id = match &self.slot {
            Some(c) if c.state == ConnState::Open => c.id,
            _ => return None,
        };
        transport.close(id);
        self.on_closed(id);
        Some(id)
    }
}
