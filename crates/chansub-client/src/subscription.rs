//! Subscription controller.
//!
//! Holds the single desired channel and reacts to two kinds of input, one at a
//! time and in arrival order:
//! - collaborator requests (`set_desired_channel`, `detach`)
//! - transport events (`handle_event`)
//!
//! Filtering is evaluated per message against the desired channel at the
//! moment the frame is processed. A message for the previous channel that
//! arrives after a switch is dropped.

use std::sync::Arc;

use chansub_core::protocol::{decode, encode_subscribe, InboundFrame};

use crate::lifecycle::ConnectionManager;
use crate::obs::ClientMetrics;
use crate::sink::DeliverySink;
use crate::transport::{ConnectionId, Transport, TransportEvent};

pub struct SubscriptionController<T, S> {
    desired: Option<String>,
    attached: bool,
    manager: ConnectionManager,
    transport: T,
    sink: S,
    metrics: Arc<ClientMetrics>,
}

impl<T: Transport, S: DeliverySink> SubscriptionController<T, S> {
    pub fn new(manager: ConnectionManager, transport: T, sink: S, metrics: Arc<ClientMetrics>) -> Self {
        Self {
            desired: None,
            attached: false,
            manager,
            transport,
            sink,
            metrics,
        }
    }

    pub fn desired_channel(&self) -> Option<&str> {
        self.desired.as_deref()
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn manager(&self) -> &ConnectionManager {
        &self.manager
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Replace the desired channel.
    ///
    /// Open: subscribe now. No connection: create one; the subscribe is sent on
    /// open. Connecting: nothing else to do.
    pub fn set_desired_channel(&mut self, channel: impl Into<String>) {
        let channel = channel.into();
        tracing::debug!(channel = %channel, "desired channel set");
        self.desired = Some(channel);
        self.attached = true;

        if self.manager.is_open() {
            self.subscribe("change");
        } else {
            self.manager.ensure_connection(&mut self.transport);
        }
    }

    /// Post-open hook: subscribe to the current desired channel.
    pub fn on_connection_open(&mut self) {
        self.subscribe("open");
    }

    /// Decode and filter one inbound frame.
    pub fn on_inbound_frame(&mut self, frame: &InboundFrame) {
        let decoded = decode(frame);
        self.metrics.inbound_frames.inc(&[("kind", decoded.kind())]);

        let kind = decoded.kind();
        match decoded.into_message() {
            Ok(msg) if self.desired.as_deref() == Some(msg.channel.as_str()) => {
                self.metrics.delivered.inc(&[]);
                self.sink.deliver(msg);
            }
            Ok(msg) => {
                self.metrics.dropped.inc(&[("reason", "channel_mismatch")]);
                tracing::debug!(channel = %msg.channel, "message for other channel dropped");
            }
            // opaque / non_textual
            Err(e) => {
                self.metrics.dropped.inc(&[("reason", kind)]);
                tracing::debug!(error = %e, code = e.kind().as_str(), "undeliverable frame dropped");
            }
        }
    }

    /// Consumer no longer wants delivery. Closes an open connection; a
    /// connecting one is closed once it opens. Returns the id closed now.
    pub fn detach(&mut self) -> Option<ConnectionId> {
        self.attached = false;
        let closed = self.manager.close(&mut self.transport);
        tracing::debug!(closed = ?closed, "consumer detached");
        closed
    }

    /// Route one transport event.
    pub fn handle_event(&mut self, ev: TransportEvent) {
        match ev {
            TransportEvent::Opened(id) => {
                if !self.manager.on_opened(&mut self.transport, id) {
                    return;
                }
                if self.attached {
                    self.on_connection_open();
                } else {
                    tracing::info!(conn = %id, "opened after detach; closing");
                    self.manager.close(&mut self.transport);
                }
            }
            TransportEvent::Frame(id, frame) => {
                if self.attached && self.manager.is_current_open(id) {
                    self.on_inbound_frame(&frame);
                } else {
                    self.metrics.dropped.inc(&[("reason", "stale")]);
                    tracing::debug!(conn = %id, kind = frame.kind(), "frame outside open session dropped");
                }
            }
            TransportEvent::Error(id, err) => self.manager.on_error(id, &err),
            TransportEvent::Closed(id) => {
                self.manager.on_closed(id);
            }
        }
    }

    fn subscribe(&mut self, trigger: &'static str) {
        let Some(channel) = self.desired.as_deref() else {
            tracing::debug!("open without desired channel; nothing to subscribe");
            return;
        };

        let text = match encode_subscribe(channel) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "subscribe encode failed");
                return;
            }
        };

        match self.manager.send(&mut self.transport, text) {
            Ok(()) => {
                self.metrics.subscribe_sent.inc(&[("trigger", trigger)]);
                tracing::debug!(channel = %channel, trigger, "subscribed to channel");
            }
            // unreachable by construction: callers only subscribe while open
            Err(e) => tracing::error!(error = %e, kind = e.kind().as_str(), "subscribe send rejected"),
        }
    }
}
