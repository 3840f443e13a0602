//! WebSocket client transport.
//!
//! Responsibilities:
//! - One tokio task per session: connect, then pump outbound and inbound
//! - Outbound queue per session (unbounded mpsc) so call order is wire order
//! - Report Opened / Frame / Error / Closed back on the shared event channel
//!
//! `wss://` URLs go through rustls with the webpki root store.
//!
//! Every session task ends with exactly one `Closed` event, including when the
//! handshake fails (then `Error` is reported first).

use std::collections::HashMap;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::Instrument;

use crate::transport::codec::{classify, Inbound};
use crate::transport::{ConnectionId, Transport, TransportEvent};

#[derive(Debug)]
enum Outbound {
    Text(String),
    Close,
}

/// Transport backed by `tokio-tungstenite`. Must be used inside a tokio runtime.
pub struct WsTransport {
    events: mpsc::UnboundedSender<TransportEvent>,
    sessions: HashMap<ConnectionId, mpsc::UnboundedSender<Outbound>>,
}

impl WsTransport {
    pub fn new(events: mpsc::UnboundedSender<TransportEvent>) -> Self {
        // wss:// needs a process-wide rustls provider; Err means one is already set
        let _ = rustls::crypto::ring::default_provider().install_default();
        Self {
            events,
            sessions: HashMap::new(),
        }
    }
}

impl Transport for WsTransport {
    fn open(&mut self, id: ConnectionId, url: &str) {
        // finished session tasks drop their receiver
        self.sessions.retain(|_, tx| !tx.is_closed());

        let (tx, rx) = mpsc::unbounded_channel();
        self.sessions.insert(id, tx);
        let span = tracing::debug_span!("ws_session", conn = %id, url = %url);
        tokio::spawn(run_session(id, url.to_string(), rx, self.events.clone()).instrument(span));
    }

    fn send(&mut self, id: ConnectionId, text: String) {
        let Some(tx) = self.sessions.get(&id) else {
            tracing::warn!(conn = %id, "send on unknown session");
            return;
        };
        if tx.send(Outbound::Text(text)).is_err() {
            tracing::debug!(conn = %id, "send after session task ended");
        }
    }

    fn close(&mut self, id: ConnectionId) {
        if let Some(tx) = self.sessions.remove(&id) {
            let _ = tx.send(Outbound::Close);
        }
    }
}

// --------------------
// Session loop
// --------------------
async fn run_session(
    id: ConnectionId,
    url: String,
    mut out_rx: mpsc::UnboundedReceiver<Outbound>,
    events: mpsc::UnboundedSender<TransportEvent>,
) {
    let stream = match connect_async(url.as_str()).await {
        Ok((stream, _resp)) => stream,
        Err(e) => {
            let _ = events.send(TransportEvent::Error(id, format!("connect failed: {e}")));
            let _ = events.send(TransportEvent::Closed(id));
            return;
        }
    };

    if events.send(TransportEvent::Opened(id)).is_err() {
        // client is gone; nothing left to report to
        return;
    }

    let (mut ws_tx, mut ws_rx) = stream.split();

    loop {
        tokio::select! {
            // outbound writer
            maybe_out = out_rx.recv() => {
                match maybe_out {
                    Some(Outbound::Text(s)) => {
                        if let Err(e) = ws_tx.send(Message::text(s)).await {
                            let _ = events.send(TransportEvent::Error(id, format!("write failed: {e}")));
                            break;
                        }
                    }
                    Some(Outbound::Close) | None => {
                        let _ = ws_tx.close().await;
                        break;
                    }
                }
            }

            // inbound reader
            incoming = ws_rx.next() => {
                let Some(incoming) = incoming else { break; };
                match incoming {
                    Ok(msg) => match classify(msg) {
                        Inbound::Data(frame) => {
                            let _ = events.send(TransportEvent::Frame(id, frame));
                        }
                        Inbound::Ping | Inbound::Pong | Inbound::Other => {}
                        Inbound::Close => break,
                    },
                    Err(e) => {
                        let _ = events.send(TransportEvent::Error(id, format!("read failed: {e}")));
                        break;
                    }
                }
            }
        }
    }

    let _ = events.send(TransportEvent::Closed(id));
}
