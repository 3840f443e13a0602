//! Async driver and collaborator handle.
//!
//! One tokio task owns the [`SubscriptionController`] and feeds it collaborator
//! commands and transport events one at a time, so every state transition is
//! serialized without locks.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Duration};

use chansub_core::error::{ChanSubError, Result};

use crate::config::ClientConfig;
use crate::lifecycle::ConnectionManager;
use crate::obs::ClientMetrics;
use crate::sink::DeliverySink;
use crate::subscription::SubscriptionController;
use crate::transport::ws::WsTransport;
use crate::transport::{ConnectionId, Transport, TransportEvent};

/// Upper bound on waiting for the close handshake during shutdown.
const SHUTDOWN_CLOSE_WAIT: Duration = Duration::from_millis(500);

#[derive(Debug)]
enum Command {
    SetChannel(String),
    Detach,
    Shutdown,
}

/// Collaborator-facing handle to a running client.
pub struct ClientHandle {
    cmd_tx: mpsc::UnboundedSender<Command>,
    task: JoinHandle<()>,
    metrics: Arc<ClientMetrics>,
}

impl ClientHandle {
    /// The user changed the channel.
    pub fn set_channel(&self, channel: impl Into<String>) -> Result<()> {
        self.command(Command::SetChannel(channel.into()))
    }

    /// No further delivery is wanted; an open connection is closed.
    pub fn detach(&self) -> Result<()> {
        self.command(Command::Detach)
    }

    pub fn metrics(&self) -> Arc<ClientMetrics> {
        Arc::clone(&self.metrics)
    }

    /// Detach and wait for the driver task to exit.
    pub async fn shutdown(self) -> Result<()> {
        // the driver may already be gone; joining still reports how it ended
        let _ = self.cmd_tx.send(Command::Shutdown);
        self.task
            .await
            .map_err(|e| ChanSubError::Internal(format!("client task failed: {e}")))
    }

    fn command(&self, cmd: Command) -> Result<()> {
        self.cmd_tx
            .send(cmd)
            .map_err(|_| ChanSubError::Internal("client task stopped".into()))
    }
}

/// Spawn a WebSocket-backed client on the current tokio runtime.
///
/// No connection is made until the first `set_channel`.
pub fn spawn<S>(cfg: &ClientConfig, sink: S) -> ClientHandle
where
    S: DeliverySink + Send + 'static,
{
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (ev_tx, ev_rx) = mpsc::unbounded_channel();

    let metrics = Arc::new(ClientMetrics::default());
    let manager = ConnectionManager::new(cfg.server.url.clone(), Arc::clone(&metrics));
    let controller = SubscriptionController::new(
        manager,
        WsTransport::new(ev_tx),
        sink,
        Arc::clone(&metrics),
    );

    let task = tokio::spawn(run(controller, cmd_rx, ev_rx));

    ClientHandle {
        cmd_tx,
        task,
        metrics,
    }
}

async fn run<T, S>(
    mut ctl: SubscriptionController<T, S>,
    mut cmd_rx: mpsc::UnboundedReceiver<Command>,
    mut ev_rx: mpsc::UnboundedReceiver<TransportEvent>,
) where
    T: Transport,
    S: DeliverySink,
{
    let closing = loop {
        tokio::select! {
            cmd = cmd_rx.recv() => match cmd {
                Some(Command::SetChannel(channel)) => ctl.set_desired_channel(channel),
                Some(Command::Detach) => {
                    ctl.detach();
                }
                Some(Command::Shutdown) | None => break ctl.detach(),
            },
            Some(ev) = ev_rx.recv() => ctl.handle_event(ev),
        }
    };

    if let Some(id) = closing {
        wait_closed(&mut ev_rx, id).await;
    }
    tracing::debug!("client driver stopped");
}

/// Give a locally closed session a moment to finish its close handshake.
async fn wait_closed(ev_rx: &mut mpsc::UnboundedReceiver<TransportEvent>, id: ConnectionId) {
    let closed = async {
        while let Some(ev) = ev_rx.recv().await {
            if ev == TransportEvent::Closed(id) {
                return;
            }
        }
    };
    if timeout(SHUTDOWN_CLOSE_WAIT, closed).await.is_err() {
        tracing::debug!(conn = %id, "close handshake did not finish before shutdown");
    }
}
