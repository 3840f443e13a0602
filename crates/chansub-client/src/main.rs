//! chansub client binary.
//!
//! Stands in for the presentation layer:
//! - subscribes to `subscriber.default_channel` on start
//! - each non-empty stdin line switches the desired channel
//! - delivered messages print to stdout, diagnostics go to stderr
//! - EOF or Ctrl-C detaches and exits

use std::future::Future;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::mpsc;
use tracing_subscriber::{fmt, EnvFilter};

use chansub_client::config::{self, ClientConfig};
use chansub_client::ClientHandle;
use chansub_core::ChannelMessage;
use chansub_core::error::{ChanSubError, Result};

#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, kind = e.kind().as_str(), "chansub-client failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = match std::env::args().nth(1) {
        Some(path) => config::load_from_file(&path)?,
        None => ClientConfig::default(),
    };
    let cfg = config::apply_env(cfg, std::env::var(config::URL_ENV).ok())?;
    tracing::info!(url = %cfg.server.url, "chansub-client starting");

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = chansub_client::spawn(&cfg, tx);
    client.set_channel(cfg.subscriber.default_channel.clone())?;

    let lines = BufReader::new(tokio::io::stdin()).lines();
    pump(&client, &mut rx, lines, tokio::signal::ctrl_c()).await?;

    let metrics = client.metrics();
    client.shutdown().await?;
    tracing::debug!(metrics = %metrics.render(), "final metrics");
    Ok(())
}

/// Forward input lines as channel changes and print deliveries until input
/// ends or `shutdown` resolves.
async fn pump<R, F>(
    client: &ClientHandle,
    rx: &mut mpsc::UnboundedReceiver<ChannelMessage>,
    mut lines: Lines<R>,
    shutdown: F,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    F: Future,
{
    // polled across iterations so a signal is never lost between them
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            Some(msg) = rx.recv() => {
                println!("Channel: {} - Data: {}", msg.channel, msg.datum);
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let channel = line.trim();
                    if !channel.is_empty() {
                        client.set_channel(channel)?;
                    }
                }
                Ok(None) => break,
                Err(e) => return Err(ChanSubError::Internal(format!("stdin read failed: {e}"))),
            },
            _ = &mut shutdown => break,
        }
    }
    Ok(())
}
