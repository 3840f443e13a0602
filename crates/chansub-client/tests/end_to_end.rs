//! Client against a local WebSocket server.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio::time::timeout;
use tokio_tungstenite::{accept_async, tungstenite::Message, WebSocketStream};

use chansub_client::config::ClientConfig;
use chansub_core::protocol::SubscribeRequest;
use chansub_core::ChannelMessage;

const WAIT: Duration = Duration::from_secs(5);

fn data(channel: &str, datum: &str) -> Message {
    Message::text(format!(
        r#"{{"channel":"{channel}","datum":"{datum}","action":"data"}}"#
    ))
}

fn config_for(addr: SocketAddr) -> ClientConfig {
    let mut cfg = ClientConfig::default();
    cfg.server.url = format!("ws://{addr}/ws");
    cfg
}

async fn next_subscribe(ws: &mut WebSocketStream<TcpStream>) -> String {
    loop {
        let msg = ws.next().await.expect("stream ended").expect("read failed");
        if let Message::Text(t) = msg {
            return SubscribeRequest::parse(t.as_str())
                .expect("first text frame must be a subscribe request")
                .channel;
        }
    }
}

async fn wait_close(ws: &mut WebSocketStream<TcpStream>) {
    while let Some(Ok(msg)) = ws.next().await {
        if msg.is_close() {
            break;
        }
    }
}

async fn recv(rx: &mut mpsc::UnboundedReceiver<ChannelMessage>) -> ChannelMessage {
    timeout(WAIT, rx.recv())
        .await
        .expect("timed out waiting for delivery")
        .expect("sink closed")
}

#[tokio::test]
async fn delivers_only_messages_for_desired_channel() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = accept_async(tcp).await.unwrap();

        assert_eq!(next_subscribe(&mut ws).await, "test-channel");
        ws.send(Message::text("hello world".to_string())).await.unwrap();
        ws.send(Message::binary(vec![0xde, 0xad])).await.unwrap();
        ws.send(data("other", "x")).await.unwrap();
        ws.send(data("test-channel", "hi")).await.unwrap();

        assert_eq!(next_subscribe(&mut ws).await, "other");
        ws.send(data("other", "y")).await.unwrap();
        ws.send(data("test-channel", "late")).await.unwrap();
        ws.send(data("other", "z")).await.unwrap();

        wait_close(&mut ws).await;
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = chansub_client::spawn(&config_for(addr), tx);
    client.set_channel("test-channel").unwrap();

    let m = recv(&mut rx).await;
    assert_eq!((m.channel.as_str(), m.datum.as_str(), m.action.as_str()), ("test-channel", "hi", "data"));

    client.set_channel("other").unwrap();
    assert_eq!(recv(&mut rx).await.datum, "y");
    assert_eq!(recv(&mut rx).await.datum, "z");

    let metrics = client.metrics();
    client.shutdown().await.unwrap();
    timeout(WAIT, server).await.unwrap().unwrap();

    assert_eq!(metrics.connection_events.get(&[("event", "created")]), 1);
    assert_eq!(metrics.delivered.get(&[]), 3);
    assert_eq!(metrics.dropped.get(&[("reason", "channel_mismatch")]), 2);
    assert_eq!(metrics.dropped.get(&[("reason", "opaque")]), 1);
    assert_eq!(metrics.dropped.get(&[("reason", "non_textual")]), 1);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn detach_then_set_channel_opens_fresh_connection() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = tokio::spawn(async move {
        let mut seen = Vec::new();
        for _ in 0..2 {
            let (tcp, _) = listener.accept().await.unwrap();
            let mut ws = accept_async(tcp).await.unwrap();
            let channel = next_subscribe(&mut ws).await;
            ws.send(data(&channel, "welcome")).await.unwrap();
            wait_close(&mut ws).await;
            seen.push(channel);
        }
        seen
    });

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = chansub_client::spawn(&config_for(addr), tx);

    client.set_channel("a").unwrap();
    assert_eq!(recv(&mut rx).await.channel, "a");

    client.detach().unwrap();
    client.set_channel("b").unwrap();
    assert_eq!(recv(&mut rx).await.channel, "b");

    let metrics = client.metrics();
    client.shutdown().await.unwrap();

    let seen = timeout(WAIT, server).await.unwrap().unwrap();
    assert_eq!(seen, vec!["a".to_string(), "b".to_string()]);
    assert_eq!(metrics.connection_events.get(&[("event", "created")]), 2);
}

#[tokio::test]
async fn refused_connection_is_observed_not_retried() {
    let addr = {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        listener.local_addr().unwrap()
    };

    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = chansub_client::spawn(&config_for(addr), tx);
    client.set_channel("test-channel").unwrap();

    let metrics = client.metrics();
    timeout(WAIT, async {
        while metrics.connection_events.get(&[("event", "closed")]) == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("connection never reported closed");

    assert_eq!(metrics.transport_errors.get(&[("kind", "TRANSPORT_ERROR")]), 1);
    assert_eq!(metrics.connection_events.get(&[("event", "created")]), 1);
    assert!(rx.try_recv().is_err());

    client.shutdown().await.unwrap();
}

#[tokio::test]
async fn wss_url_reaches_tls_handshake() {
    use tokio_tungstenite::tungstenite::{error::UrlError, Error};

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    // plain TCP peer: accepts, then hangs up mid-handshake
    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        drop(tcp);
    });

    let _ = rustls::crypto::ring::default_provider().install_default();
    let err = timeout(WAIT, tokio_tungstenite::connect_async(format!("wss://{addr}/ws")))
        .await
        .expect("wss connect hung")
        .expect_err("plain TCP peer cannot complete a TLS handshake");
    assert!(
        !matches!(err, Error::Url(UrlError::TlsFeatureNotEnabled)),
        "wss rejected before TLS: {err}"
    );

    timeout(WAIT, server).await.unwrap().unwrap();
}

#[tokio::test]
async fn wss_url_failure_is_observed_as_transport_error() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        drop(tcp);
    });

    let mut cfg = ClientConfig::default();
    cfg.server.url = format!("wss://{addr}/ws");
    let (tx, mut rx) = mpsc::unbounded_channel();
    let client = chansub_client::spawn(&cfg, tx);
    client.set_channel("test-channel").unwrap();

    let metrics = client.metrics();
    timeout(WAIT, async {
        while metrics.connection_events.get(&[("event", "closed")]) == 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("wss connection never reported closed");

    assert_eq!(metrics.transport_errors.get(&[("kind", "TRANSPORT_ERROR")]), 1);
    assert!(rx.try_recv().is_err());

    client.shutdown().await.unwrap();
    timeout(WAIT, server).await.unwrap().unwrap();
}
