use std::sync::mpsc;

use report_relay::transport::{StreamTransport, Transport};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

/// One-shot collector stand-in: accepts a single connection, records the
/// received bytes, answers with `reply`.
async fn spawn_collector(reply: &'static [u8]) -> (u16, mpsc::Receiver<Vec<u8>>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    let (tx, rx) = mpsc::channel();
    tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.expect("accept");
        let mut received = Vec::new();
        socket.read_to_end(&mut received).await.expect("read");
        tx.send(received).expect("send received bytes");
        socket.write_all(reply).await.expect("write reply");
    });
    (port, rx)
}

#[tokio::test]
async fn acknowledged_delivery_succeeds() {
    let (port, received) = spawn_collector(b"OK").await;
    let transport = StreamTransport::new("rest-1234".to_string(), port);

    let accepted = transport
        .deliver("127.0.0.1", "Z-Report\ncash 10")
        .await
        .expect("delivery should not error");

    assert!(accepted);
    let message = String::from_utf8(received.recv().expect("collector saw the message"))
        .expect("utf-8 message");
    assert_eq!(message, "rest-1234 Z-Report\ncash 10");
}

#[tokio::test]
async fn missing_acknowledgement_token_is_a_rejection() {
    let (port, _received) = spawn_collector(b"NOPE").await;
    let transport = StreamTransport::new("rest-1234".to_string(), port);

    let accepted = transport
        .deliver("127.0.0.1", "Z-Report\ncash 10")
        .await
        .expect("delivery should not error");

    assert!(!accepted);
}

#[tokio::test]
async fn connection_failure_surfaces_as_an_error() {
    // Bind then drop a listener to obtain a port nothing is listening on.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let port = listener.local_addr().expect("local addr").port();
    drop(listener);

    let transport = StreamTransport::new("rest-1234".to_string(), port);

    assert!(transport.deliver("127.0.0.1", "Z-Report\n").await.is_err());
}
