//! Pluggable delivery mechanisms for handing staged payloads to the
//! collector.
//!
//! Two interchangeable variants, selected by configuration: a JSON
//! request/response call against the collector's HTTP endpoint, and a raw
//! byte-stream socket protocol. Neither retries internally and neither keeps
//! state on failure; retry is the delivery loop's responsibility.

use async_trait::async_trait;
use mockall::automock;
use serde::Serialize;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tracing::{debug, info, warn};

pub type TransportError = Box<dyn std::error::Error + Send + Sync>;

/// Delivers one staged payload to the collector at `target`.
///
/// `Ok(true)` means the collector accepted the payload, `Ok(false)` means it
/// answered but rejected it; a transport-level error surfaces as `Err`. The
/// caller treats the last two the same: the item stays queued.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait Transport: Send + Sync {
    async fn deliver(&self, target: &str, payload: &str) -> Result<bool, TransportError>;
}

#[derive(Serialize)]
struct SendReportRequest<'a> {
    rest_id: &'a str,
    rep_title: &'a str,
    rep_text: &'a str,
}

/// Request/response variant: `POST {target}/send_rep` with a JSON body.
/// The payload's first line becomes the report title, the remainder the
/// report text.
pub struct HttpTransport {
    client: reqwest::Client,
    rest_id: String,
}

impl HttpTransport {
    pub fn new(rest_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            rest_id,
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn deliver(&self, target: &str, payload: &str) -> Result<bool, TransportError> {
        let base = if target.starts_with("http://") || target.starts_with("https://") {
            target.to_string()
        } else {
            format!("http://{target}")
        };
        let url = format!("{}/send_rep", base.trim_end_matches('/'));

        let (title, body) = match payload.split_once('\n') {
            Some((title, body)) => (title, body),
            None => (payload, ""),
        };
        let request = SendReportRequest {
            rest_id: &self.rest_id,
            rep_title: title,
            rep_text: body,
        };

        info!(url = %url, title = %title, "Posting report to collector");
        let response = self.client.post(&url).json(&request).send().await?;
        let status = response.status();
        let response_text = response.text().await.unwrap_or_default();
        if status.is_success() {
            debug!(%status, body = %response_text.trim(), "Collector accepted report");
            Ok(true)
        } else {
            warn!(%status, body = %response_text.trim(), "Collector rejected report");
            Ok(false)
        }
    }
}

/// Bytes read back from the collector for the acknowledgement.
const ACK_BUFFER_SIZE: usize = 128;
/// Token the collector's response must contain for the delivery to count.
const ACK_TOKEN: &str = "OK";

/// Stream variant: connect to `{target}:{port}`, write the UTF-8 message
/// with the account id prefixed to the title line, half-close, then read a
/// bounded response and look for the acknowledgement token.
pub struct StreamTransport {
    rest_id: String,
    port: u16,
}

impl StreamTransport {
    pub fn new(rest_id: String, port: u16) -> Self {
        Self { rest_id, port }
    }
}

#[async_trait]
impl Transport for StreamTransport {
    async fn deliver(&self, target: &str, payload: &str) -> Result<bool, TransportError> {
        let addr = format!("{}:{}", target, self.port);
        info!(addr = %addr, "Streaming report to collector");

        let mut stream = TcpStream::connect(&addr).await?;
        let message = format!("{} {}", self.rest_id, payload);
        stream.write_all(message.as_bytes()).await?;
        // Half-close so the collector sees the end of the message and can
        // answer; the read side stays open for the acknowledgement.
        stream.shutdown().await?;

        let mut buf = vec![0u8; ACK_BUFFER_SIZE];
        let n = stream.read(&mut buf).await?;
        let reply = String::from_utf8_lossy(&buf[..n]);
        debug!(addr = %addr, reply = %reply.trim(), "Collector stream response");
        if reply.contains(ACK_TOKEN) {
            Ok(true)
        } else {
            warn!(addr = %addr, reply = %reply.trim(), "No acknowledgement token in response");
            Ok(false)
        }
    }
}
