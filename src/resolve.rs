//! Delivery-target resolution with fallback.

use async_trait::async_trait;
use mockall::automock;
use tracing::warn;

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_10_1) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/39.0.2171.95 Safari/537.36";

/// Supplies the current delivery target.
///
/// Resolution failure is absorbed inside the implementation: it falls back
/// to a configured default address and never errors past this boundary. The
/// target is recomputed on every call, never cached.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait AddressResolver: Send + Sync {
    async fn resolve(&self) -> String;
}

/// Accepts a discovery response only if, after trimming, it is a single line
/// with exactly four dot-separated components (IPv4-shaped).
pub fn accept_candidate(body: &str) -> Option<String> {
    let candidate = body.trim();
    if candidate.is_empty()
        || candidate.lines().count() != 1
        || candidate.split('.').count() != 4
    {
        return None;
    }
    Some(candidate.to_string())
}

/// Resolver backed by a discovery endpoint queried over HTTP.
pub struct HttpAddressResolver {
    client: reqwest::Client,
    discovery_url: String,
    default_addr: String,
}

impl HttpAddressResolver {
    pub fn new(discovery_url: String, default_addr: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            discovery_url,
            default_addr,
        }
    }
}

#[async_trait]
impl AddressResolver for HttpAddressResolver {
    async fn resolve(&self) -> String {
        let response = match self
            .client
            .get(&self.discovery_url)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    error = %e,
                    url = %self.discovery_url,
                    fallback = %self.default_addr,
                    "Discovery request failed, using default address"
                );
                return self.default_addr.clone();
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!(
                %status,
                url = %self.discovery_url,
                fallback = %self.default_addr,
                "Discovery returned non-success status, using default address"
            );
            return self.default_addr.clone();
        }

        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                warn!(
                    error = %e,
                    url = %self.discovery_url,
                    fallback = %self.default_addr,
                    "Failed to read discovery response, using default address"
                );
                return self.default_addr.clone();
            }
        };

        match accept_candidate(&body) {
            Some(addr) => addr,
            None => {
                warn!(
                    body = %body.trim(),
                    fallback = %self.default_addr,
                    "Discovery returned a malformed address, using default address"
                );
                self.default_addr.clone()
            }
        }
    }
}
