// # HTTP IP Resolver
//
// This crate provides the HTTP "what is my IP" resolver for the dynamic DNS
// system.
//
// ## Architecture
//
// One GET per lookup against a plain-text endpoint (default
// `http://ip.yunohost.org`) whose body is the caller's public address. The
// body is trimmed and validated; anything else is a resolution failure.
//
// - ✅ Explicit request timeout (configurable, default 30 seconds)
// - ❌ NO retry logic (the next scheduled cycle retries)
// - ❌ NO caching (change detection is owned by `UpdateEngine`)

use dyndns_core::traits::IpResolver;
use dyndns_core::{Error, IpAddress, Result};
use std::time::Duration;
use tracing::debug;

/// Default HTTP timeout for lookups (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Resolves the public IP through an HTTP lookup service
#[derive(Debug, Clone)]
pub struct HttpIpResolver {
    /// URL returning the caller's address as plain text
    url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpIpResolver {
    /// Create a resolver for `url` with the given request timeout
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Lookup URL
    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait::async_trait]
impl IpResolver for HttpIpResolver {
    async fn current(&self) -> Result<IpAddress> {
        debug!("Looking up public IP via {}", self.url);

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| Error::ip_resolution(format!("Request to {} failed: {}", self.url, e)))?;

        if !response.status().is_success() {
            return Err(Error::ip_resolution(format!(
                "{} answered {}",
                self.url,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::ip_resolution(format!("Failed to read response: {}", e)))?;

        IpAddress::parse(&body)
            .map_err(|_| Error::ip_resolution(format!("Invalid IP address: '{}'", body.trim())))
    }

    fn resolver_name(&self) -> &'static str {
        "http"
    }
}
