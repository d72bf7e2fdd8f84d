// # Dynette Registrar Client
//
// This crate implements the `Registrar` trait against the Dynette HTTP API
// that delegates subdomains of the dynamic DNS zones.
//
// ## API Reference
//
// - Availability: GET `/test/{domain}` → 200 when the domain is free
// - Registration: POST `/key/{base64(public key)}` with form field
//   `subdomain={domain}` → 201 when created, otherwise a JSON body
//   `{"error": "..."}`
//
// ## Architectural Constraints
//
// - ✅ One HTTP request per call, with an explicit timeout
// - ✅ Non-success answers are returned as `Availability`/`Registration`
//   values; only transport failures are errors
// - ❌ NO retry logic
// - ❌ NO key handling beyond encoding the public half for the URL

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use dyndns_core::traits::{Availability, Registrar, Registration};
use dyndns_core::{Domain, Error, Result};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Default HTTP timeout for registrar requests (30 seconds)
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Message used when the registrar's error body cannot be read
const FALLBACK_ERROR: &str = "Server error";

/// Error body returned by the registrar
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

/// Client for the Dynette registrar API
#[derive(Debug, Clone)]
pub struct DynetteRegistrar {
    /// Registrar host, optionally with a scheme
    host: String,

    /// HTTP client
    client: reqwest::Client,
}

impl DynetteRegistrar {
    /// Create a client for `host` with the given request timeout
    ///
    /// `host` is a bare host name (`dyndns.yunohost.org`), reached over plain
    /// HTTP, or a full `http(s)://` base URL.
    pub fn new(host: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::http(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            host: host.into(),
            client,
        })
    }

    fn base_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("http://{}", host)
        }
    }
}

/// Extract the registrar's explanation from an error body
fn rejection_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|parsed| parsed.error)
        .unwrap_or_else(|_| FALLBACK_ERROR.to_string())
}

#[async_trait::async_trait]
impl Registrar for DynetteRegistrar {
    async fn check_availability(&self, domain: &Domain) -> Result<Availability> {
        let url = format!("{}/test/{}", self.base_url(), domain);
        debug!("Checking availability: GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| Error::http(format!("Request to {} failed: {}", self.host, e)))?;

        let status = response.status().as_u16();
        if status == 200 {
            Ok(Availability::Available)
        } else {
            Ok(Availability::Unavailable { status })
        }
    }

    async fn register_key(&self, domain: &Domain, public_key: &str) -> Result<Registration> {
        let url = format!("{}/key/{}", self.base_url(), BASE64.encode(public_key));
        debug!("Registering key for {} on {}", domain, self.host);

        let response = self
            .client
            .post(&url)
            .form(&[("subdomain", domain.as_str())])
            .send()
            .await
            .map_err(|e| Error::http(format!("Request to {} failed: {}", self.host, e)))?;

        let status = response.status();
        if status.as_u16() == 201 {
            return Ok(Registration::Accepted);
        }

        let body = response.text().await.unwrap_or_default();
        let message = rejection_message(&body);
        warn!("Registrar answered {} for {}: {}", status, domain, message);

        Ok(Registration::Rejected { message })
    }

    fn host(&self) -> &str {
        &self.host
    }
}
