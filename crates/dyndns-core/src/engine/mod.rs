//! Update engine
//!
//! The UpdateEngine runs one update cycle:
//! - Resolving the current public IP via IpResolver
//! - Comparing it with the last applied IP from IpCache
//! - Building the zone transaction via ZoneBuilder
//! - Applying it via UpdateExecutor with the domain's key
//! - Advancing (or invalidating) IpCache according to the result
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐      ┌──────────────┐
//! │ IpResolver  │─ip──▶│ UpdateEngine │◀──last ip── IpCache
//! └─────────────┘      └──────────────┘
//!                             │
//!              ┌──────────────┼──────────────┐
//!              ▼              ▼              ▼
//!       ┌─────────────┐ ┌────────────┐ ┌────────────────┐
//!       │ ZoneBuilder │ │  KeyStore  │ │ UpdateExecutor │
//!       │  (build)    │ │ (private)  │ │    (apply)     │
//!       └─────────────┘ └────────────┘ └────────────────┘
//! ```
//!
//! ## Failure Handling
//!
//! There are no retries inside a cycle. When the executor fails, the cached
//! IP is removed so the next scheduled cycle sees a change and resubmits the
//! whole transaction.

use std::path::PathBuf;
use tracing::{debug, error, info};

use crate::domain::Domain;
use crate::error::{Error, Result};
use crate::ip::IpAddress;
use crate::traits::{IpCache, IpResolver, KeyStore, UpdateExecutor};
use crate::zone::ZoneBuilder;

/// Parameters of one update cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRequest {
    /// Domain whose records are rebuilt
    pub domain: Domain,
    /// Address to publish instead of looking it up
    pub ip: Option<String>,
    /// Private key file to sign with instead of the key store's
    pub private_key: Option<PathBuf>,
}

impl UpdateRequest {
    /// Request an update of `domain` with a looked-up IP and stored key
    pub fn new(domain: Domain) -> Self {
        Self {
            domain,
            ip: None,
            private_key: None,
        }
    }

    /// Publish `ip` instead of looking it up
    pub fn with_ip(mut self, ip: impl Into<String>) -> Self {
        self.ip = Some(ip.into());
        self
    }

    /// Sign with `path` instead of the stored key
    pub fn with_private_key(mut self, path: impl Into<PathBuf>) -> Self {
        self.private_key = Some(path.into());
        self
    }
}

/// Result of an update cycle
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The resolved IP matches the last applied one; DNS was not touched
    Unchanged {
        /// The current IP
        current: IpAddress,
    },
    /// The zone transaction was accepted and the cache advanced
    Updated {
        /// The previously applied IP, `None` if nothing was cached
        previous: Option<IpAddress>,
        /// The newly applied IP
        current: IpAddress,
    },
}

/// Core update engine
///
/// Each cycle is independent; the engine keeps no state between calls other
/// than what the IpCache persists.
pub struct UpdateEngine {
    /// Source of the current public IP
    resolver: Box<dyn IpResolver>,

    /// Last applied IP
    cache: Box<dyn IpCache>,

    /// Key material lookup
    key_store: Box<dyn KeyStore>,

    /// Transaction submission
    executor: Box<dyn UpdateExecutor>,

    /// Transaction construction
    builder: ZoneBuilder,
}

impl UpdateEngine {
    /// Create a new update engine
    pub fn new(
        resolver: Box<dyn IpResolver>,
        cache: Box<dyn IpCache>,
        key_store: Box<dyn KeyStore>,
        executor: Box<dyn UpdateExecutor>,
        builder: ZoneBuilder,
    ) -> Self {
        Self {
            resolver,
            cache,
            key_store,
            executor,
            builder,
        }
    }

    /// Run one update cycle
    ///
    /// # Returns
    ///
    /// - `Ok(UpdateOutcome::Unchanged)`: Nothing to do
    /// - `Ok(UpdateOutcome::Updated)`: DNS rebuilt and cache advanced
    /// - `Err(Error::IpResolution)`: Current IP unknown, nothing touched
    /// - `Err(Error::KeyNotFound)`: No key to sign with, nothing touched
    /// - `Err(Error::UpdateRejected)`: Transaction refused, cache invalidated
    /// - `Err(Error::Io)`: Transaction not sent (local fault), cache invalidated
    pub async fn run_once(&self, request: &UpdateRequest) -> Result<UpdateOutcome> {
        let current = self.resolver.resolve(request.ip.as_deref()).await?;
        debug!(
            "Current IP for {} is {} (via {})",
            request.domain,
            current,
            if request.ip.is_some() {
                "command line"
            } else {
                self.resolver.resolver_name()
            }
        );

        let previous = self.cache.load().await?;
        if previous == current {
            debug!("IP {} already applied for {}, skipping update", current, request.domain);
            return Ok(UpdateOutcome::Unchanged { current });
        }

        info!("IP change detected for {}: {} -> {}", request.domain, previous, current);

        let transaction = self.builder.build(&request.domain, &current);
        let private_key = self.private_key(request).await?;

        if let Err(e) = self.executor.apply(&transaction, &private_key).await {
            error!(
                "Update of {} via {} failed: {}",
                request.domain,
                self.executor.executor_name(),
                e
            );
            if let Err(cache_err) = self.cache.invalidate().await {
                error!("Failed to invalidate cached IP: {}", cache_err);
            }
            return Err(e);
        }

        self.cache.store(&current).await?;
        info!("Updated {} -> {}", request.domain, current);

        Ok(UpdateOutcome::Updated {
            previous: (!previous.is_unset()).then_some(previous),
            current,
        })
    }

    async fn private_key(&self, request: &UpdateRequest) -> Result<PathBuf> {
        if let Some(path) = &request.private_key {
            return Ok(path.clone());
        }

        self.key_store
            .load(&request.domain)
            .await?
            .map(|key| key.private_file)
            .ok_or_else(|| Error::key_not_found(request.domain.as_str()))
    }
}
