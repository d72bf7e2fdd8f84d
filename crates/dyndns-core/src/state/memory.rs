// # Memory IP Cache
//
// In-memory implementation of IpCache.
//
// Nothing survives a restart, so the first cycle of every process always
// pushes a full update. Useful for tests and for embedding the update cycle
// in a long-running process.

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::Error;
use crate::ip::IpAddress;
use crate::traits::IpCache;

/// In-memory IP cache
///
/// Clones share the same underlying value.
#[derive(Debug, Clone, Default)]
pub struct MemoryIpCache {
    inner: Arc<RwLock<Option<IpAddress>>>,
}

impl MemoryIpCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cache already holding `ip`
    pub fn with_ip(ip: IpAddress) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Some(ip))),
        }
    }
}

#[async_trait]
impl IpCache for MemoryIpCache {
    async fn load(&self) -> Result<IpAddress, Error> {
        let guard = self.inner.read().await;
        Ok(guard.clone().unwrap_or_else(IpAddress::unset))
    }

    async fn store(&self, ip: &IpAddress) -> Result<(), Error> {
        *self.inner.write().await = Some(ip.clone());
        Ok(())
    }

    async fn invalidate(&self) -> Result<(), Error> {
        *self.inner.write().await = None;
        Ok(())
    }
}
