// # IP Cache Trait
//
// Defines the interface for remembering the last IP that was successfully
// committed to DNS.
//
// ## Purpose
//
// The cache is the only change detector: an update transaction is built only
// when the resolved IP differs from the cached one. A failed update removes
// the cached value so the next cycle retries unconditionally.
//
// ## Implementations
//
// - File-based: single-line `old_ip` file (`FileIpCache`)
// - In-memory: `MemoryIpCache` (tests, embedding)

use async_trait::async_trait;

use crate::ip::IpAddress;

/// Trait for IP cache implementations
///
/// # Trust Level: Trusted (Core Component)
///
/// ## Allowed Capabilities
/// - ✅ Perform I/O on its own storage location
///
/// ## Forbidden Capabilities
/// - ❌ Perform DNS updates (owned by `UpdateExecutor`)
/// - ❌ Decide when to update (owned by `UpdateEngine`)
#[async_trait]
pub trait IpCache: Send + Sync {
    /// Load the last applied IP
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddress)`: The cached IP, or [`IpAddress::unset`] when nothing
    ///   is cached (not an error)
    /// - `Err(Error)`: Storage error
    async fn load(&self) -> Result<IpAddress, crate::Error>;

    /// Replace the cached IP
    ///
    /// Must be atomic: a reader sees either the old or the new value.
    async fn store(&self, ip: &IpAddress) -> Result<(), crate::Error>;

    /// Forget the cached IP
    ///
    /// Forgetting an absent value succeeds.
    async fn invalidate(&self) -> Result<(), crate::Error>;
}
