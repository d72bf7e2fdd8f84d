// # IP Resolver Trait
//
// Defines the interface for determining the host's current public IP.
//
// ## Implementations
//
// - HTTP "what is my IP" service: `dyndns-ip-http` crate
//
// ## Usage
//
// ```rust,ignore
// use dyndns_core::IpResolver;
//
// #[tokio::main]
// async fn main() -> anyhow::Result<()> {
//     let resolver = /* IpResolver implementation */;
//
//     // Operator-supplied address wins, no lookup is made
//     let ip = resolver.resolve(Some("203.0.113.5")).await?;
//
//     // Otherwise ask the lookup service
//     let ip = resolver.resolve(None).await?;
//
//     Ok(())
// }
// ```

use async_trait::async_trait;

use crate::ip::IpAddress;

/// Trait for IP resolver implementations
///
/// # Trust Level: Semi-Trusted
///
/// Resolvers may perform network I/O to their lookup endpoint only.
///
/// ## Forbidden Capabilities
/// - ❌ Retry on failure (the next scheduled cycle is the retry)
/// - ❌ Access the IP cache (owned by `UpdateEngine`)
/// - ❌ Decide whether DNS needs updating
#[async_trait]
pub trait IpResolver: Send + Sync {
    /// Look up the current public IP
    ///
    /// Must perform a single request and return the trimmed response as an
    /// address.
    ///
    /// # Returns
    ///
    /// - `Ok(IpAddress)`: The current public IP
    /// - `Err(Error::IpResolution)`: Network failure, timeout, non-2xx status
    ///   or a body that is not an address
    async fn current(&self) -> Result<IpAddress, crate::Error>;

    /// Resolve the IP to publish
    ///
    /// An explicitly supplied address is returned as given (after a format
    /// check) without any network access.
    async fn resolve(&self, explicit_ip: Option<&str>) -> Result<IpAddress, crate::Error> {
        match explicit_ip {
            Some(ip) => IpAddress::parse(ip),
            None => self.current().await,
        }
    }

    /// Name of the resolver (for logging/debugging)
    fn resolver_name(&self) -> &'static str;
}
