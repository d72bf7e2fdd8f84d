// # Registrar Trait
//
// Defines the interface to the dynamic DNS registrar that delegates
// subdomains and records the key allowed to update them.
//
// ## Implementations
//
// - Dynette HTTP API: `dyndns-registrar` crate

use async_trait::async_trait;

use crate::domain::Domain;

/// Answer to an availability query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Availability {
    /// The domain can be subscribed
    Available,
    /// The registrar answered with a non-success status
    Unavailable {
        /// HTTP status returned by the registrar
        status: u16,
    },
}

/// Outcome of a key registration request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Registration {
    /// The registrar created the subdomain with our key
    Accepted,
    /// The registrar refused, with its explanation
    Rejected {
        /// Message returned by the registrar
        message: String,
    },
}

/// Trait for registrar clients
///
/// Implementations translate transport results into the answers below.
/// Transport failures (connection refused, timeout) are errors, not
/// [`Registration::Rejected`].
#[async_trait]
pub trait Registrar: Send + Sync {
    /// Ask whether the domain can be subscribed
    ///
    /// Fails only when the registrar could not be reached.
    async fn check_availability(&self, domain: &Domain) -> Result<Availability, crate::Error>;

    /// Register the public key for the domain
    async fn register_key(
        &self,
        domain: &Domain,
        public_key: &str,
    ) -> Result<Registration, crate::Error>;

    /// Registrar host (for logging/debugging)
    fn host(&self) -> &str;
}
