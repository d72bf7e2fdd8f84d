// # Key Store Trait
//
// Defines the interface for the TSIG key material that authenticates zone
// updates for a domain.
//
// ## Implementations
//
// - BIND key directory populated by `dnssec-keygen`: `dyndns-bind` crate

use async_trait::async_trait;
use std::fmt;
use std::path::PathBuf;

use crate::domain::Domain;

/// Key material for one domain
///
/// The `.key` file holds the key record registered with the registrar; the
/// `.private` file is handed to the update tool for signing.
///
/// # Security
///
/// The Debug implementation intentionally does NOT expose the key secret.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyMaterial {
    /// Domain the key is scoped to
    pub domain: Domain,
    /// Path of the key record file (`K<domain>.+157+<id>.key`)
    pub key_file: PathBuf,
    /// Path of the private key file (`K<domain>.+157+<id>.private`)
    pub private_file: PathBuf,
    /// Public half as published to the registrar
    /// ⚠️ NEVER log this value
    pub public_key: String,
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("domain", &self.domain)
            .field("key_file", &self.key_file)
            .field("private_file", &self.private_file)
            .field("public_key", &"<REDACTED>")
            .finish()
    }
}

/// Trait for key store implementations
#[async_trait]
pub trait KeyStore: Send + Sync {
    /// Whether key material exists for the domain
    async fn exists(&self, domain: &Domain) -> Result<bool, crate::Error>;

    /// Load existing key material
    ///
    /// # Returns
    ///
    /// - `Ok(Some(KeyMaterial))`: Key found
    /// - `Ok(None)`: No key stored for the domain
    /// - `Err(Error)`: Storage error or unreadable key file
    async fn load(&self, domain: &Domain) -> Result<Option<KeyMaterial>, crate::Error>;

    /// Load the domain's key, generating one first if none exists
    ///
    /// # Returns
    ///
    /// - `Ok(KeyMaterial)`: Existing or freshly generated key
    /// - `Err(Error::KeyGeneration)`: The generator failed or produced no key
    async fn get_or_create(&self, domain: &Domain) -> Result<KeyMaterial, crate::Error>;
}
