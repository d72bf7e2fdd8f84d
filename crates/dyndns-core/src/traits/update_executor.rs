// # Update Executor Trait
//
// Defines the interface for committing a zone update transaction to the
// DNS infrastructure.
//
// ## Implementations
//
// - `nsupdate` with a TSIG private key: `dyndns-bind` crate

use async_trait::async_trait;
use std::path::Path;

use crate::zone::ZoneUpdateTransaction;

/// Trait for update executor implementations
///
/// # Trust Level: Untrusted
///
/// ## Allowed Capabilities
/// - ✅ Write its scratch file and run its update tool
/// - ✅ Return success or failure
///
/// ## Forbidden Capabilities
/// - ❌ Retry (the next scheduled cycle is the retry)
/// - ❌ Access the IP cache (owned by `UpdateEngine`, which invalidates it
///   when `apply` fails)
/// - ❌ Modify the transaction
///
/// The transaction is all-or-nothing: the update tool submits it as one
/// atomic message, so a failure means nothing was applied.
#[async_trait]
pub trait UpdateExecutor: Send + Sync {
    /// Apply a transaction, signing it with the given private key file
    ///
    /// # Returns
    ///
    /// - `Ok(())`: The update tool reported success
    /// - `Err(Error::UpdateRejected)`: Non-zero exit, carrying status and stderr
    async fn apply(
        &self,
        transaction: &ZoneUpdateTransaction,
        private_key: &Path,
    ) -> Result<(), crate::Error>;

    /// Name of the executor (for logging/debugging)
    fn executor_name(&self) -> &'static str;
}
