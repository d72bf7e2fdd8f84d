// # BIND Tool Integrations
//
// This crate connects the dynamic DNS core to the BIND command line tools:
//
// - [`NsupdateExecutor`]: `UpdateExecutor` that submits a zone transaction
//   with `nsupdate -k <private-key> <zone-file>`
// - [`DnssecKeyStore`]: `KeyStore` over a key directory populated by
//   `dnssec-keygen`
//
// ## Architectural Constraints
//
// ### Trust Level: Untrusted (tool integration)
//
// **Allowed Capabilities**:
// - ✅ Write the zone scratch file and the key directory
// - ✅ Run their tool once per call, through the injected `CommandRunner`
// - ✅ Parse tool output and key files
//
// **Forbidden Capabilities**:
// - ❌ Retry a failed tool run (the next scheduled cycle is the retry)
// - ❌ Touch the IP cache (owned by `UpdateEngine`)
// - ❌ Use a shell (arguments are always passed as a vector)
//
// ## Security Requirements
//
// - Key secrets NEVER appear in logs or `Debug` output
// - Generated key files are restricted to owner-only access (0600)

mod keys;
mod nsupdate;

pub use keys::DnssecKeyStore;
pub use nsupdate::NsupdateExecutor;
