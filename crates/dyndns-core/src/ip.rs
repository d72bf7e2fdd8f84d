//! Public IP addresses as seen by the update cycle
//!
//! Addresses are kept as the exact text they were read from (resolver
//! response, cache file, command line) and compared byte for byte. Parsing
//! only checks the format.

use std::fmt;
use std::net::IpAddr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Text of the sentinel stored when no IP has been applied yet
pub const UNSET_IP: &str = "0.0.0.0";

/// An IP address in its textual form
///
/// Equality is textual: `IpAddress::parse("::1")` and a cache holding
/// `0:0:0:0:0:0:0:1` are considered different, which only costs one extra
/// (idempotent) update.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IpAddress(String);

impl IpAddress {
    /// Parse an address, rejecting anything that is not a specified IPv4/IPv6
    /// address
    ///
    /// The unspecified address is refused so that no real address can ever be
    /// mistaken for [`IpAddress::unset`].
    pub fn parse(input: &str) -> Result<Self> {
        let text = input.trim();
        let addr: IpAddr = text
            .parse()
            .map_err(|_| Error::invalid_input(format!("not an IP address: '{}'", text)))?;

        if addr.is_unspecified() {
            return Err(Error::invalid_input(format!(
                "unspecified address '{}' cannot be published",
                text
            )));
        }

        Ok(Self(text.to_string()))
    }

    /// The sentinel standing for "nothing applied yet"
    pub fn unset() -> Self {
        Self(UNSET_IP.to_string())
    }

    /// Whether this is the [`IpAddress::unset`] sentinel
    pub fn is_unset(&self) -> bool {
        self.0 == UNSET_IP
    }

    /// Whether the address is IPv6 (published as AAAA)
    pub fn is_ipv6(&self) -> bool {
        self.0.contains(':')
    }

    /// Address record type carrying this address
    pub fn record_type(&self) -> &'static str {
        if self.is_ipv6() { "AAAA" } else { "A" }
    }

    /// The address text
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Restore a value read back from storage without re-validating it
    pub(crate) fn from_stored(text: &str) -> Self {
        Self(text.trim().to_string())
    }
}

impl FromStr for IpAddress {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<IpAddr> for IpAddress {
    fn from(addr: IpAddr) -> Self {
        Self(addr.to_string())
    }
}

impl fmt::Display for IpAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
