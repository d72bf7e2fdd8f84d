//! Zone update transactions
//!
//! The [`ZoneBuilder`] turns a (domain, IP) pair into the complete set of
//! dynamic update directives for the host: apex address/mail/SPF records,
//! the XMPP service subdomains and their SRV records.
//!
//! ## Delete-then-add
//!
//! Every record of the fixed set is deleted and re-added on each cycle
//! instead of being updated in place. Deleting a name/type that does not
//! exist is a no-op in the update protocol, so the transaction converges
//! from any prior state (missing records, stale records, a half-applied
//! earlier attempt). Deletes precede adds because directives are applied in
//! order within the single atomic message.
//!
//! ## Text form
//!
//! ```text
//! server dynhost.yunohost.org
//! zone example.org
//! update delete foo.example.org. A
//! ...
//! update add foo.example.org. 1800 A 203.0.113.5
//! ...
//! show
//! send
//! ```

use std::fmt;

use crate::domain::Domain;
use crate::ip::IpAddress;

/// TTL of address records (apex and service subdomains)
pub const ADDRESS_TTL: u32 = 1800;

/// TTL of MX, TXT and SRV records
pub const SERVICE_TTL: u32 = 14400;

/// Preference of the apex MX record
pub const MX_PRIORITY: u16 = 5;

/// SPF policy published in the apex TXT record
pub const SPF_POLICY: &str = "\"v=spf1 a mx -all\"";

/// Subdomains carrying an address record pointing at the host
pub const ADDRESS_SUBDOMAINS: [&str; 3] = ["pubsub", "muc", "vjud"];

/// XMPP SRV records and their ports
pub const SRV_SERVICES: [(&str, u16); 2] = [("_xmpp-client._tcp", 5222), ("_xmpp-server._tcp", 5269)];

const SRV_PRIORITY: u16 = 0;
const SRV_WEIGHT: u16 = 5;

/// A single line of an update script
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Name server that receives the update
    Server(String),
    /// Zone being updated
    Zone(String),
    /// Delete every record of a type at a name
    Delete {
        /// Absolute owner name
        name: String,
        /// Record type
        record_type: &'static str,
    },
    /// Add a record
    Add {
        /// Absolute owner name
        name: String,
        /// Time-to-live in seconds
        ttl: u32,
        /// Record type
        record_type: &'static str,
        /// Record data in presentation format
        data: String,
    },
    /// Print the pending message (kept in tool output for diagnostics)
    Show,
    /// Submit the pending message
    Send,
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Directive::Server(host) => write!(f, "server {}", host),
            Directive::Zone(zone) => write!(f, "zone {}", zone),
            Directive::Delete { name, record_type } => {
                write!(f, "update delete {} {}", name, record_type)
            }
            Directive::Add {
                name,
                ttl,
                record_type,
                data,
            } => write!(f, "update add {} {} {} {}", name, ttl, record_type, data),
            Directive::Show => f.write_str("show"),
            Directive::Send => f.write_str("send"),
        }
    }
}

/// An ordered, write-once update transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneUpdateTransaction {
    directives: Vec<Directive>,
}

impl ZoneUpdateTransaction {
    /// The directives in submission order
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Number of delete directives
    pub fn delete_count(&self) -> usize {
        self.directives
            .iter()
            .filter(|d| matches!(d, Directive::Delete { .. }))
            .count()
    }

    /// Number of add directives
    pub fn add_count(&self) -> usize {
        self.directives
            .iter()
            .filter(|d| matches!(d, Directive::Add { .. }))
            .count()
    }

    /// Render the script read by the update tool, one directive per line
    pub fn to_script(&self) -> String {
        let mut script = String::new();
        for directive in &self.directives {
            script.push_str(&directive.to_string());
            script.push('\n');
        }
        script
    }
}

impl fmt::Display for ZoneUpdateTransaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_script())
    }
}

/// Builds update transactions for a given update server
///
/// `build` is a pure function of its inputs: no I/O, and the same domain and
/// IP always yield the same transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZoneBuilder {
    update_host: String,
}

impl ZoneBuilder {
    /// Create a builder targeting `update_host`
    pub fn new(update_host: impl Into<String>) -> Self {
        Self {
            update_host: update_host.into(),
        }
    }

    /// Update server written in the `server` directive
    pub fn update_host(&self) -> &str {
        &self.update_host
    }

    /// Build the full transaction for `domain` pointing at `ip`
    pub fn build(&self, domain: &Domain, ip: &IpAddress) -> ZoneUpdateTransaction {
        let apex = domain.fqdn();
        let address_type = ip.record_type();

        let mut directives = vec![
            Directive::Server(self.update_host.clone()),
            Directive::Zone(domain.zone().to_string()),
        ];

        // A is always cleared so a move from IPv4 to IPv6 leaves no stale address
        let address_deletes: &[&'static str] = if ip.is_ipv6() { &["A", "AAAA"] } else { &["A"] };

        for &record_type in address_deletes.iter().chain(&["MX", "TXT"]) {
            directives.push(Directive::Delete {
                name: apex.clone(),
                record_type,
            });
        }
        for label in ADDRESS_SUBDOMAINS {
            for &record_type in address_deletes {
                directives.push(Directive::Delete {
                    name: domain.child_fqdn(label),
                    record_type,
                });
            }
        }
        for (service, _) in SRV_SERVICES {
            directives.push(Directive::Delete {
                name: domain.child_fqdn(service),
                record_type: "SRV",
            });
        }

        directives.push(Directive::Add {
            name: apex.clone(),
            ttl: ADDRESS_TTL,
            record_type: address_type,
            data: ip.to_string(),
        });
        directives.push(Directive::Add {
            name: apex.clone(),
            ttl: SERVICE_TTL,
            record_type: "MX",
            data: format!("{} {}", MX_PRIORITY, apex),
        });
        directives.push(Directive::Add {
            name: apex.clone(),
            ttl: SERVICE_TTL,
            record_type: "TXT",
            data: SPF_POLICY.to_string(),
        });
        for label in ADDRESS_SUBDOMAINS {
            directives.push(Directive::Add {
                name: domain.child_fqdn(label),
                ttl: ADDRESS_TTL,
                record_type: address_type,
                data: ip.to_string(),
            });
        }
        for (service, port) in SRV_SERVICES {
            directives.push(Directive::Add {
                name: domain.child_fqdn(service),
                ttl: SERVICE_TTL,
                record_type: "SRV",
                data: format!("{} {} {} {}", SRV_PRIORITY, SRV_WEIGHT, port, apex),
            });
        }

        directives.push(Directive::Show);
        directives.push(Directive::Send);

        ZoneUpdateTransaction { directives }
    }
}
