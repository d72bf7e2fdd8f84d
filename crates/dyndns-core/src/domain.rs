//! Fully-qualified domain names managed by the dynamic DNS registrar
//!
//! A [`Domain`] such as `foo.nohost.me` splits into a host label (`foo`) and
//! the zone the registrar is authoritative for (`nohost.me`).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// RFC 1035 total length limit
const MAX_DOMAIN_LEN: usize = 253;

/// RFC 1035 label length limit
const MAX_LABEL_LEN: usize = 63;

/// A validated domain name with at least two labels
///
/// The trailing root dot is stripped on parse; [`Domain::fqdn`] adds it back
/// where the update protocol needs an absolute name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Domain(String);

impl Domain {
    /// Parse and validate a domain name
    pub fn parse(input: &str) -> Result<Self> {
        let name = input.trim();
        let name = name.strip_suffix('.').unwrap_or(name);

        if name.is_empty() {
            return Err(Error::invalid_domain("domain name cannot be empty"));
        }

        if name.len() > MAX_DOMAIN_LEN {
            return Err(Error::invalid_domain(format!(
                "{} is {} chars long (max {})",
                name,
                name.len(),
                MAX_DOMAIN_LEN
            )));
        }

        let mut labels = 0;
        for label in name.split('.') {
            validate_label(name, label)?;
            labels += 1;
        }

        if labels < 2 {
            return Err(Error::invalid_domain(format!(
                "{} must have at least two labels",
                name
            )));
        }

        Ok(Self(name.to_ascii_lowercase()))
    }

    /// The domain name without trailing dot
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The absolute form with trailing dot, e.g. `foo.nohost.me.`
    pub fn fqdn(&self) -> String {
        format!("{}.", self.0)
    }

    /// The leftmost label, e.g. `foo` for `foo.nohost.me`
    pub fn host_label(&self) -> &str {
        self.split().0
    }

    /// All labels after the first, e.g. `nohost.me` for `foo.nohost.me`
    pub fn zone(&self) -> &str {
        self.split().1
    }

    /// Absolute name of a record below this domain, e.g. `muc.foo.nohost.me.`
    pub fn child_fqdn(&self, label: &str) -> String {
        format!("{}.{}.", label, self.0)
    }

    fn split(&self) -> (&str, &str) {
        // parse() guarantees at least one dot
        self.0.split_once(".").unwrap_or((self.0.as_str(), ""))
    }
}

fn validate_label(name: &str, label: &str) -> Result<()> {
    if label.is_empty() {
        return Err(Error::invalid_domain(format!("{} has an empty label", name)));
    }

    if label.len() > MAX_LABEL_LEN {
        return Err(Error::invalid_domain(format!(
            "label '{}' is {} chars long (max {})",
            label,
            label.len(),
            MAX_LABEL_LEN
        )));
    }

    if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(Error::invalid_domain(format!(
            "label '{}' contains invalid characters",
            label
        )));
    }

    if label.starts_with('-') || label.ends_with('-') {
        return Err(Error::invalid_domain(format!(
            "label '{}' cannot start or end with a hyphen",
            label
        )));
    }

    Ok(())
}

impl FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Domain {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.0
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
