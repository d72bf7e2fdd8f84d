//! Error types for the dynamic DNS system
//!
//! Every failure the core can surface is a distinct variant so the caller
//! (an operator at a terminal, or the periodic scheduler) can tell a refused
//! registration from a rejected zone update without parsing messages.

use thiserror::Error;

/// Result type alias for dyndns operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the dynamic DNS system
#[derive(Error, Debug)]
pub enum Error {
    /// The domain name is malformed or has fewer than two labels
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),

    /// The registrar did not confirm the domain is available
    #[error("Domain {domain} is not available on the registrar (status {status})")]
    DomainUnavailable {
        /// Domain that was checked
        domain: String,
        /// HTTP status returned by the registrar
        status: u16,
    },

    /// The key generation tool failed or produced no key
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// No key material is stored for the domain
    #[error("No DNS key found for {0}")]
    KeyNotFound(String),

    /// The registrar refused the key registration
    #[error("Registration of {domain} rejected: {message}")]
    RegistrationRejected {
        /// Domain being registered
        domain: String,
        /// Message returned by the registrar
        message: String,
    },

    /// The current public IP could not be determined
    #[error("IP resolution failed: {0}")]
    IpResolution(String),

    /// The dynamic update tool refused the transaction
    #[error("DNS update rejected (exit status {}): {stderr}", display_status(.status))]
    UpdateRejected {
        /// Exit status of the update tool, `None` if it was killed or never ran
        status: Option<i32>,
        /// Captured standard error of the update tool
        stderr: String,
    },

    /// The periodic update schedule could not be installed
    #[error("Failed to install update schedule: {0}")]
    ScheduleInstall(String),

    /// The periodic update schedule could not be removed
    #[error("Failed to remove update schedule: {0}")]
    ScheduleRemove(String),

    /// IP cache errors
    #[error("IP cache error: {0}")]
    IpCache(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// HTTP client errors
    #[error("HTTP error: {0}")]
    Http(String),

    /// Filesystem and process I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error with context
    #[error("{0}")]
    Other(String),
}

fn display_status(status: &Option<i32>) -> String {
    match status {
        Some(code) => code.to_string(),
        None => "none".to_string(),
    }
}

impl Error {
    /// Create an invalid domain error
    pub fn invalid_domain(msg: impl Into<String>) -> Self {
        Self::InvalidDomain(msg.into())
    }

    /// Create a domain unavailable error
    pub fn domain_unavailable(domain: impl Into<String>, status: u16) -> Self {
        Self::DomainUnavailable {
            domain: domain.into(),
            status,
        }
    }

    /// Create a key generation error
    pub fn key_generation(msg: impl Into<String>) -> Self {
        Self::KeyGeneration(msg.into())
    }

    /// Create a key not found error
    pub fn key_not_found(domain: impl Into<String>) -> Self {
        Self::KeyNotFound(domain.into())
    }

    /// Create a registration rejected error
    pub fn registration_rejected(domain: impl Into<String>, message: impl Into<String>) -> Self {
        Self::RegistrationRejected {
            domain: domain.into(),
            message: message.into(),
        }
    }

    /// Create an IP resolution error
    pub fn ip_resolution(msg: impl Into<String>) -> Self {
        Self::IpResolution(msg.into())
    }

    /// Create an update rejected error
    pub fn update_rejected(status: Option<i32>, stderr: impl Into<String>) -> Self {
        Self::UpdateRejected {
            status,
            stderr: stderr.into(),
        }
    }

    /// Create a schedule install error
    pub fn schedule_install(msg: impl Into<String>) -> Self {
        Self::ScheduleInstall(msg.into())
    }

    /// Create a schedule removal error
    pub fn schedule_remove(msg: impl Into<String>) -> Self {
        Self::ScheduleRemove(msg.into())
    }

    /// Create an IP cache error
    pub fn ip_cache(msg: impl Into<String>) -> Self {
        Self::IpCache(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create an HTTP error
    pub fn http(msg: impl Into<String>) -> Self {
        Self::Http(msg.into())
    }
}

/// Helper for converting anyhow::Error to our Error type
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Self::Other(err.to_string())
    }
}
