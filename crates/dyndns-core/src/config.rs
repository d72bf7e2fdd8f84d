//! Configuration types for the dynamic DNS system
//!
//! Defaults reproduce the stock deployment layout:
//!
//! | item | default |
//! |---|---|
//! | key directory | `/etc/yunohost/dyndns` |
//! | IP cache | `/etc/yunohost/dyndns/old_ip` |
//! | zone scratch file | `/etc/yunohost/dyndns/zone` |
//! | main domain file | `/etc/yunohost/current_host` |
//! | update server | `dynhost.yunohost.org` |
//! | registrar | `dyndns.yunohost.org` |
//! | IP lookup | `http://ip.yunohost.org` |
//! | cron entry | `/etc/cron.d/yunohost-dyndns` |

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main dyndns configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DyndnsConfig {
    /// Persisted state locations
    #[serde(default)]
    pub paths: PathsConfig,

    /// Update cycle settings
    #[serde(default)]
    pub update: UpdateConfig,

    /// Registrar settings
    #[serde(default)]
    pub subscribe: SubscribeConfig,

    /// Key generation settings
    #[serde(default)]
    pub keys: KeyConfig,

    /// Periodic schedule settings
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl DyndnsConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        self.update.validate()?;
        self.subscribe.validate()?;
        self.keys.validate()?;
        self.schedule.validate()?;
        Ok(())
    }
}

/// Locations of persisted state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    /// Directory holding one `.key`/`.private` pair per domain
    #[serde(default = "default_key_dir")]
    pub key_dir: PathBuf,

    /// File holding the last applied IP
    #[serde(default = "default_ip_cache")]
    pub ip_cache: PathBuf,

    /// Scratch file the update script is written to
    #[serde(default = "default_zone_file")]
    pub zone_file: PathBuf,

    /// File naming the main domain
    #[serde(default = "default_current_host")]
    pub current_host: PathBuf,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            key_dir: default_key_dir(),
            ip_cache: default_ip_cache(),
            zone_file: default_zone_file(),
            current_host: default_current_host(),
        }
    }
}

/// Update cycle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateConfig {
    /// Name server receiving dynamic updates
    #[serde(default = "default_update_host")]
    pub update_host: String,

    /// "What is my IP" endpoint returning the address as plain text
    #[serde(default = "default_ip_service_url")]
    pub ip_service_url: String,

    /// Timeout of the IP lookup request (in seconds)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,

    /// Dynamic update tool
    #[serde(default = "default_nsupdate_path")]
    pub nsupdate_path: PathBuf,
}

impl UpdateConfig {
    /// Validate the update configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.update_host.trim().is_empty() {
            return Err(crate::Error::config("Update host cannot be empty"));
        }
        validate_http_url("IP service URL", &self.ip_service_url)?;
        validate_timeout(self.http_timeout_secs)?;
        Ok(())
    }
}

impl Default for UpdateConfig {
    fn default() -> Self {
        Self {
            update_host: default_update_host(),
            ip_service_url: default_ip_service_url(),
            http_timeout_secs: default_http_timeout_secs(),
            nsupdate_path: default_nsupdate_path(),
        }
    }
}

/// Registrar configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscribeConfig {
    /// Registrar host serving the subscription API
    #[serde(default = "default_registrar_host")]
    pub registrar_host: String,

    /// Timeout of registrar requests (in seconds)
    #[serde(default = "default_http_timeout_secs")]
    pub http_timeout_secs: u64,
}

impl SubscribeConfig {
    /// Validate the registrar configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.registrar_host.trim().is_empty() {
            return Err(crate::Error::config("Registrar host cannot be empty"));
        }
        validate_timeout(self.http_timeout_secs)
    }
}

impl Default for SubscribeConfig {
    fn default() -> Self {
        Self {
            registrar_host: default_registrar_host(),
            http_timeout_secs: default_http_timeout_secs(),
        }
    }
}

/// Key generation configuration
///
/// HMAC-MD5/128 is what the registrar accepts; the values are configurable
/// for deployments whose update server supports stronger TSIG algorithms.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConfig {
    /// Key generation tool
    #[serde(default = "default_keygen_path")]
    pub keygen_path: PathBuf,

    /// Key algorithm passed to the generator
    #[serde(default = "default_key_algorithm")]
    pub algorithm: String,

    /// Key size in bits
    #[serde(default = "default_key_bits")]
    pub bits: u32,
}

impl KeyConfig {
    /// Validate the key configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.algorithm.trim().is_empty() {
            return Err(crate::Error::config("Key algorithm cannot be empty"));
        }
        if self.bits == 0 {
            return Err(crate::Error::config("Key size must be > 0"));
        }
        Ok(())
    }
}

impl Default for KeyConfig {
    fn default() -> Self {
        Self {
            keygen_path: default_keygen_path(),
            algorithm: default_key_algorithm(),
            bits: default_key_bits(),
        }
    }
}

/// Periodic schedule configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// cron.d file owning the entry
    #[serde(default = "default_cron_file")]
    pub cron_file: PathBuf,

    /// Minutes between update cycles
    #[serde(default = "default_interval_minutes")]
    pub interval_minutes: u32,

    /// User the update runs as
    #[serde(default = "default_cron_user")]
    pub user: String,

    /// Command running one update cycle
    #[serde(default = "default_cron_command")]
    pub command: String,
}

impl ScheduleConfig {
    /// Validate the schedule configuration
    pub fn validate(&self) -> Result<(), crate::Error> {
        if !(1..=59).contains(&self.interval_minutes) {
            return Err(crate::Error::config(format!(
                "Schedule interval must be between 1 and 59 minutes. Got: {}",
                self.interval_minutes
            )));
        }
        if self.command.trim().is_empty() {
            return Err(crate::Error::config("Schedule command cannot be empty"));
        }
        Ok(())
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            cron_file: default_cron_file(),
            interval_minutes: default_interval_minutes(),
            user: default_cron_user(),
            command: default_cron_command(),
        }
    }
}

fn validate_http_url(what: &str, url: &str) -> Result<(), crate::Error> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(crate::Error::config(format!(
            "{} must use HTTP or HTTPS scheme. Got: {}",
            what, url
        )));
    }
    Ok(())
}

fn validate_timeout(secs: u64) -> Result<(), crate::Error> {
    if !(1..=300).contains(&secs) {
        return Err(crate::Error::config(format!(
            "HTTP timeout must be between 1 and 300 seconds. Got: {}",
            secs
        )));
    }
    Ok(())
}

fn default_key_dir() -> PathBuf {
    PathBuf::from("/etc/yunohost/dyndns")
}

fn default_ip_cache() -> PathBuf {
    PathBuf::from("/etc/yunohost/dyndns/old_ip")
}

fn default_zone_file() -> PathBuf {
    PathBuf::from("/etc/yunohost/dyndns/zone")
}

fn default_current_host() -> PathBuf {
    PathBuf::from("/etc/yunohost/current_host")
}

fn default_update_host() -> String {
    "dynhost.yunohost.org".to_string()
}

fn default_ip_service_url() -> String {
    "http://ip.yunohost.org".to_string()
}

fn default_http_timeout_secs() -> u64 {
    30
}

fn default_nsupdate_path() -> PathBuf {
    PathBuf::from("/usr/bin/nsupdate")
}

fn default_registrar_host() -> String {
    "dyndns.yunohost.org".to_string()
}

fn default_keygen_path() -> PathBuf {
    PathBuf::from("dnssec-keygen")
}

fn default_key_algorithm() -> String {
    "HMAC-MD5".to_string()
}

fn default_key_bits() -> u32 {
    128
}

fn default_cron_file() -> PathBuf {
    PathBuf::from("/etc/cron.d/yunohost-dyndns")
}

fn default_interval_minutes() -> u32 {
    2
}

fn default_cron_user() -> String {
    "root".to_string()
}

fn default_cron_command() -> String {
    "dyndns update".to_string()
}
