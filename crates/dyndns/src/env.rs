//! Environment overlay for [`DyndnsConfig`]
//!
//! | variable | field |
//! |---|---|
//! | `DYNDNS_KEY_DIR` | `paths.key_dir` |
//! | `DYNDNS_IP_CACHE` | `paths.ip_cache` |
//! | `DYNDNS_ZONE_FILE` | `paths.zone_file` |
//! | `DYNDNS_CURRENT_HOST_FILE` | `paths.current_host` |
//! | `DYNDNS_UPDATE_HOST` | `update.update_host` |
//! | `DYNDNS_IP_SERVICE_URL` | `update.ip_service_url` |
//! | `DYNDNS_NSUPDATE_PATH` | `update.nsupdate_path` |
//! | `DYNDNS_REGISTRAR_HOST` | `subscribe.registrar_host` |
//! | `DYNDNS_HTTP_TIMEOUT_SECS` | `update.http_timeout_secs`, `subscribe.http_timeout_secs` |
//! | `DYNDNS_KEYGEN_PATH` | `keys.keygen_path` |
//! | `DYNDNS_KEY_ALGORITHM` | `keys.algorithm` |
//! | `DYNDNS_KEY_BITS` | `keys.bits` |
//! | `DYNDNS_CRON_FILE` | `schedule.cron_file` |
//! | `DYNDNS_SCHEDULE_INTERVAL` | `schedule.interval_minutes` |
//! | `DYNDNS_SCHEDULE_COMMAND` | `schedule.command` |

use anyhow::{Context, Result};
use dyndns_core::DyndnsConfig;
use std::path::PathBuf;
use std::str::FromStr;

/// Build the configuration from the process environment
pub fn config_from_env() -> Result<DyndnsConfig> {
    config_from_lookup(|name| std::env::var(name).ok())
}

/// Build the configuration from defaults overlaid with `lookup`
pub fn config_from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<DyndnsConfig> {
    let mut config = DyndnsConfig::new();
    let text = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

    if let Some(value) = text("DYNDNS_KEY_DIR") {
        config.paths.key_dir = PathBuf::from(value);
    }
    if let Some(value) = text("DYNDNS_IP_CACHE") {
        config.paths.ip_cache = PathBuf::from(value);
    }
    if let Some(value) = text("DYNDNS_ZONE_FILE") {
        config.paths.zone_file = PathBuf::from(value);
    }
    if let Some(value) = text("DYNDNS_CURRENT_HOST_FILE") {
        config.paths.current_host = PathBuf::from(value);
    }

    if let Some(value) = text("DYNDNS_UPDATE_HOST") {
        config.update.update_host = value;
    }
    if let Some(value) = text("DYNDNS_IP_SERVICE_URL") {
        config.update.ip_service_url = value;
    }
    if let Some(value) = text("DYNDNS_NSUPDATE_PATH") {
        config.update.nsupdate_path = PathBuf::from(value);
    }
    if let Some(value) = text("DYNDNS_REGISTRAR_HOST") {
        config.subscribe.registrar_host = value;
    }
    if let Some(value) = text("DYNDNS_HTTP_TIMEOUT_SECS") {
        let secs = parse("DYNDNS_HTTP_TIMEOUT_SECS", &value)?;
        config.update.http_timeout_secs = secs;
        config.subscribe.http_timeout_secs = secs;
    }

    if let Some(value) = text("DYNDNS_KEYGEN_PATH") {
        config.keys.keygen_path = PathBuf::from(value);
    }
    if let Some(value) = text("DYNDNS_KEY_ALGORITHM") {
        config.keys.algorithm = value;
    }
    if let Some(value) = text("DYNDNS_KEY_BITS") {
        config.keys.bits = parse("DYNDNS_KEY_BITS", &value)?;
    }

    if let Some(value) = text("DYNDNS_CRON_FILE") {
        config.schedule.cron_file = PathBuf::from(value);
    }
    if let Some(value) = text("DYNDNS_SCHEDULE_INTERVAL") {
        config.schedule.interval_minutes = parse("DYNDNS_SCHEDULE_INTERVAL", &value)?;
    }
    if let Some(value) = text("DYNDNS_SCHEDULE_COMMAND") {
        config.schedule.command = value;
    }

    Ok(config)
}

fn parse<T>(name: &str, value: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    value
        .trim()
        .parse()
        .with_context(|| format!("{} must be a number. Got: '{}'", name, value))
}
