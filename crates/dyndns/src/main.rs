// # dyndns - Dynamic DNS command line
//
// This binary is a THIN integration layer: it reads configuration, wires the
// concrete components into `dyndns-core` and renders the outcome. All
// subscription and update logic lives in `dyndns-core`.
//
// ## Commands
//
// - `dyndns subscribe [--subscribe-host H] [--domain D] [--key PUBKEY]`
//   Register the domain with the registrar and install the periodic update
// - `dyndns update [--dyn-host H] [--domain D] [--key PRIVATE] [--ip IP]`
//   Run one update cycle (this is what the periodic entry runs)
// - `dyndns installcron` / `dyndns removecron`
//   Manage the periodic update entry
//
// Without `--domain`, the main domain is read from the `current_host` file.
//
// ## Configuration
//
// Defaults reproduce the stock layout under `/etc/yunohost`; `DYNDNS_*`
// environment variables override them (see `env.rs`), and command flags
// override both for a single invocation.
//
// - `DYNDNS_LOG_LEVEL`: trace, debug, info, warn, error (default: info)
//
// ## Exit codes
//
// - 0: Success (including "IP unchanged")
// - 1: Configuration error
// - 2: Runtime error (registrar, key generation, lookup, update, schedule)

mod env;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dyndns_bind::{DnssecKeyStore, NsupdateExecutor};
use dyndns_core::state::read_current_host;
use dyndns_core::traits::Scheduler;
use dyndns_core::{
    CronFileScheduler, Domain, DyndnsConfig, FileIpCache, SubscriptionClient, UpdateEngine,
    UpdateOutcome, UpdateRequest, ZoneBuilder,
};
use dyndns_ip_http::HttpIpResolver;
use dyndns_registrar::DynetteRegistrar;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing::{Level, debug, error, info};
use tracing_subscriber::FmtSubscriber;

/// Exit codes for the different termination scenarios
#[derive(Debug, Clone, Copy)]
enum DyndnsExitCode {
    /// Command completed
    Success = 0,
    /// Configuration error
    ConfigError = 1,
    /// Runtime error
    RuntimeError = 2,
}

impl From<DyndnsExitCode> for ExitCode {
    fn from(code: DyndnsExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

#[derive(Debug, Parser)]
#[command(name = "dyndns", version, about = "Subscribe to and update a dynamic DNS domain")]
struct Cli {
    /// Log verbosity (trace, debug, info, warn, error)
    #[arg(long, global = true, env = "DYNDNS_LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Subscribe to the dynamic DNS service
    Subscribe {
        /// Registrar host
        #[arg(long)]
        subscribe_host: Option<String>,

        /// Domain to subscribe (default: main domain)
        #[arg(short, long)]
        domain: Option<String>,

        /// Public DNS key to register instead of a generated one
        #[arg(short, long)]
        key: Option<String>,
    },

    /// Update the IP on the dynamic DNS service
    Update {
        /// Name server receiving the update
        #[arg(long)]
        dyn_host: Option<String>,

        /// Domain to update (default: main domain)
        #[arg(short, long)]
        domain: Option<String>,

        /// Private key file to sign the update with
        #[arg(short, long)]
        key: Option<PathBuf>,

        /// IP address to publish instead of looking it up
        #[arg(short, long)]
        ip: Option<String>,
    },

    /// Install the periodic update entry
    Installcron,

    /// Remove the periodic update entry
    Removecron,
}

fn parse_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!(
            "DYNDNS_LOG_LEVEL '{}' is not valid. \
            Valid levels: trace, debug, info, warn, error",
            level
        ),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let log_level = match parse_level(&cli.log_level) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return DyndnsExitCode::ConfigError.into();
        }
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return DyndnsExitCode::ConfigError.into();
    }

    let config = match env::config_from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Configuration error: {:#}", e);
            return DyndnsExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        error!("Configuration validation error: {}", e);
        return DyndnsExitCode::ConfigError.into();
    }

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return DyndnsExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        match run(cli.command, config).await {
            Ok(()) => DyndnsExitCode::Success,
            Err(e) => {
                error!("{:#}", e);
                DyndnsExitCode::RuntimeError
            }
        }
    });

    result.into()
}

async fn run(command: Command, config: DyndnsConfig) -> Result<()> {
    match command {
        Command::Subscribe {
            subscribe_host,
            domain,
            key,
        } => subscribe(&config, subscribe_host, domain, key).await,
        Command::Update {
            dyn_host,
            domain,
            key,
            ip,
        } => update(&config, dyn_host, domain, key, ip).await,
        Command::Installcron => {
            CronFileScheduler::new(&config.schedule).install().await?;
            println!("Periodic DNS update installed");
            Ok(())
        }
        Command::Removecron => {
            CronFileScheduler::new(&config.schedule).remove().await?;
            println!("Periodic DNS update removed");
            Ok(())
        }
    }
}

/// Use the given domain, or the main domain from `current_host`
async fn target_domain(config: &DyndnsConfig, domain: Option<String>) -> Result<Domain> {
    match domain {
        Some(domain) => Ok(Domain::parse(&domain)?),
        None => {
            let domain = read_current_host(&config.paths.current_host).await?;
            debug!(
                "Using main domain {} from {}",
                domain,
                config.paths.current_host.display()
            );
            Ok(domain)
        }
    }
}

async fn subscribe(
    config: &DyndnsConfig,
    subscribe_host: Option<String>,
    domain: Option<String>,
    key: Option<String>,
) -> Result<()> {
    let domain = target_domain(config, domain).await?;
    let host = subscribe_host.unwrap_or_else(|| config.subscribe.registrar_host.clone());

    let registrar = DynetteRegistrar::new(
        host,
        Duration::from_secs(config.subscribe.http_timeout_secs),
    )?;
    let client = SubscriptionClient::new(
        Box::new(registrar),
        Box::new(DnssecKeyStore::new(
            &config.paths.key_dir,
            config.keys.clone(),
        )),
        Box::new(CronFileScheduler::new(&config.schedule)),
    );

    info!("Subscribing {}", domain);
    let outcome = client
        .subscribe(&domain, key.as_deref())
        .await
        .with_context(|| format!("Subscription of {} failed", domain))?;

    if let Some(key) = &outcome.key {
        debug!("Registered key {}", key.key_file.display());
    }
    println!("Subscribed to dynamic DNS as {}", outcome.domain);
    Ok(())
}

async fn update(
    config: &DyndnsConfig,
    dyn_host: Option<String>,
    domain: Option<String>,
    key: Option<PathBuf>,
    ip: Option<String>,
) -> Result<()> {
    let domain = target_domain(config, domain).await?;
    let update_host = dyn_host.unwrap_or_else(|| config.update.update_host.clone());

    let resolver = HttpIpResolver::new(
        config.update.ip_service_url.clone(),
        Duration::from_secs(config.update.http_timeout_secs),
    )?;
    let engine = UpdateEngine::new(
        Box::new(resolver),
        Box::new(FileIpCache::new(&config.paths.ip_cache)),
        Box::new(DnssecKeyStore::new(
            &config.paths.key_dir,
            config.keys.clone(),
        )),
        Box::new(NsupdateExecutor::new(
            &config.update.nsupdate_path,
            &config.paths.zone_file,
        )),
        ZoneBuilder::new(update_host),
    );

    let mut request = UpdateRequest::new(domain);
    if let Some(ip) = ip {
        request = request.with_ip(ip);
    }
    if let Some(key) = key {
        request = request.with_private_key(key);
    }

    let outcome = engine
        .run_once(&request)
        .await
        .with_context(|| format!("Update of {} failed", request.domain))?;

    match outcome {
        UpdateOutcome::Unchanged { current } => {
            info!("{} already points to {}", request.domain, current);
        }
        UpdateOutcome::Updated { previous, current } => match previous {
            Some(previous) => println!("IP updated: {} -> {}", previous, current),
            None => println!("IP updated: {}", current),
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_update_flags() {
        let cli = Cli::try_parse_from([
            "dyndns",
            "update",
            "--dyn-host",
            "ns0.example.net",
            "-d",
            "foo.example.org",
            "-k",
            "/root/K.private",
            "-i",
            "203.0.113.5",
        ])
        .unwrap();

        match cli.command {
            Command::Update {
                dyn_host,
                domain,
                key,
                ip,
            } => {
                assert_eq!(dyn_host.as_deref(), Some("ns0.example.net"));
                assert_eq!(domain.as_deref(), Some("foo.example.org"));
                assert_eq!(key, Some(PathBuf::from("/root/K.private")));
                assert_eq!(ip.as_deref(), Some("203.0.113.5"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_subscribe_without_flags() {
        let cli = Cli::try_parse_from(["dyndns", "subscribe"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Subscribe {
                subscribe_host: None,
                domain: None,
                key: None
            }
        ));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("DEBUG").unwrap(), Level::DEBUG);
        assert!(parse_level("loud").is_err());
    }

    #[tokio::test]
    async fn test_target_domain_falls_back_to_current_host() {
        let dir = tempfile::tempdir().unwrap();
        let current_host = dir.path().join("current_host");
        std::fs::write(&current_host, "main.example.org\n").unwrap();

        let mut config = DyndnsConfig::new();
        config.paths.current_host = current_host;

        assert_eq!(
            target_domain(&config, None).await.unwrap().as_str(),
            "main.example.org"
        );
        assert_eq!(
            target_domain(&config, Some("other.example.org".to_string()))
                .await
                .unwrap()
                .as_str(),
            "other.example.org"
        );
    }

    #[tokio::test]
    async fn test_installcron_and_removecron() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = DyndnsConfig::new();
        config.schedule.cron_file = dir.path().join("yunohost-dyndns");

        run(Command::Installcron, config.clone()).await.unwrap();
        let entry = std::fs::read_to_string(&config.schedule.cron_file).unwrap();
        assert_eq!(entry, "*/2 * * * * root dyndns update >> /dev/null\n");

        run(Command::Removecron, config.clone()).await.unwrap();
        assert!(!config.schedule.cron_file.exists());
    }
}
