//! Minimal embedding example for dyndns-core
//!
//! Runs a few update cycles in-process with in-memory components: the
//! application owns the loop that cron would otherwise provide.

use dyndns_core::traits::{IpResolver, KeyMaterial, KeyStore, UpdateExecutor};
use dyndns_core::{
    Domain, Error, IpAddress, MemoryIpCache, Result, UpdateEngine, UpdateOutcome, UpdateRequest,
    ZoneBuilder, ZoneUpdateTransaction,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Resolver walking through a fixed list of addresses
struct ScriptedResolver {
    addresses: Vec<&'static str>,
    next: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl IpResolver for ScriptedResolver {
    async fn current(&self) -> Result<IpAddress> {
        let index = self.next.fetch_add(1, Ordering::SeqCst);
        let ip = self
            .addresses
            .get(index.min(self.addresses.len().saturating_sub(1)))
            .ok_or_else(|| Error::ip_resolution("no address scripted"))?;
        IpAddress::parse(ip)
    }

    fn resolver_name(&self) -> &'static str {
        "scripted"
    }
}

/// Key store holding a single pre-provisioned key
struct StaticKeyStore {
    key: KeyMaterial,
}

#[async_trait::async_trait]
impl KeyStore for StaticKeyStore {
    async fn exists(&self, domain: &Domain) -> Result<bool> {
        Ok(&self.key.domain == domain)
    }

    async fn load(&self, domain: &Domain) -> Result<Option<KeyMaterial>> {
        Ok((&self.key.domain == domain).then(|| self.key.clone()))
    }

    async fn get_or_create(&self, domain: &Domain) -> Result<KeyMaterial> {
        self.load(domain)
            .await?
            .ok_or_else(|| Error::key_generation("embedded store cannot generate keys"))
    }
}

/// Executor printing the transaction instead of running nsupdate
struct PrintingExecutor;

#[async_trait::async_trait]
impl UpdateExecutor for PrintingExecutor {
    async fn apply(&self, transaction: &ZoneUpdateTransaction, private_key: &Path) -> Result<()> {
        println!("[Embedded] Signing with {}", private_key.display());
        print!("{}", transaction);
        Ok(())
    }

    fn executor_name(&self) -> &'static str {
        "printing"
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    println!("=== Embedded dyndns-core Example ===\n");

    let domain = Domain::parse("foo.example.org")?;
    let cache = MemoryIpCache::new();

    let engine = UpdateEngine::new(
        Box::new(ScriptedResolver {
            addresses: vec!["203.0.113.5", "203.0.113.5", "198.51.100.7"],
            next: Arc::new(AtomicUsize::new(0)),
        }),
        Box::new(cache.clone()),
        Box::new(StaticKeyStore {
            key: KeyMaterial {
                domain: domain.clone(),
                key_file: PathBuf::from("/tmp/Kfoo.example.org.+157+00001.key"),
                private_file: PathBuf::from("/tmp/Kfoo.example.org.+157+00001.private"),
                public_key: "ZW1iZWRkZWQ=".to_string(),
            },
        }),
        Box::new(PrintingExecutor),
        ZoneBuilder::new("dynhost.example.net"),
    );

    let request = UpdateRequest::new(domain);
    for cycle in 1..=3 {
        match engine.run_once(&request).await? {
            UpdateOutcome::Unchanged { current } => {
                println!("\nCycle {}: unchanged ({})\n", cycle, current);
            }
            UpdateOutcome::Updated { previous, current } => {
                println!("\nCycle {}: {:?} -> {}\n", cycle, previous, current);
            }
        }
    }

    println!("=== Example complete ===");
    Ok(())
}
