//! Test doubles and common utilities for contract tests
//!
//! Every double is `Clone` and keeps its counters behind an `Arc`, so a test
//! can hand one clone to the engine/client and inspect another afterwards.

#![allow(dead_code)]

use dyndns_core::error::{Error, Result};
use dyndns_core::traits::{
    Availability, IpResolver, KeyMaterial, KeyStore, Registrar, Registration, Scheduler,
    UpdateExecutor,
};
use dyndns_core::{Domain, IpAddress, ZoneUpdateTransaction};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// An IpResolver returning a fixed address, or failing
#[derive(Clone)]
pub struct FixedIpResolver {
    ip: Option<&'static str>,
    current_call_count: Arc<AtomicUsize>,
}

impl FixedIpResolver {
    pub fn new(ip: &'static str) -> Self {
        Self {
            ip: Some(ip),
            current_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A resolver whose lookup always fails
    pub fn unreachable() -> Self {
        Self {
            ip: None,
            current_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Get the number of lookups performed
    pub fn current_call_count(&self) -> usize {
        self.current_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl IpResolver for FixedIpResolver {
    async fn current(&self) -> Result<IpAddress> {
        self.current_call_count.fetch_add(1, Ordering::SeqCst);
        match self.ip {
            Some(ip) => IpAddress::parse(ip),
            None => Err(Error::ip_resolution("connection refused")),
        }
    }

    fn resolver_name(&self) -> &'static str {
        "fixed"
    }
}

/// An UpdateExecutor recording what it was asked to apply
#[derive(Clone)]
pub struct RecordingExecutor {
    fail_with_status: Option<i32>,
    fail_locally: bool,
    applied: Arc<Mutex<Vec<(String, PathBuf)>>>,
}

impl RecordingExecutor {
    pub fn accepting() -> Self {
        Self {
            fail_with_status: None,
            fail_locally: false,
            applied: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// An executor whose update tool exits with `status`
    pub fn rejecting(status: i32) -> Self {
        Self {
            fail_with_status: Some(status),
            fail_locally: false,
            applied: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// An executor that cannot write its scratch file
    pub fn failing_locally() -> Self {
        Self {
            fail_with_status: None,
            fail_locally: true,
            applied: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Get the number of apply() calls
    pub fn apply_call_count(&self) -> usize {
        self.applied.lock().unwrap().len()
    }

    /// Scripts and key paths passed to apply(), in call order
    pub fn applied(&self) -> Vec<(String, PathBuf)> {
        self.applied.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl UpdateExecutor for RecordingExecutor {
    async fn apply(&self, transaction: &ZoneUpdateTransaction, private_key: &Path) -> Result<()> {
        self.applied
            .lock()
            .unwrap()
            .push((transaction.to_script(), private_key.to_path_buf()));

        if self.fail_locally {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "zone file is read-only",
            )));
        }

        match self.fail_with_status {
            Some(status) => Err(Error::update_rejected(Some(status), "; TSIG error with server: tsig verify failure")),
            None => Ok(()),
        }
    }

    fn executor_name(&self) -> &'static str {
        "recording"
    }
}

/// A KeyStore that "generates" keys in memory
#[derive(Clone)]
pub struct MockKeyStore {
    stored: Arc<Mutex<Option<KeyMaterial>>>,
    fail_generation: bool,
    generate_call_count: Arc<AtomicUsize>,
    get_or_create_call_count: Arc<AtomicUsize>,
}

impl MockKeyStore {
    pub fn empty() -> Self {
        Self {
            stored: Arc::new(Mutex::new(None)),
            fail_generation: false,
            generate_call_count: Arc::new(AtomicUsize::new(0)),
            get_or_create_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A store already holding a key for `domain`
    pub fn with_key(domain: &str) -> Self {
        let store = Self::empty();
        *store.stored.lock().unwrap() = Some(key_for(domain));
        store
    }

    /// A store whose generator always fails
    pub fn failing() -> Self {
        Self {
            fail_generation: true,
            ..Self::empty()
        }
    }

    /// Get the number of keys generated
    pub fn generate_call_count(&self) -> usize {
        self.generate_call_count.load(Ordering::SeqCst)
    }

    /// Get the number of get_or_create() calls
    pub fn get_or_create_call_count(&self) -> usize {
        self.get_or_create_call_count.load(Ordering::SeqCst)
    }
}

/// Key material as the BIND key store would report it
pub fn key_for(domain: &str) -> KeyMaterial {
    KeyMaterial {
        domain: Domain::parse(domain).unwrap(),
        key_file: PathBuf::from(format!("/etc/yunohost/dyndns/K{}.+157+12345.key", domain)),
        private_file: PathBuf::from(format!("/etc/yunohost/dyndns/K{}.+157+12345.private", domain)),
        public_key: "c2VjcmV0LWtleS1tYXRlcmlhbA==".to_string(),
    }
}

#[async_trait::async_trait]
impl KeyStore for MockKeyStore {
    async fn exists(&self, domain: &Domain) -> Result<bool> {
        Ok(self.load(domain).await?.is_some())
    }

    async fn load(&self, domain: &Domain) -> Result<Option<KeyMaterial>> {
        let stored = self.stored.lock().unwrap();
        Ok(stored.clone().filter(|key| &key.domain == domain))
    }

    async fn get_or_create(&self, domain: &Domain) -> Result<KeyMaterial> {
        self.get_or_create_call_count.fetch_add(1, Ordering::SeqCst);

        if let Some(key) = self.load(domain).await? {
            return Ok(key);
        }

        self.generate_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_generation {
            return Err(Error::key_generation("dnssec-keygen exited with status 1"));
        }

        let key = key_for(domain.as_str());
        *self.stored.lock().unwrap() = Some(key.clone());
        Ok(key)
    }
}

/// A Registrar answering from a script
#[derive(Clone)]
pub struct MockRegistrar {
    availability: Availability,
    registration: Registration,
    check_call_count: Arc<AtomicUsize>,
    registered_keys: Arc<Mutex<Vec<(String, String)>>>,
}

impl MockRegistrar {
    pub fn new(availability: Availability, registration: Registration) -> Self {
        Self {
            availability,
            registration,
            check_call_count: Arc::new(AtomicUsize::new(0)),
            registered_keys: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A registrar that accepts everything
    pub fn accepting() -> Self {
        Self::new(Availability::Available, Registration::Accepted)
    }

    /// Get the number of availability checks
    pub fn check_call_count(&self) -> usize {
        self.check_call_count.load(Ordering::SeqCst)
    }

    /// (domain, public key) pairs posted to the registrar
    pub fn registered_keys(&self) -> Vec<(String, String)> {
        self.registered_keys.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl Registrar for MockRegistrar {
    async fn check_availability(&self, _domain: &Domain) -> Result<Availability> {
        self.check_call_count.fetch_add(1, Ordering::SeqCst);
        Ok(self.availability)
    }

    async fn register_key(&self, domain: &Domain, public_key: &str) -> Result<Registration> {
        self.registered_keys
            .lock()
            .unwrap()
            .push((domain.to_string(), public_key.to_string()));
        Ok(self.registration.clone())
    }

    fn host(&self) -> &str {
        "dyndns.test"
    }
}

/// A Scheduler counting installs
#[derive(Clone)]
pub struct MockScheduler {
    fail_install: bool,
    install_call_count: Arc<AtomicUsize>,
}

impl MockScheduler {
    pub fn new() -> Self {
        Self {
            fail_install: false,
            install_call_count: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// A scheduler whose install always fails
    pub fn failing() -> Self {
        Self {
            fail_install: true,
            ..Self::new()
        }
    }

    /// Get the number of install() calls
    pub fn install_call_count(&self) -> usize {
        self.install_call_count.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Scheduler for MockScheduler {
    async fn install(&self) -> Result<()> {
        self.install_call_count.fetch_add(1, Ordering::SeqCst);
        if self.fail_install {
            return Err(Error::schedule_install("/etc/cron.d/yunohost-dyndns: Permission denied"));
        }
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        Ok(())
    }
}

/// The domain used throughout the contract tests
pub fn test_domain() -> Domain {
    Domain::parse("foo.example.org").unwrap()
}
