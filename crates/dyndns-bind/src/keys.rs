//! `dnssec-keygen` backed key store
//!
//! Keys live in one directory as BIND key pairs:
//!
//! ```text
//! K<domain>.+157+<id>.key       "<domain>. IN KEY 0 3 157 <base64 secret>"
//! K<domain>.+157+<id>.private   consumed by `nsupdate -k`
//! ```
//!
//! A pair is only used when both halves exist and the file name carries the
//! exact domain, so keys of other domains in the same directory are ignored.

use async_trait::async_trait;
use dyndns_core::traits::{CommandRunner, KeyMaterial, KeyStore};
use dyndns_core::{Domain, Error, Result, TokioCommandRunner};
use dyndns_core::config::KeyConfig;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

/// Key store over a BIND key directory
pub struct DnssecKeyStore {
    /// Directory holding the key pairs
    key_dir: PathBuf,

    /// Generation settings
    config: KeyConfig,

    /// Process runner
    runner: Arc<dyn CommandRunner>,
}

impl DnssecKeyStore {
    /// Create a key store running the real generator
    pub fn new(key_dir: impl Into<PathBuf>, config: KeyConfig) -> Self {
        Self::with_runner(key_dir, config, Arc::new(TokioCommandRunner::new()))
    }

    /// Create a key store with a custom process runner
    pub fn with_runner(
        key_dir: impl Into<PathBuf>,
        config: KeyConfig,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            key_dir: key_dir.into(),
            config,
            runner,
        }
    }

    /// Directory holding the key pairs
    pub fn key_dir(&self) -> &Path {
        &self.key_dir
    }

    /// Find the `.key`/`.private` pair for `domain`
    ///
    /// Candidates are visited in name order so the choice is stable when
    /// several pairs exist.
    async fn find_pair(&self, domain: &Domain) -> Result<Option<(PathBuf, PathBuf)>> {
        let mut entries = match fs::read_dir(&self.key_dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let prefix = format!("K{}.+", domain.as_str());
        let mut candidates = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with(&prefix) && name.ends_with(".key") {
                candidates.push(entry.path());
            }
        }
        candidates.sort();

        for key_file in candidates {
            let private_file = key_file.with_extension("private");
            if fs::try_exists(&private_file).await? {
                return Ok(Some((key_file, private_file)));
            }
            debug!("Ignoring {} without a private half", key_file.display());
        }

        Ok(None)
    }

    async fn generate(&self, domain: &Domain) -> Result<()> {
        fs::create_dir_all(&self.key_dir).await.map_err(|e| {
            Error::key_generation(format!(
                "cannot create key directory {}: {}",
                self.key_dir.display(),
                e
            ))
        })?;

        let args: Vec<OsString> = vec![
            "-a".into(),
            self.config.algorithm.clone().into(),
            "-b".into(),
            self.config.bits.to_string().into(),
            "-n".into(),
            "USER".into(),
            "-K".into(),
            self.key_dir.as_os_str().to_owned(),
            domain.as_str().into(),
        ];

        let output = self
            .runner
            .run(&self.config.keygen_path, &args)
            .await
            .map_err(|e| Error::key_generation(e.to_string()))?;

        if !output.success() {
            return Err(Error::key_generation(format!(
                "{} exited with {:?}: {}",
                self.config.keygen_path.display(),
                output.status,
                output.stderr.trim()
            )));
        }

        Ok(())
    }
}

impl std::fmt::Debug for DnssecKeyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DnssecKeyStore")
            .field("key_dir", &self.key_dir)
            .field("config", &self.config)
            .finish()
    }
}

/// The public half is the last field of the key record on the first line
fn parse_public_key(content: &str) -> Option<&str> {
    content.lines().next()?.split_whitespace().last()
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<()> {
    Ok(())
}

#[async_trait]
impl KeyStore for DnssecKeyStore {
    async fn exists(&self, domain: &Domain) -> Result<bool> {
        Ok(self.find_pair(domain).await?.is_some())
    }

    async fn load(&self, domain: &Domain) -> Result<Option<KeyMaterial>> {
        let Some((key_file, private_file)) = self.find_pair(domain).await? else {
            return Ok(None);
        };

        let content = fs::read_to_string(&key_file).await?;
        let public_key = parse_public_key(&content).ok_or_else(|| {
            Error::invalid_input(format!("key file {} is empty", key_file.display()))
        })?;

        debug!("Loaded DNS key {} for {}", key_file.display(), domain);
        Ok(Some(KeyMaterial {
            domain: domain.clone(),
            key_file,
            private_file,
            public_key: public_key.to_string(),
        }))
    }

    async fn get_or_create(&self, domain: &Domain) -> Result<KeyMaterial> {
        if let Some(key) = self.load(domain).await? {
            return Ok(key);
        }

        info!(
            "Generating {} {}-bit key for {} in {}",
            self.config.algorithm,
            self.config.bits,
            domain,
            self.key_dir.display()
        );
        self.generate(domain).await?;

        let key = self.load(domain).await?.ok_or_else(|| {
            Error::key_generation(format!(
                "no key file for {} in {} after generation",
                domain,
                self.key_dir.display()
            ))
        })?;

        restrict_permissions(&key.key_file).await?;
        restrict_permissions(&key.private_file).await?;

        Ok(key)
    }
}
