// # File IP Cache
//
// File-based implementation of IpCache.
//
// ## File Format
//
// A single line holding the last IP committed to DNS, e.g.
//
// ```text
// 203.0.113.5
// ```
//
// ## Crash Safety
//
// - Atomic writes: new value written to `<path>.tmp`, flushed, then renamed
// - A missing file means "nothing applied yet" and loads as the sentinel

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

use crate::Error;
use crate::ip::IpAddress;
use crate::traits::IpCache;

/// File-based IP cache
///
/// # Example
///
/// ```rust,no_run
/// use dyndns_core::state::FileIpCache;
/// use dyndns_core::traits::IpCache;
/// use dyndns_core::IpAddress;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let cache = FileIpCache::new("/etc/yunohost/dyndns/old_ip");
///
///     cache.store(&IpAddress::parse("203.0.113.5")?).await?;
///     assert_eq!(cache.load().await?.as_str(), "203.0.113.5");
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileIpCache {
    path: PathBuf,
}

impl FileIpCache {
    /// Create a cache backed by `path`
    ///
    /// Nothing is touched on disk until the first `store`.
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Path of the cache file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get path to temporary file for atomic writes
    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone().into_os_string();
        temp.push(".tmp");
        PathBuf::from(temp)
    }
}

#[async_trait]
impl IpCache for FileIpCache {
    async fn load(&self) -> Result<IpAddress, Error> {
        let content = match fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("No cached IP at {}", self.path.display());
                return Ok(IpAddress::unset());
            }
            Err(e) => {
                return Err(Error::ip_cache(format!(
                    "Failed to read {}: {}",
                    self.path.display(),
                    e
                )));
            }
        };

        let line = content.lines().next().unwrap_or("").trim();
        if line.is_empty() {
            tracing::warn!("Cached IP file {} is empty, treating as unset", self.path.display());
            return Ok(IpAddress::unset());
        }

        Ok(IpAddress::from_stored(line))
    }

    async fn store(&self, ip: &IpAddress) -> Result<(), Error> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await.map_err(|e| {
                Error::ip_cache(format!(
                    "Failed to create cache directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let temp_path = self.temp_path();
        {
            let mut file = fs::File::create(&temp_path).await.map_err(|e| {
                Error::ip_cache(format!(
                    "Failed to create temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.write_all(ip.as_str().as_bytes()).await.map_err(|e| {
                Error::ip_cache(format!(
                    "Failed to write to temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;

            file.flush().await.map_err(|e| {
                Error::ip_cache(format!(
                    "Failed to flush temp file {}: {}",
                    temp_path.display(),
                    e
                ))
            })?;
        }

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            Error::ip_cache(format!(
                "Failed to rename {} to {}: {}",
                temp_path.display(),
                self.path.display(),
                e
            ))
        })?;

        tracing::trace!("Cached IP {} in {}", ip, self.path.display());
        Ok(())
    }

    async fn invalidate(&self) -> Result<(), Error> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                tracing::debug!("Removed cached IP {}", self.path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::ip_cache(format!(
                "Failed to remove {}: {}",
                self.path.display(),
                e
            ))),
        }
    }
}
