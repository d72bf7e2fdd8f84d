//! `nsupdate` based update executor

use async_trait::async_trait;
use dyndns_core::traits::{CommandRunner, UpdateExecutor};
use dyndns_core::{Error, Result, TokioCommandRunner, ZoneUpdateTransaction};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info};

/// Submits zone transactions with `nsupdate`
///
/// The transaction is written to a scratch file first and the file is passed
/// to the tool, so the exact message sent stays on disk for inspection.
pub struct NsupdateExecutor {
    /// Path of the `nsupdate` binary
    nsupdate_path: PathBuf,

    /// Scratch file receiving the update script
    zone_file: PathBuf,

    /// Process runner
    runner: Arc<dyn CommandRunner>,
}

impl NsupdateExecutor {
    /// Create an executor running the real tool
    pub fn new(nsupdate_path: impl Into<PathBuf>, zone_file: impl Into<PathBuf>) -> Self {
        Self::with_runner(nsupdate_path, zone_file, Arc::new(TokioCommandRunner::new()))
    }

    /// Create an executor with a custom process runner
    pub fn with_runner(
        nsupdate_path: impl Into<PathBuf>,
        zone_file: impl Into<PathBuf>,
        runner: Arc<dyn CommandRunner>,
    ) -> Self {
        Self {
            nsupdate_path: nsupdate_path.into(),
            zone_file: zone_file.into(),
            runner,
        }
    }

    /// Path of the zone scratch file
    pub fn zone_file(&self) -> &Path {
        &self.zone_file
    }

    async fn write_zone_file(&self, script: &str) -> Result<()> {
        if let Some(parent) = self.zone_file.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).await?;
        }

        let mut file = fs::File::create(&self.zone_file).await?;
        file.write_all(script.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

impl std::fmt::Debug for NsupdateExecutor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NsupdateExecutor")
            .field("nsupdate_path", &self.nsupdate_path)
            .field("zone_file", &self.zone_file)
            .finish()
    }
}

#[async_trait]
impl UpdateExecutor for NsupdateExecutor {
    async fn apply(&self, transaction: &ZoneUpdateTransaction, private_key: &Path) -> Result<()> {
        let script = transaction.to_script();
        // A local write fault is an I/O error, never a server refusal
        if let Err(e) = self.write_zone_file(&script).await {
            error!("Failed to write {}: {}", self.zone_file.display(), e);
            return Err(e);
        }
        debug!(
            "Wrote {} directives to {}",
            transaction.directives().len(),
            self.zone_file.display()
        );

        let args: Vec<OsString> = vec![
            "-k".into(),
            private_key.as_os_str().to_owned(),
            self.zone_file.as_os_str().to_owned(),
        ];

        let output = self
            .runner
            .run(&self.nsupdate_path, &args)
            .await
            .map_err(|e| Error::update_rejected(None, e.to_string()))?;

        if !output.success() {
            error!(
                "nsupdate exited with {:?}: {}",
                output.status,
                output.stderr.trim()
            );
            return Err(Error::update_rejected(output.status, output.stderr.trim()));
        }

        info!(
            "nsupdate accepted {} deletes and {} adds",
            transaction.delete_count(),
            transaction.add_count()
        );
        Ok(())
    }

    fn executor_name(&self) -> &'static str {
        "nsupdate"
    }
}
