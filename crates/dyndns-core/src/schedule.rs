//! Periodic update schedule
//!
//! The update cycle is a short-lived process run by cron. [`CronFileScheduler`]
//! owns a single `/etc/cron.d` entry:
//!
//! ```text
//! */2 * * * * root dyndns update >> /dev/null
//! ```

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::info;

use crate::config::ScheduleConfig;
use crate::error::{Error, Result};
use crate::traits::Scheduler;

/// Scheduler backed by a cron.d file
#[derive(Debug, Clone)]
pub struct CronFileScheduler {
    path: PathBuf,
    interval_minutes: u32,
    user: String,
    command: String,
}

impl CronFileScheduler {
    /// Create a scheduler from the schedule configuration
    pub fn new(config: &ScheduleConfig) -> Self {
        Self {
            path: config.cron_file.clone(),
            interval_minutes: config.interval_minutes,
            user: config.user.clone(),
            command: config.command.clone(),
        }
    }

    /// Path of the cron file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The cron line written by [`Scheduler::install`]
    pub fn entry(&self) -> String {
        format!(
            "*/{} * * * * {} {} >> /dev/null\n",
            self.interval_minutes, self.user, self.command
        )
    }
}

#[async_trait]
impl Scheduler for CronFileScheduler {
    async fn install(&self) -> Result<()> {
        fs::write(&self.path, self.entry()).await.map_err(|e| {
            Error::schedule_install(format!("{}: {}", self.path.display(), e))
        })?;

        info!("Installed update schedule in {}", self.path.display());
        Ok(())
    }

    async fn remove(&self) -> Result<()> {
        fs::remove_file(&self.path).await.map_err(|e| {
            Error::schedule_remove(format!("{}: {}", self.path.display(), e))
        })?;

        info!("Removed update schedule {}", self.path.display());
        Ok(())
    }
}
