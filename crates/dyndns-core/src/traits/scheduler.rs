// # Scheduler Trait
//
// Defines the interface to the external periodic-task runner that invokes
// the update cycle.
//
// ## Implementations
//
// - cron.d file: `CronFileScheduler`

use async_trait::async_trait;

/// Trait for schedule installers
#[async_trait]
pub trait Scheduler: Send + Sync {
    /// Install (or overwrite) the periodic update entry
    ///
    /// Fails with `Error::ScheduleInstall`.
    async fn install(&self) -> Result<(), crate::Error>;

    /// Remove the periodic update entry
    ///
    /// Fails with `Error::ScheduleRemove`, including when no entry exists.
    async fn remove(&self) -> Result<(), crate::Error>;
}
