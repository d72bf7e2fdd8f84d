// # Command Runner Trait
//
// Defines how external tools (`dnssec-keygen`, `nsupdate`) are executed.
//
// Arguments are passed as a vector, never through a shell, and the exit
// status and both output streams are captured for diagnostics.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;

/// Captured result of an external command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the process was terminated by a signal
    pub status: Option<i32>,
    /// Captured standard output
    pub stdout: String,
    /// Captured standard error
    pub stderr: String,
}

impl CommandOutput {
    /// Whether the command exited with status 0
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }
}

/// Trait for external command execution
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args` and wait for it to finish
    ///
    /// # Returns
    ///
    /// - `Ok(CommandOutput)`: The process ran (whatever its exit status)
    /// - `Err(Error)`: The process could not be spawned
    async fn run(&self, program: &Path, args: &[OsString]) -> Result<CommandOutput, crate::Error>;
}
