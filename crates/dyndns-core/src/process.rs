//! External process execution
//!
//! [`TokioCommandRunner`] is the production [`CommandRunner`]: it spawns the
//! program directly (no shell), closes its stdin and captures both output
//! streams.

use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use std::process::Stdio;
use std::time::Instant;
use tracing::debug;

use crate::error::{Error, Result};
use crate::traits::{CommandOutput, CommandRunner};

/// Runs commands with `tokio::process`
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    /// Create a new runner
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for TokioCommandRunner {
    async fn run(&self, program: &Path, args: &[OsString]) -> Result<CommandOutput> {
        let start = Instant::now();
        debug!("Running {} {:?}", program.display(), args);

        let output = tokio::process::Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| Error::Other(format!("Failed to spawn {}: {}", program.display(), e)))?;

        let result = CommandOutput {
            status: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(
            "{} exited with {:?} in {:.3}s",
            program.display(),
            result.status,
            start.elapsed().as_secs_f64()
        );

        Ok(result)
    }
}
