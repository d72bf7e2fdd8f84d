// # Current Host
//
// The `current_host` file holds the host's main domain on its first line.
// It is the default domain for `subscribe` and `update` when none is given.

use std::path::Path;
use tokio::fs;

use crate::domain::Domain;
use crate::error::{Error, Result};

/// Read the main domain from the `current_host` file
pub async fn read_current_host(path: &Path) -> Result<Domain> {
    let content = fs::read_to_string(path).await.map_err(|e| {
        Error::config(format!(
            "No domain given and {} could not be read: {}",
            path.display(),
            e
        ))
    })?;

    let line = content.lines().next().unwrap_or("").trim_end();
    Domain::parse(line)
}
