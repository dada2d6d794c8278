//! Tracing setup.
//!
//! The terminal belongs to the TUI, so log output goes to a file. Without a
//! configured file no subscriber is installed and events are discarded.

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Install a file-backed subscriber.
///
/// The filter comes from `RUST_LOG` when set, else from `default_level`.
pub fn init(log_file: Option<&Path>, default_level: &str) -> Result<bool> {
    let Some(path) = log_file else {
        return Ok(false);
    };

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("failed to install log subscriber: {}", e))?;

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_file_disables_logging() {
        assert!(!init(None, "info").unwrap());
    }

    #[test]
    fn test_unwritable_file_is_an_error() {
        let err = init(Some(Path::new("/nonexistent/dir/levelwatch.log")), "info").unwrap_err();
        assert!(err.to_string().contains("failed to open log file"));
    }
}
