use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, Context, Result};
use tracing_subscriber::EnvFilter;

use crate::config::log_path;

/// Install a file-backed `tracing` subscriber. The terminal is owned by the
/// alternate screen while the app runs, so diagnostics never go to stdout.
/// `RUST_LOG` overrides the default `info` level.
///
/// Logging is best effort: without a home directory, or when the log file
/// cannot be created, the reader runs without one. Only installing the
/// subscriber twice is reported as an error.
pub fn init_logging() -> Result<()> {
    let Some(path) = log_path() else {
        return Ok(());
    };
    let Ok(file) = open_log_file(&path) else {
        return Ok(());
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|err| anyhow!("failed to install log subscriber: {err}"))
}

fn open_log_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create log directory")?;
    }

    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn creates_missing_log_directory() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("reader.log");
        open_log_file(&path).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn log_under_a_regular_file_is_an_error() {
        let temp = TempDir::new().unwrap();
        let blocker = temp.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();

        let err = open_log_file(&blocker.join("dir").join("reader.log")).unwrap_err();
        assert!(err.to_string().contains("failed to create log directory"));
    }
}
