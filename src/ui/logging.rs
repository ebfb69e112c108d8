//! Logging utilities
//!
//! Log records go to a file, never to the terminal the UI is drawn on.

use anyhow::{Context, Result};
use env_logger::{Builder, Target, fmt::TimestampPrecision};
use log::LevelFilter;
use std::fs::{File, create_dir_all, remove_file};
use std::io::ErrorKind;
use std::path::Path;

/// Initializes the logging system for the application.
///
/// Records are appended to `log_path` with millisecond timestamps,
/// `Info` and above for dependencies and `Debug` for this crate.
///
/// # Arguments
///
/// * `log_path` - The file to append log records to
///
/// # Errors
///
/// Returns an error if the log file cannot be opened or created, or if a
/// logger was already installed.
pub fn init_logging(log_path: &Path) -> Result<()>
{
    if let Some(parent) = log_path.parent()
    {
        create_dir_all(parent).context("Failed to create log directory")?;
    }

    let log_file = File::options()
        .append(true)
        .create(true)
        .open(log_path)
        .with_context(|| format!("Failed to open log file {}", log_path.display()))?;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("cipher_notes", LevelFilter::Debug)
        .format_timestamp(Some(TimestampPrecision::Millis))
        .target(Target::Pipe(Box::new(log_file)))
        .try_init()
        .context("Failed to install logger")?;

    Ok(())
}

/// Removes the log file.
///
/// A log file that doesn't exist counts as removed.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_log_file(log_path: &Path) -> Result<()>
{
    match remove_file(log_path)
    {
        Err(err) if err.kind() != ErrorKind::NotFound =>
        {
            Err(err).with_context(|| format!("Failed to remove log file {}", log_path.display()))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn clearing_a_missing_log_is_fine()
    {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("missing.log");

        clear_log_file(&log_path).unwrap();
    }

    #[test]
    fn clearing_removes_the_file()
    {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("cipher_notes.log");
        std::fs::write(&log_path, "old records\n").unwrap();

        clear_log_file(&log_path).unwrap();
        assert!(!log_path.exists());
    }
}
