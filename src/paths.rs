//! File locations used by the application.
//!
//! Notes and the theme preference live in the platform data directory,
//! the log file in the platform cache directory.
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the flat note file.
pub const NOTES_FILE_NAME: &str = "ciphernotes.txt";

/// Name of the theme preference file.
pub const THEME_FILE_NAME: &str = "theme.json";

/// Name of the log file.
pub const LOG_FILE_NAME: &str = "cipher_notes.log";

/// Resolved locations of every file the application touches.
#[derive(Debug, Clone)]
pub struct AppPaths
{
    /// Directory holding the notes and the theme preference
    data_dir: PathBuf,
    /// Directory holding the log file
    cache_dir: PathBuf,
}

impl AppPaths
{
    /// Resolves the platform directories.
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn discover() -> Result<Self>
    {
        let project_dirs = project_dirs()?;

        Ok(Self {
            data_dir: project_dirs.data_dir().to_path_buf(),
            cache_dir: project_dirs.cache_dir().to_path_buf(),
        })
    }

    /// Keeps every file, the log included, inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self
    {
        Self {
            data_dir: dir.to_path_buf(),
            cache_dir: dir.to_path_buf(),
        }
    }

    /// Replaces the data directory, keeping the platform cache directory.
    #[must_use]
    pub fn with_data_dir(self, dir: &Path) -> Self
    {
        Self {
            data_dir: dir.to_path_buf(),
            ..self
        }
    }

    /// Creates the data and cache directories if they don't exist yet.
    ///
    /// # Errors
    ///
    /// Returns an error if either directory cannot be created.
    pub fn ensure_dirs(&self) -> Result<()>
    {
        fs::create_dir_all(&self.data_dir).with_context(|| {
            format!("Failed to create data directory {}", self.data_dir.display())
        })?;
        fs::create_dir_all(&self.cache_dir).with_context(|| {
            format!("Failed to create cache directory {}", self.cache_dir.display())
        })?;

        Ok(())
    }

    /// The data directory.
    #[must_use]
    pub fn data_dir(&self) -> &Path
    {
        &self.data_dir
    }

    /// Path of the note file.
    #[must_use]
    pub fn notes_file(&self) -> PathBuf
    {
        self.data_dir.join(NOTES_FILE_NAME)
    }

    /// Path of the theme preference file.
    #[must_use]
    pub fn theme_file(&self) -> PathBuf
    {
        self.data_dir.join(THEME_FILE_NAME)
    }

    /// Path of the log file.
    #[must_use]
    pub fn log_file(&self) -> PathBuf
    {
        self.cache_dir.join(LOG_FILE_NAME)
    }
}

/// Project directories for this application.
fn project_dirs() -> Result<ProjectDirs>
{
    ProjectDirs::from("", "", "cipher_notes").context("Failed to determine project directories")
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn in_dir_keeps_everything_together()
    {
        let dir = Path::new("/tmp/notes-here");
        let paths = AppPaths::in_dir(dir);

        assert_eq!(paths.notes_file(), dir.join(NOTES_FILE_NAME));
        assert_eq!(paths.theme_file(), dir.join(THEME_FILE_NAME));
        assert_eq!(paths.log_file(), dir.join(LOG_FILE_NAME));
    }

    #[test]
    fn data_dir_override_leaves_log_alone()
    {
        let paths = AppPaths::in_dir(Path::new("/var/cache/app"))
            .with_data_dir(Path::new("/home/user/notes"));

        assert_eq!(paths.data_dir(), Path::new("/home/user/notes"));
        assert_eq!(paths.log_file(), Path::new("/var/cache/app").join(LOG_FILE_NAME));
    }

    #[test]
    fn ensure_dirs_creates_missing_directories()
    {
        let root = tempfile::tempdir().unwrap();
        let nested = root.path().join("a").join("b");
        let paths = AppPaths::in_dir(&nested);

        paths.ensure_dirs().unwrap();
        assert!(nested.is_dir());
    }
}
