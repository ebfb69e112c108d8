//! Flat-file note store.
//!
//! Notes are kept one per line in a UTF-8 text file. New entries are
//! appended; deleting rewrites the remaining lines in their original order.
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use regex::Regex;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use crate::cipher::Mode;

/// Format of the timestamp inside a note entry.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

// MODE [YYYY-MM-DD HH:MM:SS]: CIPHERTEXT
static ENTRY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(ENCRYPTED|DECRYPTED) \[(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2})\]: (.*)$")
        .expect("Invalid note entry regex")
});

/// A single saved cipher result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteEntry
{
    /// Mode the text was produced with
    pub mode: Mode,
    /// Local time the entry was saved at
    pub timestamp: NaiveDateTime,
    /// Output of the transform
    pub text: String,
}

impl NoteEntry
{
    /// Creates an entry.
    ///
    /// Line breaks in `text` are replaced with spaces so the entry always
    /// occupies exactly one line of the note file.
    ///
    /// # Arguments
    ///
    /// * `mode` - The mode the text was produced with
    /// * `timestamp` - When the entry is saved
    /// * `text` - The transform output
    #[must_use]
    pub fn new(mode: Mode, timestamp: NaiveDateTime, text: &str) -> Self
    {
        let text = text
            .replace("\r\n", " ")
            .replace(['\n', '\r'], " ");

        Self {
            mode,
            timestamp,
            text,
        }
    }

    /// Parses a line of the note file.
    ///
    /// # Returns
    ///
    /// The entry, or `None` if the line is not in entry format.
    #[must_use]
    pub fn parse(line: &str) -> Option<Self>
    {
        let caps = ENTRY_REGEX.captures(line)?;
        let mode = Mode::from_label(&caps[1])?;
        let timestamp = NaiveDateTime::parse_from_str(&caps[2], TIMESTAMP_FORMAT).ok()?;

        Some(Self {
            mode,
            timestamp,
            text: caps[3].to_string(),
        })
    }
}

impl fmt::Display for NoteEntry
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(
            formatter,
            "{} [{}]: {}",
            self.mode.label(),
            self.timestamp.format(TIMESTAMP_FORMAT),
            self.text
        )
    }
}

/// Append-only note file with line-level deletion.
///
/// No locking is done; concurrent writers may lose lines on delete.
#[derive(Debug, Clone)]
pub struct NoteStore
{
    /// Location of the note file
    path: PathBuf,
}

impl NoteStore
{
    /// Creates a store backed by the file at `path`.
    ///
    /// The file is not touched until the first read or write.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self
    {
        Self { path: path.into() }
    }

    /// Location of the note file.
    #[must_use]
    pub fn path(&self) -> &Path
    {
        &self.path
    }

    /// Appends one line to the note file.
    ///
    /// # Arguments
    ///
    /// * `line` - The line to append, without the trailing newline
    ///
    /// # Errors
    ///
    /// Returns an error if the file or its directory cannot be created, or if
    /// writing fails.
    pub fn append(&self, line: &str) -> Result<()>
    {
        self.ensure_parent()?;

        let mut file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open note file {}", self.path.display()))?;

        writeln!(file, "{line}").context("Failed to append to note file")?;

        Ok(())
    }

    /// Appends a note entry.
    ///
    /// # Errors
    ///
    /// Same as [`NoteStore::append`].
    pub fn append_entry(&self, entry: &NoteEntry) -> Result<()>
    {
        self.append(&entry.to_string())
    }

    /// Reads every note line.
    ///
    /// Lines are trimmed and blank lines are skipped.
    ///
    /// # Returns
    ///
    /// The lines in file order, or an empty list if the file doesn't exist
    /// yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read.
    pub fn load(&self) -> Result<Vec<String>>
    {
        let content = match fs::read_to_string(&self.path)
        {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) =>
            {
                return Err(err).with_context(|| {
                    format!("Failed to read note file {}", self.path.display())
                });
            }
        };

        Ok(content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(ToOwned::to_owned)
            .collect())
    }

    /// Replaces the file contents with `lines`.
    ///
    /// # Arguments
    ///
    /// * `lines` - The lines to write, in order
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn rewrite(&self, lines: &[String]) -> Result<()>
    {
        self.ensure_parent()?;

        let mut file = File::create(&self.path)
            .with_context(|| format!("Failed to create note file {}", self.path.display()))?;

        for line in lines
        {
            writeln!(file, "{line}").context("Failed to write note file")?;
        }

        Ok(())
    }

    /// Removes the line at `index`.
    ///
    /// # Arguments
    ///
    /// * `index` - Position of the line among the lines [`NoteStore::load`]
    ///   returns
    ///
    /// # Returns
    ///
    /// The removed line, or `None` if `index` is out of range. The file is
    /// left untouched in the latter case.
    ///
    /// # Errors
    ///
    /// Returns an error if reading or rewriting the file fails.
    pub fn delete(&self, index: usize) -> Result<Option<String>>
    {
        let mut lines = self.load()?;
        if index >= lines.len()
        {
            return Ok(None);
        }

        let removed = lines.remove(index);
        self.rewrite(&lines)?;

        Ok(Some(removed))
    }

    /// Creates the directory the note file lives in.
    fn ensure_parent(&self) -> Result<()>
    {
        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create note directory {}", parent.display())
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn timestamp() -> NaiveDateTime
    {
        NaiveDate::from_ymd_opt(2024, 3, 9)
            .and_then(|date| date.and_hms_opt(7, 5, 3))
            .unwrap()
    }

    fn store_in(dir: &TempDir) -> NoteStore
    {
        NoteStore::new(dir.path().join("ciphernotes.txt"))
    }

    #[test]
    fn entry_formats_as_a_single_line()
    {
        let entry = NoteEntry::new(Mode::Encrypt, timestamp(), "ignnw");
        assert_eq!(entry.to_string(), "ENCRYPTED [2024-03-09 07:05:03]: ignnw");

        let entry = NoteEntry::new(Mode::Decrypt, timestamp(), "two\nlines\r\nhere");
        assert_eq!(
            entry.to_string(),
            "DECRYPTED [2024-03-09 07:05:03]: two lines here"
        );
    }

    #[test]
    fn entry_parses_its_own_output()
    {
        let entry = NoteEntry::new(Mode::Decrypt, timestamp(), "hello: [world]");
        assert_eq!(NoteEntry::parse(&entry.to_string()), Some(entry));
    }

    #[test]
    fn foreign_lines_do_not_parse()
    {
        assert_eq!(NoteEntry::parse("just some text"), None);
        assert_eq!(NoteEntry::parse("ENCRYPTED [yesterday]: abc"), None);
        assert_eq!(NoteEntry::parse("SECRET [2024-03-09 07:05:03]: abc"), None);
        assert_eq!(NoteEntry::parse("ENCRYPTED [2024-13-40 07:05:03]: abc"), None);
    }

    #[test]
    fn missing_file_means_no_notes()
    {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        assert!(store.load().unwrap().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn appended_line_is_read_back_last()
    {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);

        store.append("first").unwrap();
        let entry = NoteEntry::new(Mode::Encrypt, timestamp(), "ignnw");
        store.append_entry(&entry).unwrap();

        let lines = store.load().unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines.last(), Some(&entry.to_string()));
    }

    #[test]
    fn append_creates_missing_directories()
    {
        let dir = tempfile::tempdir().unwrap();
        let store = NoteStore::new(dir.path().join("nested").join("notes.txt"));

        store.append("line").unwrap();
        assert_eq!(store.load().unwrap(), vec!["line".to_string()]);
    }

    #[test]
    fn load_skips_blank_lines_and_trims()
    {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        fs::write(store.path(), "  one  \n\n   \ntwo\r\n").unwrap();

        assert_eq!(store.load().unwrap(), vec!["one".to_string(), "two".to_string()]);
    }

    #[test]
    fn rewrite_replaces_contents_in_order()
    {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append("old").unwrap();

        let lines = vec!["b".to_string(), "a".to_string()];
        store.rewrite(&lines).unwrap();

        assert_eq!(fs::read_to_string(store.path()).unwrap(), "b\na\n");
    }

    #[test]
    fn delete_removes_only_the_given_line()
    {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        for line in ["one", "two", "three", "four"]
        {
            store.append(line).unwrap();
        }

        assert_eq!(store.delete(1).unwrap(), Some("two".to_string()));
        assert_eq!(
            store.load().unwrap(),
            vec!["one".to_string(), "three".to_string(), "four".to_string()]
        );
    }

    #[test]
    fn delete_out_of_range_leaves_file_alone()
    {
        let dir = tempfile::tempdir().unwrap();
        let store = store_in(&dir);
        store.append("only").unwrap();

        assert_eq!(store.delete(5).unwrap(), None);
        assert_eq!(fs::read_to_string(store.path()).unwrap(), "only\n");
    }
}
