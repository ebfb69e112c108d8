//! Theme preference persistence and the colors derived from it.
use anyhow::{Context, Result};
use log::warn;
use ratatui::style::Color;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Persisted theme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemePreference
{
    /// Whether the dark palette is active
    #[serde(default = "default_dark_mode")]
    pub dark_mode: bool,
}

/// Dark mode is on unless the user turned it off.
const fn default_dark_mode() -> bool
{
    true
}

impl Default for ThemePreference
{
    fn default() -> Self
    {
        Self {
            dark_mode: default_dark_mode(),
        }
    }
}

impl ThemePreference
{
    /// The preference with `dark_mode` flipped.
    #[must_use]
    pub const fn toggled(self) -> Self
    {
        Self {
            dark_mode: !self.dark_mode,
        }
    }

    /// Colors for this preference.
    #[must_use]
    pub const fn palette(self) -> Palette
    {
        if self.dark_mode
        {
            Palette::DARK
        }
        else
        {
            Palette::LIGHT
        }
    }
}

/// Reads and writes the theme preference file.
#[derive(Debug, Clone)]
pub struct PreferenceStore
{
    /// Location of the preference file
    path: PathBuf,
}

impl PreferenceStore
{
    /// Creates a store backed by the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self
    {
        Self { path: path.into() }
    }

    /// Location of the preference file.
    #[must_use]
    pub fn path(&self) -> &Path
    {
        &self.path
    }

    /// Loads the saved preference.
    ///
    /// A missing, unreadable or malformed file yields the default (dark
    /// mode); the problem is logged, never returned.
    #[must_use]
    pub fn load(&self) -> ThemePreference
    {
        if !self.path.exists()
        {
            return ThemePreference::default();
        }

        let parsed: Result<ThemePreference> = fs::read_to_string(&self.path)
            .context("Failed to read theme preference")
            .and_then(|content| {
                serde_json::from_str(&content).context("Failed to parse theme preference")
            });

        match parsed
        {
            Ok(preference) => preference,
            Err(err) =>
            {
                warn!("{err:#}, falling back to dark mode");
                ThemePreference::default()
            }
        }
    }

    /// Overwrites the preference file with `preference`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be serialized or written.
    pub fn save(&self, preference: ThemePreference) -> Result<()>
    {
        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs::create_dir_all(parent).context("Failed to create preference directory")?;
        }

        let content =
            serde_json::to_string(&preference).context("Failed to serialize theme preference")?;
        fs::write(&self.path, content).with_context(|| {
            format!("Failed to write theme preference {}", self.path.display())
        })?;

        Ok(())
    }
}

/// Terminal colors for one theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette
{
    /// Window background
    pub background: Color,
    /// Background of the input and result boxes
    pub panel: Color,
    /// Regular text
    pub text: Color,
    /// Text of the result box
    pub result: Color,
    /// Background of the notes list
    pub list: Color,
    /// Selected note line and active tab
    pub highlight: Color,
    /// Status messages reporting success
    pub success: Color,
    /// Status messages reporting a problem
    pub failure: Color,
}

impl Palette
{
    /// Catppuccin-like dark colors.
    pub const DARK: Self = Self {
        background: Color::Rgb(0x1e, 0x1e, 0x2e),
        panel: Color::Rgb(0x31, 0x32, 0x44),
        text: Color::Rgb(0xf2, 0xf2, 0xf2),
        result: Color::Rgb(0xa6, 0xe3, 0xa1),
        list: Color::Rgb(0x2a, 0x2a, 0x3a),
        highlight: Color::Rgb(0xf9, 0xe2, 0xaf),
        success: Color::Rgb(0xa6, 0xe3, 0xa1),
        failure: Color::Rgb(0xf3, 0x8b, 0xa8),
    };

    /// Plain light colors.
    pub const LIGHT: Self = Self {
        background: Color::Rgb(0xf0, 0xf0, 0xf0),
        panel: Color::Rgb(0xff, 0xff, 0xff),
        text: Color::Rgb(0x00, 0x00, 0x00),
        result: Color::Rgb(0x00, 0x00, 0x00),
        list: Color::Rgb(0xff, 0xff, 0xff),
        highlight: Color::Rgb(0x1e, 0x66, 0xf5),
        success: Color::Rgb(0x40, 0xa0, 0x2b),
        failure: Color::Rgb(0xd2, 0x0f, 0x39),
    };
}
