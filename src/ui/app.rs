//! Application module for the note keeper.
//!
//! This module provides the main application state and logic. It owns the
//! text being transformed, the saved notes list, and the theme, and renders
//! both tabs.
use anyhow::{Context, Result};
use arboard::Clipboard;
use chrono::{Local, NaiveDateTime};
use log::{error, info};
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Tabs, Wrap},
};

use super::notes_panel::NotesPanel;
use crate::cipher::{CipherTable, Mode};
use crate::prefs::{Palette, PreferenceStore, ThemePreference};
use crate::store::{NoteEntry, NoteStore};

const INPUT_PLACEHOLDER: &str = "Type your message here...";
const RESULT_PLACEHOLDER: &str = "Encrypted/Decrypted result here...";
const TAB_TITLES: [&str; 2] = ["Main", "Notes Viewer"];

/// Tab currently shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab
{
    /// Input, mode selector and result
    Main,
    /// Saved note lines
    Notes,
}

impl Tab
{
    /// Position of the tab in the tab bar.
    const fn index(self) -> usize
    {
        match self
        {
            Self::Main => 0,
            Self::Notes => 1,
        }
    }
}

/// Application mode that determines the current UI state.
///
/// Controls what is displayed and how user input is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode
{
    /// Regular interaction with the current tab
    Normal,
    /// Help overlay is displayed
    Help,
    /// Waiting for the user to confirm deleting the selected note
    ConfirmDelete,
}

/// Message shown in the status line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status
{
    /// Text of the message
    pub message: String,
    /// Whether the message reports success
    pub success: bool,
}

impl Status
{
    fn ok(message: impl Into<String>) -> Self
    {
        Self {
            message: message.into(),
            success: true,
        }
    }

    fn warn(message: impl Into<String>) -> Self
    {
        Self {
            message: message.into(),
            success: false,
        }
    }
}

/// Main application state.
pub struct App<'cipher>
{
    /// Substitution tables shared with the caller
    cipher: &'cipher CipherTable,
    /// Flat file the notes are saved to
    notes: NoteStore,
    /// File the theme preference is saved to
    prefs: PreferenceStore,
    /// Clipboard handle, opened on first copy and kept so the contents
    /// survive on platforms where the owner must stay alive
    clipboard: Option<Clipboard>,
    /// Active theme
    pub theme: ThemePreference,
    /// Tab currently shown
    pub tab: Tab,
    /// Current application mode
    pub mode: AppMode,
    /// Transform direction selected on the main tab
    pub cipher_mode: Mode,
    /// Text typed by the user
    pub input: String,
    /// Transform output for the current input
    pub result: String,
    /// Last status message
    pub status: Option<Status>,
    /// Saved notes list
    pub notes_panel: NotesPanel,
    /// Flag indicating if the application should exit
    pub should_quit: bool,
}

impl<'cipher> App<'cipher>
{
    /// Creates the application state.
    ///
    /// Loads the theme preference and the saved notes. A note file that
    /// cannot be read is reported in the status line instead of failing.
    ///
    /// # Arguments
    ///
    /// * `cipher` - The substitution tables
    /// * `notes` - The note store
    /// * `prefs` - The theme preference store
    ///
    /// # Returns
    ///
    /// A new `App` on the main tab in encrypt mode
    #[must_use]
    pub fn new(cipher: &'cipher CipherTable, notes: NoteStore, prefs: PreferenceStore) -> Self
    {
        let theme = prefs.load();

        let mut app = Self {
            cipher,
            notes,
            prefs,
            clipboard: None,
            theme,
            tab: Tab::Main,
            mode: AppMode::Normal,
            cipher_mode: Mode::Encrypt,
            input: String::new(),
            result: String::new(),
            status: None,
            notes_panel: NotesPanel::default(),
            should_quit: false,
        };
        app.reload_notes();
        app
    }

    /// Switches to the other tab.
    pub const fn next_tab(&mut self)
    {
        self.tab = match self.tab
        {
            Tab::Main => Tab::Notes,
            Tab::Notes => Tab::Main,
        };
    }

    /// Toggles the help overlay.
    pub fn toggle_help(&mut self)
    {
        self.mode = if self.mode == AppMode::Help
        {
            AppMode::Normal
        }
        else
        {
            AppMode::Help
        };
    }

    /// Adds a character to the input.
    pub fn insert_char(&mut self, ch: char)
    {
        self.input.push(ch);
        self.process_live();
    }

    /// Removes the last character of the input.
    pub fn remove_char(&mut self)
    {
        self.input.pop();
        self.process_live();
    }

    /// Recomputes the result from the trimmed input.
    pub fn process_live(&mut self)
    {
        let text = self.input.trim();
        if text.is_empty()
        {
            self.result.clear();
            return;
        }

        self.result = self
            .cipher
            .apply(self.cipher_mode, text);
    }

    /// Selects the transform direction.
    ///
    /// Changing the direction clears the input, the result and the status.
    pub fn set_cipher_mode(&mut self, mode: Mode)
    {
        if self.cipher_mode != mode
        {
            self.cipher_mode = mode;
            self.clear_all();
        }
    }

    /// Flips between encrypt and decrypt.
    pub fn toggle_cipher_mode(&mut self)
    {
        self.set_cipher_mode(self.cipher_mode.toggled());
    }

    /// Clears the input, the result and the status.
    pub fn clear_all(&mut self)
    {
        self.input.clear();
        self.result.clear();
        self.status = None;
    }

    /// Copies the result to the system clipboard.
    pub fn copy_result(&mut self)
    {
        if self.result.is_empty()
        {
            self.status = Some(Status::warn("Nothing to copy"));
            return;
        }

        let text = self.result.clone();
        self.status = Some(match self.write_clipboard(&text)
        {
            Ok(()) => Status::ok("Copied to clipboard"),
            Err(err) =>
            {
                error!("{err:#}");
                Status::warn("Clipboard unavailable")
            }
        });
    }

    /// Hands `text` to the clipboard, opening it on first use.
    fn write_clipboard(&mut self, text: &str) -> Result<()>
    {
        if self.clipboard.is_none()
        {
            self.clipboard = Some(Clipboard::new().context("Failed to open clipboard")?);
        }

        if let Some(clipboard) = self.clipboard.as_mut()
        {
            clipboard
                .set_text(text.to_owned())
                .context("Failed to write to clipboard")?;
        }

        Ok(())
    }

    /// Saves the result as a note stamped with the current local time.
    pub fn save_note(&mut self)
    {
        self.save_note_at(Local::now().naive_local());
    }

    /// Saves the result as a note stamped with `timestamp`.
    ///
    /// # Arguments
    ///
    /// * `timestamp` - Time recorded in the entry
    pub fn save_note_at(&mut self, timestamp: NaiveDateTime)
    {
        if self.result.is_empty()
        {
            self.status = Some(Status::warn("Nothing to save"));
            return;
        }

        let entry = NoteEntry::new(self.cipher_mode, timestamp, &self.result);
        if let Err(err) = self.notes.append_entry(&entry)
        {
            error!("{err:#}");
            self.status = Some(Status::warn("Could not save note"));
            return;
        }

        info!("Saved {} note", entry.mode.label());
        self.reload_notes();
        self.status = Some(Status::ok("Saved to notes"));
    }

    /// Re-reads the note file into the notes list.
    pub fn reload_notes(&mut self)
    {
        match self.notes.load()
        {
            Ok(lines) => self.notes_panel.set_lines(lines),
            Err(err) =>
            {
                error!("{err:#}");
                self.status = Some(Status::warn("Could not read notes"));
            }
        }
    }

    /// Asks for confirmation before deleting the selected note.
    pub fn request_delete(&mut self)
    {
        if self.notes_panel.selected().is_none()
        {
            self.status = Some(Status::warn("No line selected to delete"));
            return;
        }

        self.mode = AppMode::ConfirmDelete;
    }

    /// Deletes the selected note from the file and the list.
    pub fn confirm_delete(&mut self)
    {
        self.mode = AppMode::Normal;

        let Some(index) = self.notes_panel.selected()
        else
        {
            return;
        };

        self.status = Some(match self.notes.delete(index)
        {
            Ok(Some(line)) =>
            {
                info!("Deleted note line {index}: {line}");
                Status::ok("Deleted line")
            }
            Ok(None) => Status::warn("Note file changed, nothing deleted"),
            Err(err) =>
            {
                error!("{err:#}");
                Status::warn("Could not delete line")
            }
        });
        self.reload_notes();
    }

    /// Leaves the delete confirmation without deleting.
    pub fn cancel_delete(&mut self)
    {
        self.mode = AppMode::Normal;
    }

    /// Switches between the dark and light theme and saves the choice.
    pub fn toggle_theme(&mut self)
    {
        self.theme = self.theme.toggled();
        info!("Theme switched, dark mode: {}", self.theme.dark_mode);

        if let Err(err) = self.prefs.save(self.theme)
        {
            error!("{err:#}");
            self.status = Some(Status::warn("Could not save theme preference"));
        }
    }

    /// Decoded form of the selected note.
    ///
    /// Encrypted entries are decrypted and decrypted entries re-encrypted.
    ///
    /// # Returns
    ///
    /// `None` if nothing is selected or the line isn't a note entry.
    #[must_use]
    pub fn selected_preview(&self) -> Option<String>
    {
        let entry = NoteEntry::parse(self.notes_panel.selected_line()?)?;
        Some(
            self.cipher
                .apply(entry.mode.toggled(), &entry.text),
        )
    }

    /// Renders the application UI to the provided frame.
    ///
    /// # Arguments
    ///
    /// * `frame` - The frame to render the UI to
    pub fn render(&mut self, frame: &mut Frame)
    {
        let palette = self.theme.palette();
        let size = frame.area();

        frame.render_widget(
            Block::default().style(Style::default().bg(palette.background).fg(palette.text)),
            size,
        );

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(size);

        let tabs = Tabs::new(TAB_TITLES)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Cipher Notes"),
            )
            .select(self.tab.index())
            .highlight_style(
                Style::default()
                    .fg(palette.highlight)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        match self.tab
        {
            Tab::Main => self.render_main(frame, chunks[1], palette),
            Tab::Notes => self.render_notes(frame, chunks[1], palette),
        }

        if let Some(status) = &self.status
        {
            let color = if status.success
            {
                palette.success
            }
            else
            {
                palette.failure
            };
            frame.render_widget(
                Paragraph::new(status.message.as_str()).style(Style::default().fg(color)),
                chunks[2],
            );
        }

        frame.render_widget(
            Paragraph::new(self.key_hints()).style(Style::default().add_modifier(Modifier::DIM)),
            chunks[3],
        );

        match self.mode
        {
            AppMode::Help => Self::render_help(frame),
            AppMode::ConfirmDelete => self.render_confirm_delete(frame),
            AppMode::Normal =>
            {}
        }
    }

    /// One-line reminder of the most used keys for the current tab.
    const fn key_hints(&self) -> &'static str
    {
        match self.tab
        {
            Tab::Main => "Tab: notes  ^E: mode  ^Y: copy  ^L: clear  ^S: save  ^T: theme  F1: help  ^Q: quit",
            Tab::Notes => "Tab: main  j/k: move  d: delete  r: reload  ^T: theme  ?: help  q: quit",
        }
    }

    /// Renders the mode selector, the input and the result.
    fn render_main(&self, frame: &mut Frame, area: Rect, palette: Palette)
    {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(5),
                Constraint::Length(8),
            ])
            .split(area);

        let radio = |mode: Mode| {
            let marker = if self.cipher_mode == mode { "(*)" } else { "( )" };
            Span::raw(format!(" {marker} {mode}   "))
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![radio(Mode::Encrypt), radio(Mode::Decrypt)])),
            chunks[0],
        );

        let input = if self.input.is_empty()
        {
            Text::from(Span::styled(
                INPUT_PLACEHOLDER,
                Style::default().add_modifier(Modifier::DIM),
            ))
        }
        else
        {
            Text::from(format!("{}\u{258f}", self.input))
        };
        frame.render_widget(
            Paragraph::new(input)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Message"),
                )
                .style(Style::default().fg(palette.text).bg(palette.panel))
                .wrap(Wrap { trim: false }),
            chunks[1],
        );

        let result = if self.result.is_empty()
        {
            Text::from(Span::styled(
                RESULT_PLACEHOLDER,
                Style::default().add_modifier(Modifier::DIM),
            ))
        }
        else
        {
            Text::from(self.result.as_str())
        };
        frame.render_widget(
            Paragraph::new(result)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Result"),
                )
                .style(Style::default().fg(palette.result).bg(palette.panel))
                .wrap(Wrap { trim: false }),
            chunks[2],
        );
    }

    /// Renders the notes list and the preview of the selected note.
    fn render_notes(&mut self, frame: &mut Frame, area: Rect, palette: Palette)
    {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(3)])
            .split(area);

        self.notes_panel
            .render(frame, chunks[0], palette);

        let preview = self
            .selected_preview()
            .unwrap_or_default();
        frame.render_widget(
            Paragraph::new(preview)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title("Decoded"),
                )
                .style(Style::default().fg(palette.result).bg(palette.panel)),
            chunks[1],
        );
    }

    /// Renders the help overlay with keyboard shortcuts.
    ///
    /// # Arguments
    ///
    /// * `frame` - The frame to render the help overlay to
    fn render_help(frame: &mut Frame)
    {
        let area = centered_rect(60, 70, frame.area());

        // Clear the area first to make it fully opaque
        frame.render_widget(Clear, area);

        let text = Text::from(vec![
            Line::from("Cipher Notes Help:"),
            Line::from(""),
            Line::from("Tab: Switch between Main and Notes Viewer"),
            Line::from("Ctrl+T: Toggle dark/light theme"),
            Line::from("Ctrl+Q: Quit"),
            Line::from(""),
            Line::from("Main tab:"),
            Line::from("  Ctrl+E: Switch Encrypt/Decrypt (clears input)"),
            Line::from("  Ctrl+Y: Copy result"),
            Line::from("  Ctrl+L: Clear"),
            Line::from("  Ctrl+S: Save result to notes"),
            Line::from(""),
            Line::from("Notes Viewer:"),
            Line::from("  j/k or Down/Up: Move selection"),
            Line::from("  g/G: First/last note"),
            Line::from("  d or Delete: Delete selected line"),
            Line::from("  r: Reload notes"),
            Line::from("  q/Esc: Quit"),
            Line::from(""),
            Line::from("F1 or ? (notes): Toggle help"),
        ]);

        let help_box = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help")
                    .style(Style::default()),
            )
            .style(Style::default())
            .wrap(Wrap { trim: true });

        frame.render_widget(help_box, area);
    }

    /// Renders the delete confirmation popup.
    fn render_confirm_delete(&self, frame: &mut Frame)
    {
        let area = centered_rect(60, 30, frame.area());

        frame.render_widget(Clear, area);

        let text = Text::from(vec![
            Line::from("Delete this line?"),
            Line::from(""),
            Line::from(
                self.notes_panel
                    .selected_line()
                    .unwrap_or_default(),
            ),
            Line::from(""),
            Line::from("y/Enter: delete   n/Esc: cancel"),
        ]);

        let confirm_box = Paragraph::new(text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Confirm Delete"),
            )
            .wrap(Wrap { trim: false });

        frame.render_widget(confirm_box, area);
    }
}

/// Creates a centered rectangle inside the given area.
///
/// # Arguments
///
/// * `percent_x` - Width of the rectangle as a percentage of the parent area
/// * `percent_y` - Height of the rectangle as a percentage of the parent area
/// * `area` - Parent rectangle
///
/// # Returns
///
/// A new rectangle positioned in the center of the parent
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect
{
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests
{
    use super::*;
    use chrono::NaiveDate;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use tempfile::TempDir;

    fn stores(dir: &TempDir) -> (NoteStore, PreferenceStore)
    {
        (
            NoteStore::new(dir.path().join("ciphernotes.txt")),
            PreferenceStore::new(dir.path().join("theme.json")),
        )
    }

    fn timestamp() -> NaiveDateTime
    {
        NaiveDate::from_ymd_opt(2025, 1, 2)
            .and_then(|date| date.and_hms_opt(3, 4, 5))
            .unwrap()
    }

    fn type_text(app: &mut App, text: &str)
    {
        for ch in text.chars()
        {
            app.insert_char(ch);
        }
    }

    #[test]
    fn typing_updates_the_result_live()
    {
        let dir = tempfile::tempdir().unwrap();
        let cipher = CipherTable::new();
        let (notes, prefs) = stores(&dir);
        let mut app = App::new(&cipher, notes, prefs);

        type_text(&mut app, "  Hello ");
        assert_eq!(app.result, "ignnw");

        app.remove_char();
        app.remove_char();
        assert_eq!(app.result, "ignn");

        app.clear_all();
        type_text(&mut app, "   ");
        assert!(app.result.is_empty());
    }

    #[test]
    fn switching_mode_clears_everything()
    {
        let dir = tempfile::tempdir().unwrap();
        let cipher = CipherTable::new();
        let (notes, prefs) = stores(&dir);
        let mut app = App::new(&cipher, notes, prefs);

        type_text(&mut app, "hello");
        app.status = Some(Status::ok("Copied to clipboard"));
        app.toggle_cipher_mode();

        assert_eq!(app.cipher_mode, Mode::Decrypt);
        assert!(app.input.is_empty());
        assert!(app.result.is_empty());
        assert_eq!(app.status, None);

        type_text(&mut app, "ignnw");
        assert_eq!(app.result, "hello");

        // Selecting the current mode again keeps the input.
        app.set_cipher_mode(Mode::Decrypt);
        assert_eq!(app.input, "ignnw");
    }

    #[test]
    fn empty_result_cannot_be_copied_or_saved()
    {
        let dir = tempfile::tempdir().unwrap();
        let cipher = CipherTable::new();
        let (notes, prefs) = stores(&dir);
        let mut app = App::new(&cipher, notes.clone(), prefs);

        app.copy_result();
        assert_eq!(app.status, Some(Status::warn("Nothing to copy")));

        app.save_note_at(timestamp());
        assert_eq!(app.status, Some(Status::warn("Nothing to save")));
        assert!(notes.load().unwrap().is_empty());
    }

    #[test]
    fn saving_appends_an_entry_and_refreshes_the_list()
    {
        let dir = tempfile::tempdir().unwrap();
        let cipher = CipherTable::new();
        let (notes, prefs) = stores(&dir);
        let mut app = App::new(&cipher, notes.clone(), prefs);

        type_text(&mut app, "hello");
        app.save_note_at(timestamp());

        let expected = "ENCRYPTED [2025-01-02 03:04:05]: ignnw".to_string();
        assert_eq!(app.status, Some(Status::ok("Saved to notes")));
        assert_eq!(notes.load().unwrap(), vec![expected.clone()]);
        assert_eq!(app.notes_panel.lines(), [expected]);
        assert_eq!(app.selected_preview().as_deref(), Some("hello"));
    }

    #[test]
    fn preview_re_encrypts_decrypted_entries()
    {
        let dir = tempfile::tempdir().unwrap();
        let cipher = CipherTable::new();
        let (notes, prefs) = stores(&dir);
        notes.append("DECRYPTED [2025-01-02 03:04:05]: hello").unwrap();
        notes.append("free text line").unwrap();

        let mut app = App::new(&cipher, notes, prefs);
        assert_eq!(app.selected_preview().as_deref(), Some("ignnw"));

        app.notes_panel.next();
        assert_eq!(app.selected_preview(), None);
    }

    #[test]
    fn delete_needs_a_selection()
    {
        let dir = tempfile::tempdir().unwrap();
        let cipher = CipherTable::new();
        let (notes, prefs) = stores(&dir);
        let mut app = App::new(&cipher, notes, prefs);

        app.request_delete();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.status, Some(Status::warn("No line selected to delete")));
    }

    #[test]
    fn delete_waits_for_confirmation()
    {
        let dir = tempfile::tempdir().unwrap();
        let cipher = CipherTable::new();
        let (notes, prefs) = stores(&dir);
        for line in ["one", "two", "three"]
        {
            notes.append(line).unwrap();
        }
        let mut app = App::new(&cipher, notes.clone(), prefs);
        app.notes_panel.next();

        app.request_delete();
        assert_eq!(app.mode, AppMode::ConfirmDelete);
        app.cancel_delete();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(notes.load().unwrap().len(), 3);

        app.request_delete();
        app.confirm_delete();
        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.status, Some(Status::ok("Deleted line")));
        assert_eq!(
            notes.load().unwrap(),
            vec!["one".to_string(), "three".to_string()]
        );
        assert_eq!(app.notes_panel.selected_line(), Some("three"));
    }

    #[test]
    fn theme_toggle_is_persisted()
    {
        let dir = tempfile::tempdir().unwrap();
        let cipher = CipherTable::new();
        let (notes, prefs) = stores(&dir);
        let mut app = App::new(&cipher, notes, prefs.clone());
        assert!(app.theme.dark_mode);

        app.toggle_theme();
        assert!(!app.theme.dark_mode);
        assert!(!prefs.load().dark_mode);
    }

    #[test]
    fn both_tabs_render()
    {
        let dir = tempfile::tempdir().unwrap();
        let cipher = CipherTable::new();
        let (notes, prefs) = stores(&dir);
        notes.append("ENCRYPTED [2025-01-02 03:04:05]: ignnw").unwrap();
        let mut app = App::new(&cipher, notes, prefs);
        type_text(&mut app, "hello");

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();

        app.next_tab();
        app.request_delete();
        terminal.draw(|frame| app.render(frame)).unwrap();

        app.cancel_delete();
        app.toggle_help();
        terminal.draw(|frame| app.render(frame)).unwrap();
        assert_eq!(app.mode, AppMode::Help);
    }
}
