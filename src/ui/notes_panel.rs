//! Notes Panel
//!
//! Lists the saved note lines and tracks which one is selected.
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use textwrap::wrap;

use crate::prefs::Palette;

const NOTES_HIGHLIGHT_SYMBOL: &str = "> ";

/// Selectable list of note lines.
#[derive(Debug, Default)]
pub struct NotesPanel
{
    /// Note lines in file order
    lines: Vec<String>,
    /// Current selection state
    state: ListState,
}

impl NotesPanel
{
    /// Creates a panel showing `lines`, selecting the first one.
    ///
    /// # Arguments
    ///
    /// * `lines` - The note lines to display
    ///
    /// # Returns
    ///
    /// A new `NotesPanel` instance
    #[must_use]
    pub fn new(lines: Vec<String>) -> Self
    {
        let mut panel = Self::default();
        panel.set_lines(lines);
        panel
    }

    /// Replaces the displayed lines.
    ///
    /// The selection keeps its position, moved up if the list got shorter.
    pub fn set_lines(&mut self, lines: Vec<String>)
    {
        self.lines = lines;

        let selected = match (self.state.selected(), self.lines.len())
        {
            (_, 0) => None,
            (None, _) => Some(0),
            (Some(index), len) => Some(index.min(len.saturating_sub(1))),
        };
        self.state.select(selected);
    }

    /// The displayed lines.
    #[must_use]
    pub fn lines(&self) -> &[String]
    {
        &self.lines
    }

    /// Index of the selected line, if any.
    #[must_use]
    pub fn selected(&self) -> Option<usize>
    {
        self.state
            .selected()
            .filter(|&index| index < self.lines.len())
    }

    /// Text of the selected line, if any.
    #[must_use]
    pub fn selected_line(&self) -> Option<&str>
    {
        self.selected()
            .and_then(|index| self.lines.get(index))
            .map(String::as_str)
    }

    /// Moves the selection to the next line.
    pub fn next(&mut self)
    {
        if let Some(index) = self.selected()
        {
            let last = self.lines.len().saturating_sub(1);
            self.state
                .select(Some(index.saturating_add(1).min(last)));
        }
    }

    /// Moves the selection to the previous line.
    pub fn previous(&mut self)
    {
        if let Some(index) = self.selected()
        {
            self.state
                .select(Some(index.saturating_sub(1)));
        }
    }

    /// Selects the first line.
    pub fn first(&mut self)
    {
        if !self.lines.is_empty()
        {
            self.state.select(Some(0));
        }
    }

    /// Selects the last line.
    pub fn last(&mut self)
    {
        if let Some(last) = self.lines.len().checked_sub(1)
        {
            self.state.select(Some(last));
        }
    }

    /// Renders the list to the specified area.
    ///
    /// # Arguments
    ///
    /// * `frame` - The frame to render to
    /// * `area` - The area within the frame to render the panel
    /// * `palette` - Colors of the active theme
    pub fn render(&mut self, frame: &mut Frame, area: Rect, palette: Palette)
    {
        // Long entries are wrapped to fit within the panel width.
        // 2 for the border
        let wrap_width = usize::from(area.width)
            .saturating_sub(NOTES_HIGHLIGHT_SYMBOL.len() + 2)
            .max(1);

        let items: Vec<ListItem> = self
            .lines
            .iter()
            .map(|line| {
                let wrapped = wrap(line, wrap_width)
                    .into_iter()
                    .map(Line::raw)
                    .collect::<Vec<Line>>();

                ListItem::new(wrapped)
            })
            .collect();

        let title = format!("Saved notes ({})", self.lines.len());

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(title)
                    .title_alignment(Alignment::Left)
                    .title_style(Style::new().add_modifier(Modifier::BOLD)),
            )
            .style(Style::new().fg(palette.text).bg(palette.list))
            .highlight_style(
                Style::new()
                    .fg(palette.highlight)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol(NOTES_HIGHLIGHT_SYMBOL);

        frame.render_stateful_widget(list, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    fn panel(count: usize) -> NotesPanel
    {
        NotesPanel::new((0..count).map(|index| format!("line {index}")).collect())
    }

    #[test]
    fn empty_panel_has_no_selection()
    {
        let mut notes = panel(0);
        notes.next();
        notes.last();
        assert_eq!(notes.selected(), None);
        assert_eq!(notes.selected_line(), None);
    }

    #[test]
    fn navigation_stays_in_bounds()
    {
        let mut notes = panel(3);
        assert_eq!(notes.selected(), Some(0));

        notes.previous();
        assert_eq!(notes.selected(), Some(0));

        notes.next();
        notes.next();
        notes.next();
        assert_eq!(notes.selected(), Some(2));
        assert_eq!(notes.selected_line(), Some("line 2"));

        notes.first();
        assert_eq!(notes.selected(), Some(0));
        notes.last();
        assert_eq!(notes.selected(), Some(2));
    }

    #[test]
    fn shrinking_the_list_clamps_the_selection()
    {
        let mut notes = panel(3);
        notes.last();

        notes.set_lines(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(notes.selected(), Some(1));

        notes.set_lines(Vec::new());
        assert_eq!(notes.selected(), None);

        notes.set_lines(vec!["c".to_string()]);
        assert_eq!(notes.selected(), Some(0));
    }
}
