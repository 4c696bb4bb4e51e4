//! Input widget for the TUI.
//!
//! A single-line, labelled text field that scrolls horizontally to keep the
//! cursor visible.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

/// Width of the "> " prompt.
pub const PROMPT_WIDTH: u16 = 2;

/// Calculates the scroll offset needed to keep the cursor visible.
///
/// Returns the number of characters to skip from the start of the text.
pub fn calculate_scroll_offset(cursor: usize, available_width: usize) -> usize {
    cursor.saturating_sub(available_width)
}

/// Available text width inside an input of the given outer width.
///
/// Border left (1) + prompt (2) + border right (1) + cursor space (1).
pub fn available_width(area_width: u16) -> usize {
    area_width.saturating_sub(3 + PROMPT_WIDTH) as usize
}

/// Input bar widget.
pub struct InputBar<'a> {
    title: &'a str,
    text: &'a str,
    cursor: usize,
    focused: bool,
    placeholder: Option<&'a str>,
}

impl<'a> InputBar<'a> {
    /// Creates a new input bar widget.
    pub fn new(title: &'a str, text: &'a str, cursor: usize, focused: bool) -> Self {
        Self {
            title,
            text,
            cursor,
            focused,
            placeholder: None,
        }
    }

    /// Text shown dimmed while the field is empty.
    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!(" {} ", self.title));

        let prompt_style = Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD);

        let scroll_offset = calculate_scroll_offset(self.cursor, available_width(area.width));
        let visible: String = self.text.chars().skip(scroll_offset).collect();

        let body = match self.placeholder {
            Some(placeholder) if self.text.is_empty() => Span::styled(
                placeholder,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
            _ => Span::raw(visible),
        };

        let line = Line::from(vec![Span::styled("> ", prompt_style), body]);
        Paragraph::new(line).block(block).render(area, buf);
    }
}
