//! Header widget for the TUI.
//!
//! Displays the application name, the busy spinner and the service's
//! classification of the last prompt.

use super::spinner::Spinner;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Span,
    widgets::Widget,
};

/// Header bar widget.
pub struct Header<'a> {
    endpoint: &'a str,
    spinner: Option<&'a Spinner>,
    analysis: Option<String>,
}

impl<'a> Header<'a> {
    /// Creates a new header widget.
    pub fn new(endpoint: &'a str, spinner: Option<&'a Spinner>, analysis: Option<String>) -> Self {
        Self {
            endpoint,
            spinner,
            analysis,
        }
    }

    /// Text shown on the right-hand side.
    fn right_text(&self) -> String {
        match &self.analysis {
            Some(label) => format!(" [{}] {} ", label, self.endpoint),
            None => format!(" {} ", self.endpoint),
        }
    }
}

impl Widget for Header<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD);

        for x in area.left()..area.right() {
            buf[(x, area.y)].set_style(style);
        }

        let left_text = format!(" querylens v{}", env!("CARGO_PKG_VERSION"));
        let left_width = left_text.chars().count() as u16;
        buf.set_span(area.x, area.y, &Span::styled(left_text, style), area.width);

        if let Some(spinner) = self.spinner {
            let spinner_text = spinner.display();
            let spinner_style = Style::default()
                .bg(Color::Blue)
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD);
            let spinner_width = spinner_text.chars().count() as u16;
            let spinner_x = area.x + (area.width.saturating_sub(spinner_width)) / 2;
            buf.set_string(spinner_x, area.y, &spinner_text, spinner_style);
        }

        let right_text = self.right_text();
        let right_width = right_text.chars().count() as u16;
        if right_width + left_width < area.width {
            let right_x = area.right().saturating_sub(right_width);
            let right_style = Style::default().bg(Color::Blue).fg(Color::Gray);
            buf.set_string(right_x, area.y, &right_text, right_style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(buf: &Buffer, width: u16) -> String {
        (0..width).map(|x| buf[(x, 0u16)].symbol()).collect()
    }

    #[test]
    fn test_header_shows_name_and_endpoint() {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        Header::new("http://localhost:8000/api/query", None, None).render(area, &mut buf);

        let text = row(&buf, 80);
        assert!(text.starts_with(" querylens v"));
        assert!(text.contains("http://localhost:8000/api/query"));
    }

    #[test]
    fn test_header_shows_analysis_label() {
        let header = Header::new("http://svc", None, Some("sql/postgresql".to_string()));
        assert_eq!(header.right_text(), " [sql/postgresql] http://svc ");
    }

    #[test]
    fn test_header_shows_spinner() {
        let area = Rect::new(0, 0, 80, 1);
        let mut buf = Buffer::empty(area);
        let spinner = Spinner::querying();
        Header::new("http://svc", Some(&spinner), None).render(area, &mut buf);
        assert!(row(&buf, 80).contains("Querying"));
    }
}
