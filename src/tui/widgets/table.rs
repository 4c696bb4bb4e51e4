//! Result table widget for the TUI.
//!
//! Renders a [`TableContent`] grid with box borders, auto-sized columns and
//! styled NULL values.

use crate::render::{Cell, TableContent, NO_DATA_MESSAGE};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Maximum width for any column.
const MAX_COLUMN_WIDTH: usize = 40;

/// Minimum width for any column.
const MIN_COLUMN_WIDTH: usize = 4;

/// Renders a result grid as lines for embedding in the results panel.
pub struct ResultTable<'a> {
    content: &'a TableContent,
}

impl<'a> ResultTable<'a> {
    /// Creates a new result table.
    pub fn new(content: &'a TableContent) -> Self {
        Self { content }
    }

    /// Calculates the width of each column, capped at [`MAX_COLUMN_WIDTH`].
    fn calculate_column_widths(headers: &[String], rows: &[Vec<Cell>]) -> Vec<usize> {
        let mut widths: Vec<usize> = headers
            .iter()
            .map(|h| h.chars().count().max(MIN_COLUMN_WIDTH))
            .collect();

        for row in rows {
            for (i, cell) in row.iter().enumerate() {
                if i < widths.len() {
                    widths[i] = widths[i].max(cell.as_display().chars().count());
                }
            }
        }

        widths.iter().map(|&w| w.min(MAX_COLUMN_WIDTH)).collect()
    }

    /// Truncates a string to fit within the given width, adding ellipsis if needed.
    fn truncate(s: &str, max_width: usize) -> String {
        if s.chars().count() <= max_width {
            s.to_string()
        } else if max_width <= 3 {
            s.chars().take(max_width).collect()
        } else {
            let kept: String = s.chars().take(max_width - 3).collect();
            format!("{kept}...")
        }
    }

    fn pad(s: &str, width: usize) -> String {
        let fill = width.saturating_sub(s.chars().count());
        format!(" {s}{} ", " ".repeat(fill))
    }

    /// Renders the table to lines, shrinking columns to fit `available_width`.
    pub fn render_to_lines(&self, available_width: usize) -> Vec<Line<'static>> {
        let (headers, rows) = match self.content {
            TableContent::Empty => {
                return vec![Line::from(Span::styled(
                    NO_DATA_MESSAGE,
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::ITALIC),
                ))];
            }
            TableContent::Grid { headers, rows } => (headers, rows),
        };

        let widths = Self::calculate_column_widths(headers, rows);

        let total_width: usize = widths.iter().sum::<usize>() + widths.len() * 3 + 1;
        let scale_factor = if total_width > available_width && available_width > 0 {
            available_width as f64 / total_width as f64
        } else {
            1.0
        };

        let widths: Vec<usize> = widths
            .iter()
            .map(|&w| ((w as f64 * scale_factor) as usize).max(MIN_COLUMN_WIDTH))
            .collect();

        let mut lines = Vec::with_capacity(rows.len() + 5);
        lines.push(Self::render_border(&widths, '┌', '┬', '┐'));
        lines.push(Self::render_header_row(headers, &widths));
        lines.push(Self::render_border(&widths, '├', '┼', '┤'));
        for row in rows {
            lines.push(Self::render_data_row(row, &widths));
        }
        lines.push(Self::render_border(&widths, '└', '┴', '┘'));

        let count = rows.len();
        lines.push(Line::from(Span::styled(
            format!("{} row{}", count, if count == 1 { "" } else { "s" }),
            Style::default().fg(Color::DarkGray),
        )));

        lines
    }

    fn render_border(widths: &[usize], left: char, mid: char, right: char) -> Line<'static> {
        let segments: Vec<String> = widths.iter().map(|&w| "─".repeat(w + 2)).collect();
        let border = format!("{left}{}{right}", segments.join(&mid.to_string()));
        Line::from(Span::styled(border, Style::default().fg(Color::DarkGray)))
    }

    fn render_header_row(headers: &[String], widths: &[usize]) -> Line<'static> {
        let separator = Style::default().fg(Color::DarkGray);
        let mut spans = vec![Span::styled("│", separator)];

        for (i, name) in headers.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(MIN_COLUMN_WIDTH);
            spans.push(Span::styled(
                Self::pad(&Self::truncate(name, width), width),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled("│", separator));
        }

        Line::from(spans)
    }

    fn render_data_row(row: &[Cell], widths: &[usize]) -> Line<'static> {
        let separator = Style::default().fg(Color::DarkGray);
        let mut spans = vec![Span::styled("│", separator)];

        for (i, cell) in row.iter().enumerate() {
            let width = widths.get(i).copied().unwrap_or(MIN_COLUMN_WIDTH);
            let style = if cell.is_null() {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC)
            } else {
                Style::default()
            };

            spans.push(Span::styled(
                Self::pad(&Self::truncate(cell.as_display(), width), width),
                style,
            ));
            spans.push(Span::styled("│", separator));
        }

        Line::from(spans)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn sample() -> TableContent {
        TableContent::Grid {
            headers: vec!["id".into(), "name".into(), "email".into()],
            rows: vec![
                vec![
                    Cell::Value("1".into()),
                    Cell::Value("Alice".into()),
                    Cell::Value("alice@test.com".into()),
                ],
                vec![Cell::Value("2".into()), Cell::Value("Bob".into()), Cell::Null],
                vec![Cell::Value("3".into()), Cell::Missing, Cell::Missing],
            ],
        }
    }

    #[test]
    fn test_calculate_column_widths() {
        let TableContent::Grid { headers, rows } = sample() else {
            unreachable!()
        };
        let widths = ResultTable::calculate_column_widths(&headers, &rows);
        assert_eq!(widths, vec![4, 5, 14]);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(ResultTable::truncate("hello", 10), "hello");
        assert_eq!(ResultTable::truncate("hello world", 8), "hello...");
        assert_eq!(ResultTable::truncate("hello", 3), "hel");
        assert_eq!(ResultTable::truncate("日本語テキスト", 5), "日本...");
    }

    #[test]
    fn test_render_to_lines() {
        let content = sample();
        let lines = ResultTable::new(&content).render_to_lines(80);

        // top border, header, separator, 3 rows, bottom border, footer
        assert_eq!(lines.len(), 8);
        assert_eq!(line_text(&lines[7]), "3 rows");
        assert!(line_text(&lines[4]).contains("NULL"));
        assert_eq!(
            line_text(&lines[5]),
            "│ 3    │       │                │"
        );
    }

    #[test]
    fn test_null_is_styled() {
        let content = sample();
        let lines = ResultTable::new(&content).render_to_lines(80);
        let null_span = lines[4]
            .spans
            .iter()
            .find(|s| s.content.contains("NULL"))
            .unwrap();
        assert!(null_span.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_empty_is_placeholder() {
        let lines = ResultTable::new(&TableContent::Empty).render_to_lines(80);
        assert_eq!(lines.len(), 1);
        assert_eq!(line_text(&lines[0]), NO_DATA_MESSAGE);
    }
}
