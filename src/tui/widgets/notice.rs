//! Blocking notice dialog.
//!
//! Shown when a submission is refused, for example because a field is
//! empty. Dismissed with Enter or Esc.

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Renders the notice dialog centered over the screen.
pub fn render_notice_dialog(frame: &mut Frame, message: &str) {
    let area = frame.area();

    let dialog_width = (area.width as f32 * 0.6).clamp(20.0, 64.0) as u16;
    let dialog_width = dialog_width.min(area.width);
    let text_lines = wrap_words(message, dialog_width.saturating_sub(4) as usize);
    let dialog_height = dialog_height(text_lines.len()).min(area.height);

    let dialog_area = center_rect(dialog_width, dialog_height, area);
    frame.render_widget(Clear, dialog_area);

    let mut lines: Vec<Line> = text_lines
        .into_iter()
        .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::White))))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![Span::styled(
        "[Enter/Esc] OK",
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )]));

    let block = Block::default()
        .title(" Notice ")
        .title_alignment(Alignment::Center)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .style(Style::default().bg(Color::Black));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, dialog_area);
}

/// Message lines + spacing (1) + prompt (1) + borders (2).
fn dialog_height(message_lines: usize) -> u16 {
    (message_lines.min(6) + 1 + 1 + 2) as u16
}

/// Greedy word wrap by character count.
fn wrap_words(text: &str, max_width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = current.chars().count() + word.chars().count() + 1;
        if current.is_empty() {
            current = word.to_string();
        } else if needed <= max_width {
            current.push(' ');
            current.push_str(word);
        } else {
            lines.push(std::mem::take(&mut current));
            current = word.to_string();
        }
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }

    lines
}

/// Centers a rectangle of the given size within the parent area.
fn center_rect(width: u16, height: u16, area: Rect) -> Rect {
    let horizontal = Layout::horizontal([Constraint::Length(width)]).flex(Flex::Center);
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);

    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::VALIDATION_MESSAGE;
    use ratatui::{backend::TestBackend, Terminal};

    #[test]
    fn test_wrap_words() {
        assert_eq!(wrap_words("short", 20), vec!["short"]);
        assert_eq!(
            wrap_words("Please fill in both fields", 12),
            vec!["Please fill", "in both", "fields"]
        );
        assert_eq!(wrap_words("", 10), vec![""]);
    }

    #[test]
    fn test_dialog_height() {
        assert_eq!(dialog_height(1), 5);
        assert_eq!(dialog_height(20), 10);
    }

    #[test]
    fn test_center_rect() {
        let area = Rect::new(0, 0, 100, 50);
        let centered = center_rect(40, 10, area);
        assert_eq!(centered, Rect::new(30, 20, 40, 10));
    }

    #[test]
    fn test_render_shows_message() {
        let mut terminal = Terminal::new(TestBackend::new(80, 20)).unwrap();
        terminal
            .draw(|f| render_notice_dialog(f, VALIDATION_MESSAGE))
            .unwrap();

        let buffer = terminal.backend().buffer();
        let screen: String = (0..20u16)
            .flat_map(|y| (0..80u16).map(move |x| (x, y)))
            .map(|(x, y)| buffer[(x, y)].symbol().to_string())
            .collect();
        assert!(screen.contains("Notice"));
        assert!(screen.contains("Database URL"));
    }
}
