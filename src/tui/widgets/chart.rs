//! Chart lines for the results panel.
//!
//! Draws a [`Figure`] as horizontal bars, one colored group per series.
//! Pie and doughnut charts also show each slice's share of the total.

use crate::render::{ChartKind, Figure};
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

/// Colors cycled across series.
const SERIES_COLORS: &[Color] = &[
    Color::Cyan,
    Color::Magenta,
    Color::Yellow,
    Color::Green,
    Color::Blue,
    Color::Red,
];

/// Widest bar drawn, in cells.
const MAX_BAR_WIDTH: usize = 48;

/// Renders a figure to lines that fit within `available_width`.
pub fn figure_lines(figure: &Figure, available_width: usize) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if let Some(title) = &figure.title {
        lines.push(Line::from(Span::styled(
            title.clone(),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }

    let label_width = figure
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .min(available_width / 3);
    let bar_room = available_width
        .saturating_sub(label_width + 12)
        .clamp(1, MAX_BAR_WIDTH);
    let max = figure.max_value();
    let proportional = matches!(figure.kind, ChartKind::Pie | ChartKind::Doughnut);

    for (index, series) in figure.series.iter().enumerate() {
        let color = SERIES_COLORS[index % SERIES_COLORS.len()];
        lines.push(Line::from(Span::styled(
            format!("■ {}", series.label),
            Style::default().fg(color),
        )));

        let total: f64 = series.values.iter().filter(|v| **v > 0.0).sum();

        for (i, value) in series.values.iter().enumerate() {
            let label: String = figure
                .labels
                .get(i)
                .map(|l| l.chars().take(label_width).collect())
                .unwrap_or_default();
            let len = if max > 0.0 {
                ((value.max(0.0) / max) * bar_room as f64).round() as usize
            } else {
                0
            };
            let suffix = if proportional && total > 0.0 {
                format!(" {} ({:.0}%)", value, value.max(0.0) / total * 100.0)
            } else {
                format!(" {}", value)
            };

            lines.push(Line::from(vec![
                Span::styled(
                    format!("{:width$} ", label, width = label_width),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled("█".repeat(len), Style::default().fg(color)),
                Span::raw(suffix),
            ]));
        }
    }

    if figure.kind.is_xy() {
        lines.push(Line::from(Span::styled(
            "(shown as bars)",
            Style::default().fg(Color::DarkGray),
        )));
    }

    lines
}
