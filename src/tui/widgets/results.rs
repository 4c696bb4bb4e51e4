//! Results panel widget for the TUI.
//!
//! Draws every section of the current display, top to bottom, in a single
//! scrollable panel.

use super::chart::figure_lines;
use super::table::ResultTable;
use crate::render::{
    Block as MdBlock, DisplaySection, Document, Inline, InlineStyle, RenderState, SectionBody,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Results panel widget.
pub struct ResultsPanel<'a> {
    display: &'a RenderState,
    scroll: usize,
    focused: bool,
    busy: bool,
}

impl<'a> ResultsPanel<'a> {
    /// Creates a new results panel.
    pub fn new(display: &'a RenderState, scroll: usize, focused: bool, busy: bool) -> Self {
        Self {
            display,
            scroll,
            focused,
            busy,
        }
    }
}

/// Builds the panel's lines for a content width.
pub fn display_lines(display: &RenderState, width: usize, busy: bool) -> Vec<Line<'static>> {
    if display.is_empty() {
        return placeholder_lines(busy);
    }

    let mut lines = Vec::new();
    for (i, section) in display.sections().iter().enumerate() {
        if i > 0 {
            lines.push(Line::from(""));
        }
        lines.extend(section_lines(section, width));
    }
    lines
}

fn placeholder_lines(busy: bool) -> Vec<Line<'static>> {
    let hint = Style::default().fg(Color::Gray);
    if busy {
        return vec![Line::from(Span::styled("Waiting for the query service…", hint))];
    }

    vec![
        Line::from(Span::styled(
            "Ask your database a question.",
            Style::default().fg(Color::Green),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Fill in the Database URL and the Prompt, then press Enter.",
            hint,
        )),
        Line::from(""),
        Line::from(Span::styled("Keys:", Style::default().fg(Color::Yellow))),
        Line::from(Span::styled("  Tab / Shift+Tab  Move between fields", hint)),
        Line::from(Span::styled("  Enter            Submit", hint)),
        Line::from(Span::styled("  ↑/↓ PgUp/PgDn    Scroll results", hint)),
        Line::from(Span::styled("  Ctrl+Y           Copy generated query", hint)),
        Line::from(Span::styled("  Ctrl+L           Clear results", hint)),
        Line::from(Span::styled("  Ctrl+C           Quit", hint)),
    ]
}

/// Lines for one section: its heading followed by its body.
pub fn section_lines(section: &DisplaySection, width: usize) -> Vec<Line<'static>> {
    let heading_style = if section.is_error() {
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![Line::from(Span::styled(section.title.clone(), heading_style))];
    lines.extend(body_lines(&section.body, width));
    lines
}

fn body_lines(body: &SectionBody, width: usize) -> Vec<Line<'static>> {
    let dim = Style::default().fg(Color::DarkGray);
    let code = Style::default().fg(Color::Cyan);

    match body {
        SectionBody::Status(text) => vec![Line::from(text.clone())],
        SectionBody::Document(doc) => document_lines(doc),
        SectionBody::Chart(surface) => match surface.figure() {
            Some(figure) => figure_lines(figure, width),
            None => vec![Line::from(Span::styled("(empty chart)", dim))],
        },
        SectionBody::Table(content) => ResultTable::new(content).render_to_lines(width),
        SectionBody::Code(text) => text
            .lines()
            .map(|l| Line::from(Span::styled(format!("  {l}"), code)))
            .collect(),
        SectionBody::Notices(notices) => notices
            .iter()
            .map(|n| {
                Line::from(vec![
                    Span::styled(
                        format!("{}: ", n.label),
                        Style::default().fg(Color::Yellow),
                    ),
                    Span::raw(n.message.clone()),
                ])
            })
            .collect(),
        SectionBody::Failure {
            message,
            failed_query,
        } => {
            let mut lines = vec![Line::from(Span::styled(
                message.clone(),
                Style::default().fg(Color::Red),
            ))];
            if let Some(query) = failed_query {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("Failed query:", dim)));
                lines.extend(
                    query
                        .lines()
                        .map(|l| Line::from(Span::styled(format!("  {l}"), code))),
                );
            }
            lines
        }
        SectionBody::RenderFailed(reason) => vec![Line::from(Span::styled(
            format!("Could not render this section: {reason}"),
            Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::ITALIC),
        ))],
    }
}

fn inline_spans(inlines: &[Inline], base: Style) -> Vec<Span<'static>> {
    inlines
        .iter()
        .map(|inline| {
            let style = match inline.style {
                InlineStyle::Plain => base,
                InlineStyle::Strong => base.add_modifier(Modifier::BOLD),
                InlineStyle::Emphasis => base.add_modifier(Modifier::ITALIC),
                InlineStyle::Code => base.fg(Color::Cyan),
                InlineStyle::Link => base.fg(Color::Blue).add_modifier(Modifier::UNDERLINED),
            };
            Span::styled(inline.text.clone(), style)
        })
        .collect()
}

/// Converts a rendered markdown document to styled lines.
pub fn document_lines(doc: &Document) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    for block in &doc.blocks {
        match block {
            MdBlock::Heading { level, inlines } => {
                let mut style = Style::default().add_modifier(Modifier::BOLD);
                if *level <= 2 {
                    style = style.fg(Color::Cyan);
                }
                lines.push(Line::from(inline_spans(inlines, style)));
            }
            MdBlock::Paragraph { inlines } => {
                lines.push(Line::from(inline_spans(inlines, Style::default())));
            }
            MdBlock::ListItem { marker, inlines } => {
                let mut spans = vec![Span::styled(
                    format!("  {marker} "),
                    Style::default().fg(Color::Yellow),
                )];
                spans.extend(inline_spans(inlines, Style::default()));
                lines.push(Line::from(spans));
            }
            MdBlock::Quote { inlines } => {
                let mut spans = vec![Span::styled("│ ", Style::default().fg(Color::DarkGray))];
                spans.extend(inline_spans(
                    inlines,
                    Style::default().add_modifier(Modifier::ITALIC),
                ));
                lines.push(Line::from(spans));
            }
            MdBlock::Code { text, .. } => {
                lines.extend(text.lines().map(|l| {
                    Line::from(Span::styled(
                        format!("    {l}"),
                        Style::default().fg(Color::Cyan),
                    ))
                }));
            }
            MdBlock::TableRow { cells } => {
                lines.push(Line::from(cells.join(" │ ")));
            }
            MdBlock::Rule => {
                lines.push(Line::from(Span::styled(
                    "─".repeat(24),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            MdBlock::Blank => lines.push(Line::from("")),
        }
    }

    lines
}

impl Widget for ResultsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Results ");

        let inner_width = block.inner(area).width as usize;
        let lines = display_lines(self.display, inner_width, self.busy);
        let scroll = self.scroll.min(lines.len().saturating_sub(1)) as u16;

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((scroll, 0))
            .render(area, buf);
    }
}
