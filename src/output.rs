//! Output formatting for one-shot mode.
//!
//! Prints a [`RenderState`] to stdout either as readable text or as JSON.

use crate::cli::OutputFormat;
use crate::payload::Analysis;
use crate::render::{
    ChartSurface, DisplaySection, RenderState, SectionBody, TableContent, NO_DATA_MESSAGE,
};
use serde::Serialize;
use std::time::Duration;

/// Width of the longest bar in text charts.
const BAR_WIDTH: usize = 40;

/// JSON output structure.
#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<&'a Analysis>,
    sections: &'a [DisplaySection],
    error: bool,
    duration_ms: u64,
}

/// Formats the outcome of a one-shot submission.
pub struct OneShotOutput {
    format: OutputFormat,
}

impl OneShotOutput {
    /// Creates a new output formatter.
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the display according to the configured format.
    pub fn format(&self, display: &RenderState, duration: Duration) -> String {
        match self.format {
            OutputFormat::Text => format_text(display, duration),
            OutputFormat::Json => format_json(display, duration),
        }
    }
}

fn format_json(display: &RenderState, duration: Duration) -> String {
    let output = JsonOutput {
        analysis: display.analysis(),
        sections: display.sections(),
        error: display.has_error(),
        duration_ms: duration.as_millis() as u64,
    };

    serde_json::to_string_pretty(&output)
        .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {}\"}}", e))
}

fn format_text(display: &RenderState, duration: Duration) -> String {
    let mut out = String::new();

    if let Some(analysis) = display.analysis() {
        out.push_str(&format!("[{}]\n\n", analysis.label()));
    }

    if display.is_empty() {
        out.push_str("(no sections)\n\n");
    }

    for section in display.sections() {
        out.push_str(&format!("== {} ==\n", section.title));
        let body = format_body(&section.body);
        if !body.is_empty() {
            out.push_str(&body);
            out.push('\n');
        }
        out.push('\n');
    }

    out.push_str(&format!(
        "{} section(s) in {}ms\n",
        display.len(),
        duration.as_millis()
    ));
    out
}

/// Formats one section body as plain text.
pub fn format_body(body: &SectionBody) -> String {
    match body {
        SectionBody::Status(text) => text.clone(),
        SectionBody::Document(doc) => doc.to_plain_text().trim_end().to_string(),
        SectionBody::Chart(surface) => format_chart(surface),
        SectionBody::Table(TableContent::Empty) => NO_DATA_MESSAGE.to_string(),
        SectionBody::Table(TableContent::Grid { headers, rows }) => {
            let rows: Vec<Vec<String>> = rows
                .iter()
                .map(|row| row.iter().map(|c| c.as_display().to_string()).collect())
                .collect();
            format_table(headers, &rows)
        }
        SectionBody::Code(text) => indent(text),
        SectionBody::Notices(notices) => notices
            .iter()
            .map(|n| format!("- {}: {}", n.label, n.message))
            .collect::<Vec<_>>()
            .join("\n"),
        SectionBody::Failure {
            message,
            failed_query,
        } => match failed_query {
            Some(query) => format!("{message}\n\nFailed query:\n{}", indent(query)),
            None => message.clone(),
        },
        SectionBody::RenderFailed(reason) => format!("(could not render: {reason})"),
    }
}

fn indent(text: &str) -> String {
    text.lines()
        .map(|l| format!("    {l}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Draws a figure as horizontal ASCII bars, one group per series.
fn format_chart(surface: &ChartSurface) -> String {
    let Some(figure) = surface.figure() else {
        return "(empty chart)".to_string();
    };

    let mut lines = Vec::new();
    if let Some(title) = &figure.title {
        lines.push(title.clone());
    }

    let max = figure.max_value();
    let label_width = figure
        .labels
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0);

    for series in &figure.series {
        if figure.series.len() > 1 || !series.label.is_empty() {
            lines.push(format!("{}:", series.label));
        }
        for (i, value) in series.values.iter().enumerate() {
            let label = figure.labels.get(i).map(String::as_str).unwrap_or("");
            let len = if max > 0.0 {
                ((value.max(0.0) / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            lines.push(format!(
                "{:label_width$} │{} {}",
                label,
                "█".repeat(len),
                value,
                label_width = label_width
            ));
        }
    }

    lines.join("\n")
}

/// Formats a table as a string for display.
pub fn format_table(headers: &[String], rows: &[Vec<String>]) -> String {
    if headers.is_empty() {
        return String::new();
    }

    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (i, cell) in row.iter().enumerate() {
            if i < widths.len() {
                widths[i] = widths[i].max(cell.chars().count());
            }
        }
    }

    let pad = |text: &str, width: usize| {
        let fill = width.saturating_sub(text.chars().count());
        format!("{text}{}", " ".repeat(fill))
    };

    let mut output = String::new();

    let header_line: Vec<String> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| pad(h, widths[i]))
        .collect();
    output.push_str(&header_line.join(" │ "));
    output.push('\n');

    let separator: Vec<String> = widths.iter().map(|w| "─".repeat(*w)).collect();
    output.push_str(&separator.join("─┼─"));
    output.push('\n');

    for row in rows {
        let row_line: Vec<String> = row
            .iter()
            .enumerate()
            .map(|(i, cell)| pad(cell, widths.get(i).copied().unwrap_or(0)))
            .collect();
        output.push_str(&row_line.join(" │ "));
        output.push('\n');
    }

    output
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}
