//! Response dispatch.
//!
//! Turns a decoded [`ResponsePayload`] into the ordered list of sections to
//! display. Sections appear in a fixed order regardless of how the service
//! ordered its keys: email status, report, visualization, query result,
//! generated query, then (optionally) service notices.

use super::chart::{ChartRenderer, ChartSurface, TerminalChart};
use super::markdown::{MarkdownRenderer, TerminalMarkdown};
use super::section::{titled, DisplaySection, Notice, SectionBody, SectionKind};
use super::table::render_table;
use crate::error::Result;
use crate::payload::{Analysis, ResponsePayload};
use serde::Serialize;
use tracing::{debug, warn};

/// The sections currently on display.
///
/// Replaced wholesale on every render; never merged with a previous state.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RenderState {
    sections: Vec<DisplaySection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    analysis: Option<Analysis>,
}

impl RenderState {
    /// Creates an empty display.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a display from prebuilt sections.
    pub fn from_sections(sections: Vec<DisplaySection>) -> Self {
        Self {
            sections,
            analysis: None,
        }
    }

    /// The service's classification of the prompt, when it sent one.
    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    /// Sections in display order.
    pub fn sections(&self) -> &[DisplaySection] {
        &self.sections
    }

    /// Returns true if nothing is displayed.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Kinds of the displayed sections, in order.
    pub fn kinds(&self) -> Vec<SectionKind> {
        self.sections.iter().map(|s| s.kind).collect()
    }

    /// Returns true if the display is a request-failure display.
    pub fn has_error(&self) -> bool {
        self.sections.iter().any(DisplaySection::is_error)
    }

    /// Text of the generated-query section, if one is displayed.
    pub fn generated_query(&self) -> Option<&str> {
        self.sections.iter().find_map(|s| match (&s.kind, &s.body) {
            (SectionKind::GeneratedQuery, SectionBody::Code(text)) => Some(text.as_str()),
            _ => None,
        })
    }
}

/// Builds display sections from service payloads.
///
/// Holds no state between renders; the markdown and chart collaborators are
/// injected so they can be replaced in tests.
pub struct ResponseDispatcher {
    markdown: Box<dyn MarkdownRenderer>,
    chart: Box<dyn ChartRenderer>,
    show_diagnostics: bool,
}

impl ResponseDispatcher {
    /// Creates a dispatcher with the given collaborators.
    pub fn new(markdown: Box<dyn MarkdownRenderer>, chart: Box<dyn ChartRenderer>) -> Self {
        Self {
            markdown,
            chart,
            show_diagnostics: true,
        }
    }

    /// Creates a dispatcher using the terminal markdown and chart renderers.
    pub fn terminal() -> Self {
        Self::new(Box::new(TerminalMarkdown::new()), Box::new(TerminalChart::new()))
    }

    /// Enables or disables the trailing service-notices section.
    pub fn with_diagnostics(mut self, show: bool) -> Self {
        self.show_diagnostics = show;
        self
    }

    /// Renders a payload into a fresh display.
    pub fn render(&self, payload: &ResponsePayload) -> RenderState {
        // Destructured so a new payload field cannot be forgotten here.
        let ResponsePayload {
            email_status,
            report,
            visual,
            query_result,
            generated_query,
            analysis,
            database_connection_error: _,
            schema_fetching_error: _,
            query_execution_error: _,
            query_result_message: _,
            report_status: _,
            visual_status: _,
        } = payload;

        let mut sections = Vec::new();

        if let Some(status) = email_status {
            sections.push(titled(
                SectionKind::EmailStatus,
                SectionBody::Status(status.clone()),
            ));
        }

        if let Some(source) = report {
            let body = self.isolate(SectionKind::Report, || {
                self.markdown.render(source).map(SectionBody::Document)
            });
            sections.push(titled(SectionKind::Report, body));
        }

        if let Some(config) = visual {
            let body = self.isolate(SectionKind::Visual, || {
                let mut surface = ChartSurface::new();
                self.chart.draw(config, &mut surface)?;
                Ok(SectionBody::Chart(surface))
            });
            sections.push(titled(SectionKind::Visual, body));
        }

        if let Some(rows) = query_result {
            sections.push(titled(
                SectionKind::QueryResult,
                SectionBody::Table(render_table(Some(rows))),
            ));
        }

        if let Some(query) = generated_query {
            sections.push(titled(
                SectionKind::GeneratedQuery,
                SectionBody::Code(query.to_display_string()),
            ));
        }

        if self.show_diagnostics {
            let notices: Vec<Notice> = payload
                .diagnostics()
                .into_iter()
                .map(|(label, message)| Notice {
                    label: label.to_string(),
                    message: message.to_string(),
                })
                .collect();
            if !notices.is_empty() {
                sections.push(titled(SectionKind::Notices, SectionBody::Notices(notices)));
            }
        }

        debug!(sections = sections.len(), "Rendered response payload");
        RenderState {
            sections,
            analysis: analysis.clone(),
        }
    }

    /// Runs one section's collaborator, turning its failure into a body
    /// so the remaining sections still render.
    fn isolate(
        &self,
        kind: SectionKind,
        render: impl FnOnce() -> Result<SectionBody>,
    ) -> SectionBody {
        render().unwrap_or_else(|e| {
            warn!(?kind, error = %e, "Section failed to render");
            SectionBody::RenderFailed(e.to_string())
        })
    }
}

impl Default for ResponseDispatcher {
    fn default() -> Self {
        Self::terminal()
    }
}
