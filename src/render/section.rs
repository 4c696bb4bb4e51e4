//! Display sections.
//!
//! A section is one titled block of the response display. Sections are
//! built fresh on every render and never patched in place.

use super::chart::ChartSurface;
use super::markdown::Document;
use super::table::TableContent;
use serde::Serialize;

/// Which part of the response a section shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    EmailStatus,
    Report,
    Visual,
    QueryResult,
    GeneratedQuery,
    Notices,
    Error,
}

impl SectionKind {
    /// Default heading for the kind.
    pub fn title(self) -> &'static str {
        match self {
            Self::EmailStatus => "📧 Email Status",
            Self::Report => "📊 Report",
            Self::Visual => "📈 Visualization",
            Self::QueryResult => "🔍 Query Result",
            Self::GeneratedQuery => "Generated Query",
            Self::Notices => "⚠ Service Notices",
            Self::Error => "Error",
        }
    }
}

/// A labelled diagnostic line reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub label: String,
    pub message: String,
}

/// Rendered content of a section.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum SectionBody {
    /// A status line shown verbatim.
    Status(String),
    /// Rendered markdown.
    Document(Document),
    /// A chart surface owned by this section.
    Chart(ChartSurface),
    /// A result grid or the no-data placeholder.
    Table(TableContent),
    /// Fixed-width, code-style text.
    Code(String),
    /// Service diagnostics.
    Notices(Vec<Notice>),
    /// Request failure message, optionally with the query that failed.
    Failure {
        message: String,
        failed_query: Option<String>,
    },
    /// A collaborator could not render this section's content.
    RenderFailed(String),
}

/// One titled block of the response display.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplaySection {
    pub kind: SectionKind,
    pub title: String,
    pub body: SectionBody,
}

impl DisplaySection {
    /// Returns true if this is a request-failure section.
    pub fn is_error(&self) -> bool {
        self.kind == SectionKind::Error
    }
}

/// Pairs a heading with content. No validation is performed.
pub fn make_section(
    kind: SectionKind,
    title: impl Into<String>,
    body: SectionBody,
) -> DisplaySection {
    DisplaySection {
        kind,
        title: title.into(),
        body,
    }
}

/// Builds a section using the kind's default heading.
pub fn titled(kind: SectionKind, body: SectionBody) -> DisplaySection {
    make_section(kind, kind.title(), body)
}

/// Builds the single section shown when a request fails.
pub fn error_section(message: impl Into<String>, failed_query: Option<String>) -> DisplaySection {
    titled(
        SectionKind::Error,
        SectionBody::Failure {
            message: message.into(),
            failed_query,
        },
    )
}
