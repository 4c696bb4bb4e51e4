//! Response rendering pipeline.
//!
//! Surface-independent: everything here produces plain data
//! ([`RenderState`], [`DisplaySection`]) that the TUI and the one-shot
//! printer draw in their own way.

pub mod chart;
pub mod dispatcher;
pub mod markdown;
pub mod section;
pub mod table;

pub use chart::{ChartKind, ChartRenderer, ChartSurface, Figure, Series, TerminalChart};
pub use dispatcher::{RenderState, ResponseDispatcher};
pub use markdown::{Block, Document, Inline, InlineStyle, MarkdownRenderer, TerminalMarkdown};
pub use section::{error_section, make_section, DisplaySection, Notice, SectionBody, SectionKind};
pub use table::{render_table, Cell, TableContent, NO_DATA_MESSAGE, NULL_TOKEN};
