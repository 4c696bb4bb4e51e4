//! Markdown rendering collaborator.
//!
//! The report field arrives as markdown. The dispatcher only depends on the
//! [`MarkdownRenderer`] trait; [`TerminalMarkdown`] is the default
//! implementation and turns the source into a surface-neutral [`Document`]
//! that both the TUI and the plain-text output know how to draw.

use crate::error::Result;
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag};
use serde::Serialize;

/// Converts markdown source into displayable content.
///
/// Implementations must be thread-safe so a dispatcher can be shared with
/// background tasks.
pub trait MarkdownRenderer: Send + Sync {
    /// Renders markdown source into a document.
    fn render(&self, source: &str) -> Result<Document>;
}

/// Inline styling of a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InlineStyle {
    Plain,
    Strong,
    Emphasis,
    Code,
    Link,
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Inline {
    pub text: String,
    pub style: InlineStyle,
}

impl Inline {
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: InlineStyle::Plain,
        }
    }

    pub fn styled(text: impl Into<String>, style: InlineStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }
}

/// A block-level element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Heading { level: u8, inlines: Vec<Inline> },
    Paragraph { inlines: Vec<Inline> },
    ListItem { marker: String, inlines: Vec<Inline> },
    Quote { inlines: Vec<Inline> },
    Code { lang: Option<String>, text: String },
    TableRow { cells: Vec<String> },
    Rule,
    Blank,
}

/// Rendered markdown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    /// Flattens the document to plain text, one line per block line.
    pub fn to_plain_text(&self) -> String {
        let mut out = Vec::new();
        for block in &self.blocks {
            match block {
                Block::Heading { inlines, .. } | Block::Paragraph { inlines } => {
                    out.push(flatten(inlines));
                }
                Block::ListItem { marker, inlines } => {
                    out.push(format!("{marker} {}", flatten(inlines)));
                }
                Block::Quote { inlines } => out.push(format!("> {}", flatten(inlines))),
                Block::Code { text, .. } => {
                    out.extend(text.lines().map(|l| format!("    {l}")));
                }
                Block::TableRow { cells } => out.push(cells.join(" | ")),
                Block::Rule => out.push("─".repeat(24)),
                Block::Blank => out.push(String::new()),
            }
        }
        out.join("\n")
    }
}

fn flatten(inlines: &[Inline]) -> String {
    inlines.iter().map(|i| i.text.as_str()).collect()
}

/// Markdown renderer for terminals, backed by `pulldown-cmark`.
///
/// Soft line breaks join paragraph lines. Nested list items get their
/// marker indented by depth. Tables are flattened to rows with a rule
/// under the header.
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalMarkdown;

impl TerminalMarkdown {
    pub fn new() -> Self {
        Self
    }
}

impl MarkdownRenderer for TerminalMarkdown {
    fn render(&self, source: &str) -> Result<Document> {
        let options = Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH;
        let mut builder = DocumentBuilder::default();
        for event in Parser::new_ext(source, options) {
            builder.event(event);
        }
        Ok(builder.finish())
    }
}

/// Open element on the builder's stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Open {
    Paragraph,
    Heading(u8),
    Quote,
    List,
    Item,
    CodeBlock,
    TableHead,
    TableRow,
    TableCell,
    Inline(InlineStyle),
    Other,
}

/// Folds the `pulldown-cmark` event stream into [`Block`]s.
#[derive(Debug, Default)]
struct DocumentBuilder {
    blocks: Vec<Block>,
    open: Vec<Open>,
    inlines: Vec<Inline>,
    /// Next number for each open list, `None` for bullet lists.
    lists: Vec<Option<u64>>,
    marker: Option<String>,
    quote_depth: usize,
    code: Option<(Option<String>, String)>,
    row: Vec<String>,
    cell: String,
    gap: bool,
}

impl DocumentBuilder {
    fn event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => self.text(&text, None),
            Event::Code(text) => self.text(&text, Some(InlineStyle::Code)),
            Event::SoftBreak | Event::HardBreak => self.text(" ", None),
            Event::TaskListMarker(done) => self.text(if done { "[x] " } else { "[ ] " }, None),
            Event::Rule => {
                self.flush();
                self.push_block(Block::Rule);
                self.gap = self.open.is_empty();
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        let open = match tag {
            Tag::Paragraph => Open::Paragraph,
            Tag::Heading { level, .. } => {
                self.flush();
                Open::Heading(level as u8)
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
                Open::Quote
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_string)
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code = Some((lang, String::new()));
                Open::CodeBlock
            }
            Tag::List(first) => {
                self.flush();
                self.lists.push(first);
                Open::List
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                let bullet = match self.lists.last_mut() {
                    Some(Some(n)) => {
                        let label = format!("{n}.");
                        *n += 1;
                        label
                    }
                    _ => "•".to_string(),
                };
                self.marker = Some(format!("{}{bullet}", "  ".repeat(depth)));
                Open::Item
            }
            Tag::Table(_) => {
                self.flush();
                Open::Other
            }
            Tag::TableHead => {
                self.row.clear();
                Open::TableHead
            }
            Tag::TableRow => {
                self.row.clear();
                Open::TableRow
            }
            Tag::TableCell => {
                self.cell.clear();
                Open::TableCell
            }
            Tag::Strong => Open::Inline(InlineStyle::Strong),
            Tag::Emphasis => Open::Inline(InlineStyle::Emphasis),
            Tag::Link { .. } => Open::Inline(InlineStyle::Link),
            _ => Open::Other,
        };
        self.open.push(open);
    }

    fn end(&mut self) {
        let Some(open) = self.open.pop() else {
            return;
        };
        match open {
            Open::Paragraph | Open::Item => self.flush(),
            Open::Heading(level) => {
                let inlines = std::mem::take(&mut self.inlines);
                self.push_block(Block::Heading { level, inlines });
            }
            Open::Quote => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
            }
            Open::List => {
                self.flush();
                self.lists.pop();
            }
            Open::CodeBlock => {
                if let Some((lang, text)) = self.code.take() {
                    let text = text.trim_end_matches('\n').to_string();
                    self.push_block(Block::Code { lang, text });
                }
            }
            Open::TableHead => {
                let cells = std::mem::take(&mut self.row);
                self.push_block(Block::TableRow { cells });
                self.push_block(Block::Rule);
            }
            Open::TableRow => {
                let cells = std::mem::take(&mut self.row);
                self.push_block(Block::TableRow { cells });
            }
            Open::TableCell => {
                let cell = std::mem::take(&mut self.cell);
                self.row.push(cell.trim().to_string());
            }
            Open::Inline(_) | Open::Other => {}
        }

        if self.open.is_empty() && !matches!(open, Open::Inline(_)) {
            self.gap = true;
        }
    }

    fn text(&mut self, text: &str, style: Option<InlineStyle>) {
        if let Some((_, body)) = self.code.as_mut() {
            body.push_str(text);
            return;
        }
        if self.open.contains(&Open::TableCell) {
            self.cell.push_str(text);
            return;
        }

        let style = style.unwrap_or_else(|| self.current_style());
        match self.inlines.last_mut() {
            Some(last) if last.style == style => last.text.push_str(text),
            _ => self.inlines.push(Inline::styled(text, style)),
        }
    }

    fn current_style(&self) -> InlineStyle {
        self.open
            .iter()
            .rev()
            .find_map(|open| match open {
                Open::Inline(style) => Some(*style),
                _ => None,
            })
            .unwrap_or(InlineStyle::Plain)
    }

    /// Emits pending inline text as a list item, quote or paragraph.
    fn flush(&mut self) {
        if self.inlines.is_empty() && self.marker.is_none() {
            return;
        }
        let inlines = std::mem::take(&mut self.inlines);
        let block = if let Some(marker) = self.marker.take() {
            Block::ListItem { marker, inlines }
        } else if self.quote_depth > 0 {
            Block::Quote { inlines }
        } else {
            Block::Paragraph { inlines }
        };
        self.push_block(block);
    }

    fn push_block(&mut self, block: Block) {
        if std::mem::take(&mut self.gap) && !self.blocks.is_empty() {
            self.blocks.push(Block::Blank);
        }
        self.blocks.push(block);
    }

    fn finish(mut self) -> Document {
        self.flush();
        Document {
            blocks: self.blocks,
        }
    }
}
