//! Generic tree renderer with pluggable backend.

use std::fmt::Write;
use std::marker::PhantomData;

use crate::backend::RenderBackend;
use crate::document::Document;
use crate::extension::ExtensionKind;
use crate::html::HtmlBackend;
use crate::loader::global_registry;
use crate::node::{Alignment, ListData, Node, NodeKind};
use crate::parser::Parser;
use crate::registry::Registry;
use crate::util::escape_html;

/// Host-supplied rendering configuration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// URL template for mentions; `{handle}` is replaced by the handle.
    ///
    /// Without a template mentions render as inert styled text.
    pub mention_url_template: Option<String>,
}

/// Generic markdown renderer with pluggable backend.
///
/// Uses the [`RenderBackend`] trait to delegate format-specific rendering
/// while handling common elements (tables, lists, inline formatting)
/// generically. Extension nodes are rendered by the extension that produced
/// them, looked up in the registry; if it is missing the raw source text
/// is emitted.
///
/// Rendering takes `&self` and keeps no state between calls, so rendering the
/// same document twice yields identical output.
///
/// # Example
///
/// ```
/// use gfmx_engine::{HtmlBackend, MarkdownRenderer, Parser, global_registry};
///
/// let registry = global_registry();
/// let document = Parser::new(registry).parse("- [x] ping @bob");
/// let html = MarkdownRenderer::<HtmlBackend>::new(registry)
///     .with_mention_url_template("https://github.com/{handle}")
///     .render(&document);
///
/// assert_eq!(
///     html,
///     concat!(
///         r#"<ul class="contains-task-list"><li class="task-list-item">"#,
///         r#"<input type="checkbox" checked disabled> "#,
///         r#"ping <a class="mention" href="https://github.com/bob">@bob</a></li></ul>"#,
///     )
/// );
/// ```
pub struct MarkdownRenderer<'r, B: RenderBackend> {
    registry: &'r Registry,
    options: RenderOptions,
    _backend: PhantomData<B>,
}

impl<'r, B: RenderBackend> MarkdownRenderer<'r, B> {
    /// Create a renderer dispatching extension nodes through `registry`.
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            options: RenderOptions::default(),
            _backend: PhantomData,
        }
    }

    /// Replace all render options.
    #[must_use]
    pub fn with_options(mut self, options: RenderOptions) -> Self {
        self.options = options;
        self
    }

    /// Set the mention URL template.
    #[must_use]
    pub fn with_mention_url_template(mut self, template: impl Into<String>) -> Self {
        self.options.mention_url_template = Some(template.into());
        self
    }

    /// Current render options.
    #[must_use]
    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Render a parsed document.
    #[must_use]
    pub fn render(&self, document: &Document) -> String {
        let mut writer = Writer {
            renderer: self,
            source: document.source(),
            out: String::with_capacity(document.source().len() + document.source().len() / 2),
        };
        writer.block(document.root(), false);
        writer.out
    }
}

/// Parse and render `markdown` with the built-in extensions and [`HtmlBackend`].
///
/// # Example
///
/// ```
/// use gfmx_engine::markdown_to_html;
///
/// assert_eq!(
///     markdown_to_html("hi @bob"),
///     r#"<p>hi <span class="mention">@bob</span></p>"#
/// );
/// ```
#[must_use]
pub fn markdown_to_html(markdown: &str) -> String {
    let registry = global_registry();
    let document = Parser::new(registry).parse(markdown);
    MarkdownRenderer::<HtmlBackend>::new(registry).render(&document)
}

struct Writer<'a, 'r, B: RenderBackend> {
    renderer: &'a MarkdownRenderer<'r, B>,
    source: &'a str,
    out: String,
}

impl<B: RenderBackend> Writer<'_, '_, B> {
    fn blocks(&mut self, nodes: &[Node], tight: bool) {
        for node in nodes {
            self.block(node, tight);
        }
    }

    fn block(&mut self, node: &Node, tight: bool) {
        match &node.kind {
            NodeKind::Document => self.blocks(&node.children, false),
            NodeKind::Paragraph => {
                if tight {
                    self.inlines(&node.children);
                } else {
                    self.open("<p>");
                    self.inlines(&node.children);
                    self.close("</p>");
                }
            }
            NodeKind::Heading { level } => {
                self.open(&format!("<h{level}>"));
                self.inlines(&node.children);
                self.close(&format!("</h{level}>"));
            }
            NodeKind::BlockQuote => {
                B::block_break(&mut self.out);
                B::blockquote_start(&mut self.out);
                B::block_break(&mut self.out);
                self.blocks(&node.children, false);
                B::block_break(&mut self.out);
                B::blockquote_end(&mut self.out);
                B::block_break(&mut self.out);
            }
            NodeKind::CodeBlock { info, literal } => {
                let lang = info
                    .as_deref()
                    .and_then(|info| info.split_whitespace().next());
                B::block_break(&mut self.out);
                B::code_block(lang, literal, &mut self.out);
                B::block_break(&mut self.out);
            }
            NodeKind::HtmlBlock { literal } => {
                B::block_break(&mut self.out);
                self.out.push_str(literal);
                B::block_break(&mut self.out);
            }
            NodeKind::ThematicBreak => {
                B::block_break(&mut self.out);
                B::horizontal_rule(&mut self.out);
                B::block_break(&mut self.out);
            }
            NodeKind::List(data) => self.list(node, data),
            NodeKind::Item => self.item(node, tight),
            NodeKind::Table { alignments } => self.table(node, alignments),
            NodeKind::FootnoteDefinition { label } => {
                let label = escape_html(label);
                B::block_break(&mut self.out);
                let _ = write!(
                    self.out,
                    r#"<div class="footnote-definition" id="fn-{label}"><sup class="footnote-definition-label">{label}</sup>"#
                );
                self.blocks(&node.children, false);
                self.close("</div>");
            }
            NodeKind::TableHead | NodeKind::TableRow | NodeKind::TableCell => {
                self.blocks(&node.children, false);
            }
            _ => self.inline(node),
        }
    }

    fn list(&mut self, node: &Node, data: &ListData) {
        let tag = if data.is_ordered() { "ol" } else { "ul" };
        B::block_break(&mut self.out);
        self.out.push('<');
        self.out.push_str(tag);
        match data.start {
            Some(1) | None => {}
            Some(start) => {
                let _ = write!(self.out, r#" start="{start}""#);
            }
        }
        if data.task {
            self.out.push_str(r#" class="contains-task-list""#);
        }
        self.out.push('>');
        B::block_break(&mut self.out);
        self.blocks(&node.children, data.tight);
        self.close(&format!("</{tag}>"));
    }

    fn item(&mut self, node: &Node, tight: bool) {
        B::block_break(&mut self.out);
        if node.checkbox().is_none() {
            self.out.push_str("<li>");
            self.blocks(&node.children, tight);
            self.close("</li>");
            return;
        }

        self.out.push_str(r#"<li class="task-list-item">"#);
        match node.children.split_first() {
            // The control goes inside the first paragraph of a loose item.
            Some((first, rest)) if !tight && first.kind == NodeKind::Paragraph => {
                self.open("<p>");
                self.task_marker(node);
                self.inlines(&first.children);
                self.close("</p>");
                self.blocks(rest, tight);
            }
            _ => {
                self.task_marker(node);
                self.blocks(&node.children, tight);
            }
        }
        self.close("</li>");
    }

    fn task_marker(&mut self, node: &Node) {
        let Some(checkbox) = node.checkbox() else {
            return;
        };
        match self.renderer.registry.get(ExtensionKind::Checkbox) {
            Some(extension) => {
                extension.render::<B>(node, &self.renderer.options, &mut self.out);
            }
            None => {
                self.literal(checkbox.span.as_range());
                self.out.push(' ');
            }
        }
    }

    fn table(&mut self, node: &Node, alignments: &[Alignment]) {
        self.open("<table>");
        B::block_break(&mut self.out);
        let (head, body): (Vec<&Node>, Vec<&Node>) = node
            .children
            .iter()
            .partition(|child| child.kind == NodeKind::TableHead);

        for head in head {
            self.open("<thead>");
            B::block_break(&mut self.out);
            self.row(&head.children, alignments, "th");
            self.close("</thead>");
        }
        if !body.is_empty() {
            self.open("<tbody>");
            B::block_break(&mut self.out);
            for row in body {
                self.row(&row.children, alignments, "td");
            }
            self.close("</tbody>");
        }
        self.close("</table>");
    }

    fn row(&mut self, cells: &[Node], alignments: &[Alignment], tag: &str) {
        self.open("<tr>");
        B::block_break(&mut self.out);
        for (index, cell) in cells.iter().enumerate() {
            let align = alignments
                .get(index)
                .map_or("", |alignment| B::cell_alignment(*alignment));
            let _ = write!(self.out, "<{tag}{align}>");
            self.inlines(&cell.children);
            self.close(&format!("</{tag}>"));
        }
        self.close("</tr>");
    }

    fn inlines(&mut self, nodes: &[Node]) {
        for node in nodes {
            self.inline(node);
        }
    }

    fn inline(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Text { literal } => self.out.push_str(&escape_html(literal)),
            NodeKind::Code { literal } => {
                let _ = write!(self.out, "<code>{}</code>", escape_html(literal));
            }
            NodeKind::Html { literal } => self.out.push_str(literal),
            NodeKind::SoftBreak => self.out.push('\n'),
            NodeKind::HardBreak => B::hard_break(&mut self.out),
            NodeKind::Emphasis => self.wrap("em", &node.children),
            NodeKind::Strong => self.wrap("strong", &node.children),
            NodeKind::Strikethrough => self.wrap("del", &node.children),
            NodeKind::Link { url, title } => {
                let _ = write!(self.out, r#"<a href="{}""#, escape_html(url));
                if !title.is_empty() {
                    let _ = write!(self.out, r#" title="{}""#, escape_html(title));
                }
                self.out.push('>');
                self.inlines(&node.children);
                self.out.push_str("</a>");
            }
            NodeKind::Image { url, title } => {
                B::image(url, &node.text_content(), title, &mut self.out);
            }
            NodeKind::FootnoteReference { label } => {
                let label = escape_html(label);
                let _ = write!(
                    self.out,
                    r##"<sup class="footnote-reference"><a href="#fn-{label}">{label}</a></sup>"##
                );
            }
            NodeKind::Extension { extension } => match self.renderer.registry.get(*extension) {
                Some(extension) => {
                    extension.render::<B>(node, &self.renderer.options, &mut self.out);
                }
                None => self.literal(node.span.as_range()),
            },
            _ => self.block(node, false),
        }
    }

    fn wrap(&mut self, tag: &str, children: &[Node]) {
        let _ = write!(self.out, "<{tag}>");
        self.inlines(children);
        let _ = write!(self.out, "</{tag}>");
    }

    /// Emit escaped source text, used when the owning extension is not registered.
    fn literal(&mut self, range: std::ops::Range<usize>) {
        let text = self.source.get(range).unwrap_or_default();
        self.out.push_str(&escape_html(text));
    }

    fn open(&mut self, tag: &str) {
        B::block_break(&mut self.out);
        self.out.push_str(tag);
    }

    fn close(&mut self, tag: &str) {
        self.out.push_str(tag);
        B::block_break(&mut self.out);
    }
}
