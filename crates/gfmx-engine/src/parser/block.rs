//! Block pass: builds the tree from the base parser's offset event stream.
//!
//! Frames mirror the open blocks. A frame is only mutated while it is on the
//! stack; once popped, its node is final apart from postprocessing.

use std::ops::Range;

use pulldown_cmark::{CodeBlockKind, Event, Tag, TagEnd};

use crate::extension::ItemStart;
use crate::node::{Alignment, ListData, Node, NodeKind, Payload};
use crate::registry::Registry;
use crate::util::heading_level_to_num;

use super::inline::{coalesce_text, is_verbatim, push_inline, scan_triggers};

/// Checkbox decision of a list item, taken once when its first block closes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ItemState {
    Scanning,
    Matched,
    Declined,
}

#[derive(Debug)]
enum Role {
    Plain,
    /// Paragraph wrapping the inline content of a tight list item.
    ImplicitParagraph,
    List {
        loose: bool,
    },
    Item(ItemState),
}

#[derive(Debug)]
struct Frame {
    node: Node,
    role: Role,
}

pub(crate) struct TreeBuilder<'a> {
    source: &'a str,
    registry: &'a Registry,
    stack: Vec<Frame>,
}

impl<'a> TreeBuilder<'a> {
    pub(crate) fn new(source: &'a str, registry: &'a Registry) -> Self {
        let root = Node::new(NodeKind::Document, 0..source.len());
        Self {
            source,
            registry,
            stack: vec![Frame {
                node: root,
                role: Role::Plain,
            }],
        }
    }

    pub(crate) fn build<'e>(
        mut self,
        events: impl Iterator<Item = (Event<'e>, Range<usize>)>,
    ) -> Node {
        for (event, range) in events {
            self.event(event, range);
        }
        while self.stack.len() > 1 {
            self.close();
        }

        let mut root = self.stack.pop().map_or_else(
            || Node::new(NodeKind::Document, 0..self.source.len()),
            |frame| frame.node,
        );
        for extension in self.registry {
            extension.postprocess(&mut root);
        }
        root
    }

    fn event(&mut self, event: Event<'_>, range: Range<usize>) {
        match event {
            Event::Start(tag) => self.start(tag, range),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => {
                if !self.push_literal(&text) {
                    self.inline(Node::new(NodeKind::text(text.into_string()), range));
                }
            }
            Event::Code(code) | Event::InlineMath(code) | Event::DisplayMath(code) => {
                self.inline(Node::new(
                    NodeKind::Code {
                        literal: code.into_string(),
                    },
                    range,
                ));
            }
            Event::Html(html) | Event::InlineHtml(html) => {
                if !self.push_literal(&html) {
                    self.inline(Node::new(
                        NodeKind::Html {
                            literal: html.into_string(),
                        },
                        range,
                    ));
                }
            }
            Event::FootnoteReference(label) => {
                self.inline(Node::new(
                    NodeKind::FootnoteReference {
                        label: label.into_string(),
                    },
                    range,
                ));
            }
            Event::SoftBreak => self.inline(Node::new(NodeKind::SoftBreak, range)),
            Event::HardBreak => self.inline(Node::new(NodeKind::HardBreak, range)),
            Event::Rule => {
                self.close_implicit();
                self.attach(Node::new(NodeKind::ThematicBreak, range));
            }
            // The base task-list option is never enabled.
            Event::TaskListMarker(_) => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>, range: Range<usize>) {
        let kind = match tag {
            Tag::Paragraph => NodeKind::Paragraph,
            Tag::Heading { level, .. } => NodeKind::Heading {
                level: heading_level_to_num(level),
            },
            Tag::BlockQuote(_) => NodeKind::BlockQuote,
            Tag::CodeBlock(block) => NodeKind::CodeBlock {
                info: match block {
                    CodeBlockKind::Fenced(info) if !info.trim().is_empty() => {
                        Some(info.trim().to_owned())
                    }
                    _ => None,
                },
                literal: String::new(),
            },
            Tag::HtmlBlock => NodeKind::HtmlBlock {
                literal: String::new(),
            },
            Tag::List(start) => NodeKind::List(ListData {
                start,
                tight: true,
                task: false,
            }),
            Tag::Item => NodeKind::Item,
            Tag::FootnoteDefinition(label) => NodeKind::FootnoteDefinition {
                label: label.into_string(),
            },
            Tag::Table(alignments) => NodeKind::Table {
                alignments: alignments.into_iter().map(Alignment::from).collect(),
            },
            Tag::TableHead => NodeKind::TableHead,
            Tag::TableRow => NodeKind::TableRow,
            Tag::TableCell => NodeKind::TableCell,
            Tag::Emphasis => NodeKind::Emphasis,
            Tag::Strong => NodeKind::Strong,
            Tag::Strikethrough => NodeKind::Strikethrough,
            Tag::Link {
                dest_url, title, ..
            } => NodeKind::Link {
                url: dest_url.into_string(),
                title: title.into_string(),
            },
            Tag::Image {
                dest_url, title, ..
            } => NodeKind::Image {
                url: dest_url.into_string(),
                title: title.into_string(),
            },
            // Options for these are never enabled; their content flows into the parent.
            Tag::Superscript
            | Tag::Subscript
            | Tag::DefinitionList
            | Tag::DefinitionListTitle
            | Tag::DefinitionListDefinition
            | Tag::MetadataBlock(_) => return,
        };

        if kind.is_block() {
            self.close_implicit();
        } else {
            self.open_inline_container(range.start);
        }
        let role = match kind {
            NodeKind::List(_) => Role::List { loose: false },
            NodeKind::Item => Role::Item(ItemState::Scanning),
            _ => Role::Plain,
        };
        self.stack.push(Frame {
            node: Node::new(kind, range),
            role,
        });
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Superscript
            | TagEnd::Subscript
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
            | TagEnd::MetadataBlock(_) => {}
            TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Link
            | TagEnd::Image => self.close(),
            _ => {
                self.close_implicit();
                self.close();
            }
        }
    }

    /// Append raw content to an open code or HTML block.
    fn push_literal(&mut self, content: &str) -> bool {
        match self.stack.last_mut().map(|frame| &mut frame.node.kind) {
            Some(NodeKind::CodeBlock { literal, .. } | NodeKind::HtmlBlock { literal }) => {
                literal.push_str(content);
                true
            }
            _ => false,
        }
    }

    fn inline(&mut self, node: Node) {
        self.open_inline_container(node.span.start);
        let source = self.source;
        if let Some(frame) = self.stack.last_mut() {
            push_inline(source, &mut frame.node.children, node);
        }
    }

    /// Open an implicit paragraph when inline content arrives in a block
    /// that cannot hold it directly (tight list items).
    fn open_inline_container(&mut self, start: usize) {
        let accepts = self
            .stack
            .last()
            .is_some_and(|frame| frame.node.kind.holds_inlines() || !frame.node.is_block());
        if !accepts {
            self.stack.push(Frame {
                node: Node::new(NodeKind::Paragraph, start..start),
                role: Role::ImplicitParagraph,
            });
        }
    }

    fn close_implicit(&mut self) {
        if matches!(
            self.stack.last(),
            Some(Frame {
                role: Role::ImplicitParagraph,
                ..
            })
        ) {
            self.close();
        }
    }

    fn close(&mut self) {
        if self.stack.len() <= 1 {
            return;
        }
        let Some(Frame { mut node, role }) = self.stack.pop() else {
            return;
        };

        match role {
            Role::ImplicitParagraph => {
                if let Some(last) = node.children.last() {
                    node.span.end = last.span.end;
                }
            }
            Role::List { loose } => {
                if let NodeKind::List(data) = &mut node.kind {
                    data.tight = !loose;
                }
            }
            Role::Plain if node.kind == NodeKind::Paragraph => self.mark_loose(),
            Role::Plain | Role::Item(_) => {}
        }

        if node.is_block() {
            self.decide_item_start(&mut node);
        }
        if node.kind.holds_inlines() {
            scan_triggers(self.source, self.registry, &mut node.children);
            coalesce_text(&mut node.children);
        }
        self.attach(node);
    }

    /// An explicit paragraph directly inside an item makes its list loose.
    fn mark_loose(&mut self) {
        if let [
            ..,
            Frame {
                role: Role::List { loose },
                ..
            },
            Frame {
                role: Role::Item(_),
                ..
            },
        ] = self.stack.as_mut_slice()
        {
            *loose = true;
        }
    }

    /// Consult the block starters once, when the first block of an item closes.
    fn decide_item_start(&mut self, block: &mut Node) {
        let (source, registry) = (self.source, self.registry);
        let Some(frame) = self.stack.last_mut() else {
            return;
        };
        let Role::Item(state) = &mut frame.role else {
            return;
        };
        if *state != ItemState::Scanning {
            return;
        }

        *state = match match_item_start(source, registry, frame.node.span.start, block) {
            Some(payload) => {
                frame.node.payload = Some(payload);
                ItemState::Matched
            }
            None => ItemState::Declined,
        };
        tracing::trace!(
            offset = frame.node.span.start,
            state = ?state,
            "list item start decided"
        );
    }

    fn attach(&mut self, node: Node) {
        let source = self.source;
        if let Some(frame) = self.stack.last_mut() {
            push_inline(source, &mut frame.node.children, node);
        }
    }
}

fn match_item_start(
    source: &str,
    registry: &Registry,
    item_start: usize,
    block: &mut Node,
) -> Option<Payload> {
    if block.kind != NodeKind::Paragraph {
        return None;
    }
    let unlinked = unlink_marker(source, &block.children);
    let children = unlinked.as_deref().unwrap_or(&block.children);
    let first = children.first()?;
    if !is_verbatim(source, first) {
        return None;
    }
    let start = ItemStart {
        source,
        item_start,
        content_start: first.span.start,
        text: first.as_text()?,
    };
    let found = registry
        .block_starters()
        .find_map(|extension| extension.try_match_block(&start).matched())?;

    if let Some(children) = unlinked {
        block.children = children;
    }
    strip_leading(block, found.consumed);
    Some(found.payload)
}

/// With a link reference definition named `x` in scope the base parser reads
/// the marker `[x]` as a shortcut link. Returns the children with that link
/// turned back into source text, merged with the text that follows it.
fn unlink_marker(source: &str, children: &[Node]) -> Option<Vec<Node>> {
    let (first, rest) = children.split_first()?;
    if !matches!(first.kind, NodeKind::Link { .. }) {
        return None;
    }
    let marker = source.get(first.span.as_range())?;
    if !matches!(marker, "[x]" | "[X]") {
        return None;
    }

    let mut unlinked = vec![Node::new(NodeKind::text(marker), first.span)];
    for node in rest {
        push_inline(source, &mut unlinked, node.clone());
    }
    Some(unlinked)
}

fn strip_leading(block: &mut Node, consumed: usize) {
    let Some(first) = block.children.first_mut() else {
        return;
    };
    if let NodeKind::Text { literal } = &mut first.kind {
        literal.replace_range(..consumed, "");
        first.span.start += consumed;
        if literal.is_empty() {
            block.children.remove(0);
        }
    }
}
