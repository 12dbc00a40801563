//! Document tree produced by the parser.
//!
//! Every node owns its children. Spans are byte ranges into the source the
//! tree was parsed from; [`Document`](crate::Document) keeps that source
//! alongside the root.

use std::ops::Range;

use crate::extension::ExtensionKind;

/// Byte range into the source document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    /// First byte.
    pub start: usize,
    /// One past the last byte.
    pub end: usize,
}

impl Span {
    /// Create a span.
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The span as a `Range` suitable for slicing.
    #[must_use]
    pub fn as_range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

/// Column alignment of a table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum Alignment {
    None,
    Left,
    Center,
    Right,
}

impl From<pulldown_cmark::Alignment> for Alignment {
    fn from(alignment: pulldown_cmark::Alignment) -> Self {
        match alignment {
            pulldown_cmark::Alignment::None => Self::None,
            pulldown_cmark::Alignment::Left => Self::Left,
            pulldown_cmark::Alignment::Center => Self::Center,
            pulldown_cmark::Alignment::Right => Self::Right,
        }
    }
}

/// List attributes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ListData {
    /// Start number for ordered lists, `None` for bullet lists.
    pub start: Option<u64>,
    /// Whether item paragraphs render without `<p>` wrappers.
    pub tight: bool,
    /// Whether at least one item carries a checkbox.
    pub task: bool,
}

impl ListData {
    /// Whether the list is numbered.
    #[must_use]
    pub fn is_ordered(&self) -> bool {
        self.start.is_some()
    }
}

/// Kind tag of a node: standard CommonMark/GFM kinds plus extension-defined ones.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum NodeKind {
    Document,

    // Blocks
    Paragraph,
    Heading {
        level: u8,
    },
    BlockQuote,
    CodeBlock {
        info: Option<String>,
        literal: String,
    },
    HtmlBlock {
        literal: String,
    },
    ThematicBreak,
    List(ListData),
    Item,
    Table {
        alignments: Vec<Alignment>,
    },
    TableHead,
    TableRow,
    TableCell,
    FootnoteDefinition {
        label: String,
    },

    // Inlines
    Text {
        literal: String,
    },
    Code {
        literal: String,
    },
    Html {
        literal: String,
    },
    SoftBreak,
    HardBreak,
    Emphasis,
    Strong,
    Strikethrough,
    Link {
        url: String,
        title: String,
    },
    Image {
        url: String,
        title: String,
    },
    FootnoteReference {
        label: String,
    },
    /// Inline node contributed by a syntax extension.
    Extension {
        extension: ExtensionKind,
    },
}

impl NodeKind {
    /// Create a text kind.
    #[must_use]
    pub fn text(literal: impl Into<String>) -> Self {
        Self::Text {
            literal: literal.into(),
        }
    }

    /// Whether this kind is a block-level element.
    #[must_use]
    pub fn is_block(&self) -> bool {
        matches!(
            self,
            Self::Document
                | Self::Paragraph
                | Self::Heading { .. }
                | Self::BlockQuote
                | Self::CodeBlock { .. }
                | Self::HtmlBlock { .. }
                | Self::ThematicBreak
                | Self::List(_)
                | Self::Item
                | Self::Table { .. }
                | Self::TableHead
                | Self::TableRow
                | Self::TableCell
                | Self::FootnoteDefinition { .. }
        )
    }

    /// Whether this block holds inline children directly.
    #[must_use]
    pub fn holds_inlines(&self) -> bool {
        matches!(self, Self::Paragraph | Self::Heading { .. } | Self::TableCell)
    }

    /// Whether extension triggers may fire among this node's children.
    ///
    /// Links and images must not nest interactive content; code is literal.
    #[must_use]
    pub fn scans_triggers(&self) -> bool {
        !matches!(self, Self::Link { .. } | Self::Image { .. })
    }
}

/// A resolved `@handle` reference.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Mention {
    /// Handle without the leading `@`; non-empty, no whitespace.
    pub handle: String,
    /// Span of `@` plus the handle.
    pub span: Span,
}

/// Task-list checkbox state of a list item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Checkbox {
    /// `true` for `[x]` / `[X]`.
    pub checked: bool,
    /// Span of the three-character marker.
    pub span: Span,
}

/// Extension-specific data attached to a node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Payload {
    Mention(Mention),
    Checkbox(Checkbox),
}

/// A block or inline element of the document tree.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Node {
    pub kind: NodeKind,
    pub span: Span,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Vec::is_empty"))]
    pub children: Vec<Node>,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub payload: Option<Payload>,
}

impl Node {
    /// Create a childless node.
    #[must_use]
    pub fn new(kind: NodeKind, span: impl Into<Span>) -> Self {
        Self {
            kind,
            span: span.into(),
            children: Vec::new(),
            payload: None,
        }
    }

    /// Attach an extension payload.
    #[must_use]
    pub fn with_payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Whether this node is a block-level element.
    #[must_use]
    pub fn is_block(&self) -> bool {
        self.kind.is_block()
    }

    /// Literal of a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text { literal } => Some(literal),
            _ => None,
        }
    }

    /// Mention payload, if this is a mention node.
    #[must_use]
    pub fn mention(&self) -> Option<&Mention> {
        match &self.payload {
            Some(Payload::Mention(mention)) => Some(mention),
            _ => None,
        }
    }

    /// Checkbox payload, if this is a task item.
    #[must_use]
    pub fn checkbox(&self) -> Option<&Checkbox> {
        match &self.payload {
            Some(Payload::Checkbox(checkbox)) => Some(checkbox),
            _ => None,
        }
    }

    /// Whether this is a list item carrying a checkbox.
    #[must_use]
    pub fn is_task_item(&self) -> bool {
        self.kind == NodeKind::Item && self.checkbox().is_some()
    }

    /// List attributes, if this is a list.
    #[must_use]
    pub fn list_data(&self) -> Option<&ListData> {
        match &self.kind {
            NodeKind::List(data) => Some(data),
            _ => None,
        }
    }

    /// Visit this node and all descendants in pre-order.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Plain text of the subtree.
    ///
    /// Mentions contribute `@handle`; breaks contribute a newline.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text { literal } | NodeKind::Code { literal } => out.push_str(literal),
            NodeKind::SoftBreak | NodeKind::HardBreak => out.push('\n'),
            NodeKind::Extension { .. } => {
                if let Some(mention) = self.mention() {
                    out.push('@');
                    out.push_str(&mention.handle);
                }
            }
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(literal: &str, start: usize) -> Node {
        Node::new(NodeKind::text(literal), start..start + literal.len())
    }

    #[test]
    fn test_span() {
        let span = Span::from(2..5);
        assert_eq!(span.len(), 3);
        assert!(!span.is_empty());
        assert_eq!(span.as_range(), 2..5);
        assert!(Span::new(4, 4).is_empty());
    }

    #[test]
    fn test_text_content_with_mention() {
        let mention = Node::new(
            NodeKind::Extension {
                extension: ExtensionKind::Mention,
            },
            0..4,
        )
        .with_payload(Payload::Mention(Mention {
            handle: "bob".to_owned(),
            span: Span::new(0, 4),
        }));
        let mut paragraph = Node::new(NodeKind::Paragraph, 0..12);
        paragraph.children = vec![mention, text(" said hi", 4)];

        assert_eq!(paragraph.text_content(), "@bob said hi");
    }

    #[test]
    fn test_task_item() {
        let item = Node::new(NodeKind::Item, 0..10).with_payload(Payload::Checkbox(Checkbox {
            checked: true,
            span: Span::new(2, 5),
        }));
        assert!(item.is_task_item());
        assert!(item.checkbox().is_some_and(|c| c.checked));

        let paragraph = Node::new(NodeKind::Paragraph, 0..10).with_payload(Payload::Checkbox(
            Checkbox {
                checked: true,
                span: Span::new(2, 5),
            },
        ));
        assert!(!paragraph.is_task_item());
    }

    #[test]
    fn test_walk_preorder() {
        let mut emphasis = Node::new(NodeKind::Emphasis, 0..5);
        emphasis.children.push(text("a", 1));
        let mut paragraph = Node::new(NodeKind::Paragraph, 0..6);
        paragraph.children = vec![emphasis, text("b", 5)];

        let mut kinds = Vec::new();
        paragraph.walk(&mut |node| kinds.push(node.kind.clone()));
        assert_eq!(
            kinds,
            vec![
                NodeKind::Paragraph,
                NodeKind::Emphasis,
                NodeKind::text("a"),
                NodeKind::text("b"),
            ]
        );
    }

    #[test]
    fn test_kind_classification() {
        assert!(NodeKind::Paragraph.is_block());
        assert!(NodeKind::Paragraph.holds_inlines());
        assert!(!NodeKind::Item.holds_inlines());
        assert!(!NodeKind::Emphasis.is_block());
        assert!(NodeKind::Emphasis.scans_triggers());
        assert!(
            !NodeKind::Link {
                url: String::new(),
                title: String::new()
            }
            .scans_triggers()
        );
    }
}
