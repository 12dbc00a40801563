//! Parsed document.

use crate::node::{Mention, Node, Span};
use crate::scanner::LineIndex;

/// A parsed markdown document: the tree plus the source it points into.
#[derive(Clone, Debug)]
pub struct Document {
    source: String,
    root: Node,
    lines: LineIndex,
}

impl Document {
    pub(crate) fn new(source: &str, root: Node) -> Self {
        Self {
            source: source.to_owned(),
            root,
            lines: LineIndex::new(source),
        }
    }

    /// Root `Document` node.
    #[must_use]
    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Consume the document, keeping only the tree.
    #[must_use]
    pub fn into_root(self) -> Node {
        self.root
    }

    /// Source the tree was parsed from.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Source text covered by `span`.
    #[must_use]
    pub fn slice(&self, span: Span) -> &str {
        self.source.get(span.as_range()).unwrap_or_default()
    }

    /// Line table of the source.
    #[must_use]
    pub fn line_index(&self) -> &LineIndex {
        &self.lines
    }

    /// 1-based line and byte column of `offset`.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        self.lines.line_col(offset)
    }

    /// All mentions in document order.
    #[must_use]
    pub fn mentions(&self) -> Vec<&Mention> {
        let mut mentions = Vec::new();
        self.root.walk(&mut |node| {
            if let Some(mention) = node.mention() {
                mentions.push(mention);
            }
        });
        mentions
    }

    /// All task items in document order.
    #[must_use]
    pub fn task_items(&self) -> Vec<&Node> {
        let mut items = Vec::new();
        self.root.walk(&mut |node| {
            if node.is_task_item() {
                items.push(node);
            }
        });
        items
    }
}
