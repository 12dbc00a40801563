//! Block and inline parsing.
//!
//! The base grammar comes from `pulldown-cmark`. Its offset event stream is
//! folded into a [`Node`](crate::Node) tree by the block pass, which hands
//! each finished inline container to the inline pass and each list item's
//! first block to the registered block starters.

mod block;
mod inline;

use pulldown_cmark::Options;

use crate::document::Document;
use crate::registry::Registry;

use block::TreeBuilder;

/// Markdown parser bound to an extension registry.
///
/// # Example
///
/// ```
/// use gfmx_engine::{Parser, global_registry};
///
/// let document = Parser::new(global_registry()).parse("- [x] ship it, @bob");
/// assert_eq!(document.task_items().len(), 1);
/// assert_eq!(document.mentions()[0].handle, "bob");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Parser<'r> {
    registry: &'r Registry,
    gfm: bool,
}

impl<'r> Parser<'r> {
    /// Create a parser with GFM enabled.
    #[must_use]
    pub fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            gfm: true,
        }
    }

    /// Enable or disable GitHub Flavored Markdown features.
    ///
    /// GFM is enabled by default. When enabled, the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Footnotes
    ///
    /// Task lists are contributed by the checkbox extension, not by this flag.
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Registry consulted during parsing.
    #[must_use]
    pub fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Get base parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_FOOTNOTES
        } else {
            Options::empty()
        }
    }

    /// Parse `source` into a document. Never fails.
    #[must_use]
    pub fn parse(&self, source: &str) -> Document {
        let events =
            pulldown_cmark::Parser::new_ext(source, self.parser_options()).into_offset_iter();
        let root = TreeBuilder::new(source, self.registry).build(events);
        tracing::trace!(
            bytes = source.len(),
            blocks = root.children.len(),
            "Parsed document"
        );
        Document::new(source, root)
    }
}
