//! Syntax extensions layered on top of the base markdown grammar.
//!
//! Extensions form a closed set of variants sharing one capability surface:
//!
//! - **Inline triggers**: chars that make the inline parser offer the cursor
//!   to the extension ([`Extension::try_match_inline`]).
//! - **Block starters**: a predicate consulted once at the start of a list
//!   item's first line ([`Extension::try_match_block`]).
//! - **Postprocessing**: a pass over the finished tree ([`Extension::postprocess`]).
//! - **Rendering**: output for the nodes and payloads the extension produced
//!   ([`Extension::render`]).
//!
//! A failed match is [`Match::Declined`], never an error: the parser falls
//! through to its default handling and the input stays literal text.

mod checkbox;
mod mention;

use std::fmt;
use std::str::FromStr;

pub use checkbox::CheckboxExtension;
pub use mention::{HANDLE_PLACEHOLDER, MentionExtension, expand_template};

use crate::backend::RenderBackend;
use crate::node::{Node, Payload};
use crate::renderer::RenderOptions;
use crate::scanner::Cursor;

/// Identifier of a built-in extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ExtensionKind {
    /// `@handle` references.
    Mention,
    /// `[ ]` / `[x]` task-list markers.
    Checkbox,
}

impl ExtensionKind {
    /// Stable identifier used for registration and configuration.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Mention => "mention",
            Self::Checkbox => "checkbox",
        }
    }
}

impl fmt::Display for ExtensionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error for an extension identifier that names no built-in extension.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown extension: {0}")]
pub struct UnknownExtension(pub String);

impl FromStr for ExtensionKind {
    type Err = UnknownExtension;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mention" => Ok(Self::Mention),
            "checkbox" => Ok(Self::Checkbox),
            other => Err(UnknownExtension(other.to_owned())),
        }
    }
}

/// Outcome of offering input to an extension.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Match<T> {
    /// The extension consumed input and produced a result.
    Matched(T),
    /// The extension does not apply here; default parsing continues.
    Declined,
}

impl<T> Match<T> {
    /// Whether the extension matched.
    pub fn is_matched(&self) -> bool {
        matches!(self, Self::Matched(_))
    }

    /// Convert into an `Option`, dropping the decline.
    pub fn matched(self) -> Option<T> {
        match self {
            Self::Matched(value) => Some(value),
            Self::Declined => None,
        }
    }
}

/// Inline parser state offered to an inline trigger.
#[derive(Clone, Debug)]
pub struct InlineScan<'a> {
    /// Complete document source.
    pub source: &'a str,
    /// Cursor over the text run, positioned on the trigger char.
    pub cursor: Cursor<'a>,
    /// Source offset of the text run's first byte.
    ///
    /// Text runs offered to triggers are verbatim source slices, so
    /// `base + cursor.pos()` is the trigger's source offset.
    pub base: usize,
}

impl InlineScan<'_> {
    /// Source offset of the cursor.
    #[must_use]
    pub fn offset(&self) -> usize {
        self.base + self.cursor.pos()
    }
}

/// Node produced by an inline match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InlineMatch {
    /// The node replacing the consumed text.
    pub node: Node,
    /// Bytes consumed from the cursor position.
    pub consumed: usize,
}

/// Context offered to block starters at the beginning of a list item.
#[derive(Clone, Copy, Debug)]
pub struct ItemStart<'a> {
    /// Complete document source.
    pub source: &'a str,
    /// Source offset where the list item begins (at or before its marker).
    pub item_start: usize,
    /// Source offset of the item's first inline content.
    pub content_start: usize,
    /// Literal of the first text run, which begins at `content_start`.
    pub text: &'a str,
}

/// Payload produced by a block-start match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockMatch {
    /// Payload attached to the list item.
    pub payload: Payload,
    /// Bytes to strip from the front of the first text run.
    pub consumed: usize,
}

/// A syntax extension.
///
/// # Example
///
/// ```
/// use gfmx_engine::{ExtensionKind, create_extension};
///
/// let mention = create_extension(ExtensionKind::Mention);
/// assert_eq!(mention.name(), "mention");
/// assert_eq!(mention.inline_triggers(), &['@']);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Extension {
    Mention(MentionExtension),
    Checkbox(CheckboxExtension),
}

impl Extension {
    /// Create the extension identified by `kind`.
    #[must_use]
    pub fn create(kind: ExtensionKind) -> Self {
        match kind {
            ExtensionKind::Mention => Self::Mention(MentionExtension),
            ExtensionKind::Checkbox => Self::Checkbox(CheckboxExtension),
        }
    }

    /// Kind of this extension.
    #[must_use]
    pub fn kind(&self) -> ExtensionKind {
        match self {
            Self::Mention(_) => ExtensionKind::Mention,
            Self::Checkbox(_) => ExtensionKind::Checkbox,
        }
    }

    /// Identifier string.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.kind().name()
    }

    /// Chars that make the inline parser offer the cursor to this extension.
    #[must_use]
    pub fn inline_triggers(&self) -> &'static [char] {
        match self {
            Self::Mention(_) => MentionExtension::TRIGGERS,
            Self::Checkbox(_) => &[],
        }
    }

    /// Whether this extension installs a list-item block starter.
    #[must_use]
    pub fn starts_blocks(&self) -> bool {
        matches!(self, Self::Checkbox(_))
    }

    /// Try to match inline syntax at the cursor.
    pub fn try_match_inline(&self, scan: &InlineScan<'_>) -> Match<InlineMatch> {
        match self {
            Self::Mention(ext) => ext.try_match(scan),
            Self::Checkbox(_) => Match::Declined,
        }
    }

    /// Try to match at the start of a list item's first line.
    pub fn try_match_block(&self, start: &ItemStart<'_>) -> Match<BlockMatch> {
        match self {
            Self::Mention(_) => Match::Declined,
            Self::Checkbox(ext) => ext.try_match(start),
        }
    }

    /// Adjust the finished tree.
    pub fn postprocess(&self, root: &mut Node) {
        match self {
            Self::Mention(_) => {}
            Self::Checkbox(ext) => ext.postprocess(root),
        }
    }

    /// Render the part of `node` this extension owns.
    ///
    /// For inline extension nodes this is the whole node; for list items it is
    /// the marker that precedes the item's content.
    pub fn render<B: RenderBackend>(&self, node: &Node, options: &RenderOptions, out: &mut String) {
        match self {
            Self::Mention(ext) => ext.render::<B>(node, options, out),
            Self::Checkbox(ext) => ext.render::<B>(node, out),
        }
    }
}

/// Create the extension identified by `kind`.
#[must_use]
pub fn create_extension(kind: ExtensionKind) -> Extension {
    Extension::create(kind)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_name() {
        for kind in [ExtensionKind::Mention, ExtensionKind::Checkbox] {
            assert_eq!(kind.name().parse::<ExtensionKind>(), Ok(kind));
            assert_eq!(kind.to_string(), kind.name());
        }
    }

    #[test]
    fn test_unknown_kind() {
        let err = "emoji".parse::<ExtensionKind>().unwrap_err();
        assert_eq!(err.to_string(), "unknown extension: emoji");
    }

    #[test]
    fn test_capabilities() {
        let mention = create_extension(ExtensionKind::Mention);
        assert_eq!(mention.kind(), ExtensionKind::Mention);
        assert!(!mention.starts_blocks());

        let checkbox = create_extension(ExtensionKind::Checkbox);
        assert_eq!(checkbox.name(), "checkbox");
        assert!(checkbox.inline_triggers().is_empty());
        assert!(checkbox.starts_blocks());
    }

    #[test]
    fn test_match_helpers() {
        assert!(Match::Matched(1).is_matched());
        assert_eq!(Match::Matched(1).matched(), Some(1));
        assert!(!Match::<u8>::Declined.is_matched());
        assert_eq!(Match::<u8>::Declined.matched(), None);
    }

    #[test]
    fn test_mismatched_hooks_decline() {
        let checkbox = create_extension(ExtensionKind::Checkbox);
        let scan = InlineScan {
            source: "@bob",
            cursor: Cursor::new("@bob"),
            base: 0,
        };
        assert_eq!(checkbox.try_match_inline(&scan), Match::Declined);

        let mention = create_extension(ExtensionKind::Mention);
        let start = ItemStart {
            source: "- [x] a",
            item_start: 0,
            content_start: 2,
            text: "[x] a",
        };
        assert_eq!(mention.try_match_block(&start), Match::Declined);
    }
}
