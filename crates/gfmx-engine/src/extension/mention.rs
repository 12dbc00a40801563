//! `@handle` mention references.
//!
//! A mention is `@` on a word boundary followed by one or more handle chars
//! (ASCII letters, digits, `-`, `_`). The node is opaque: nothing inside it is
//! parsed further.

use crate::backend::RenderBackend;
use crate::node::{Mention, Node, NodeKind, Payload, Span};
use crate::renderer::RenderOptions;
use crate::scanner::{is_handle_char, is_word_boundary};

use super::{ExtensionKind, InlineMatch, InlineScan, Match};

/// Placeholder substituted with the handle in mention URL templates.
pub const HANDLE_PLACEHOLDER: &str = "{handle}";

/// Inline extension producing mention nodes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MentionExtension;

impl MentionExtension {
    pub(crate) const TRIGGERS: &'static [char] = &['@'];

    pub(crate) fn try_match(self, scan: &InlineScan<'_>) -> Match<InlineMatch> {
        let start = scan.offset();
        if !is_word_boundary(scan.source, start) {
            tracing::trace!(offset = start, "mention declined: not on a word boundary");
            return Match::Declined;
        }
        // The base parser drops the backslash of `\@` and hands over the bare `@`.
        // An even run of backslashes escapes itself instead.
        let backslashes = scan.source[..start]
            .bytes()
            .rev()
            .take_while(|&b| b == b'\\')
            .count();
        if backslashes % 2 == 1 {
            tracing::trace!(offset = start, "mention declined: escaped trigger");
            return Match::Declined;
        }

        let mut cursor = scan.cursor.clone();
        if cursor.bump() != Some('@') {
            return Match::Declined;
        }
        let handle = cursor.eat_while(is_handle_char);
        if handle.is_empty() {
            tracing::trace!(offset = start, "mention declined: empty handle");
            return Match::Declined;
        }

        let consumed = 1 + handle.len();
        let span = Span::new(start, start + consumed);
        let node = Node::new(
            NodeKind::Extension {
                extension: ExtensionKind::Mention,
            },
            span,
        )
        .with_payload(Payload::Mention(Mention {
            handle: handle.to_owned(),
            span,
        }));

        Match::Matched(InlineMatch { node, consumed })
    }

    pub(crate) fn render<B: RenderBackend>(
        self,
        node: &Node,
        options: &RenderOptions,
        out: &mut String,
    ) {
        let Some(mention) = node.mention() else {
            return;
        };
        let href = options
            .mention_url_template
            .as_deref()
            .map(|template| expand_template(template, &mention.handle));
        B::mention(&mention.handle, href.as_deref(), out);
    }
}

/// Substitute every `{handle}` placeholder in `template`.
///
/// # Example
///
/// ```
/// use gfmx_engine::expand_template;
///
/// assert_eq!(
///     expand_template("https://github.com/{handle}", "octocat"),
///     "https://github.com/octocat"
/// );
/// ```
#[must_use]
pub fn expand_template(template: &str, handle: &str) -> String {
    template.replace(HANDLE_PLACEHOLDER, handle)
}
