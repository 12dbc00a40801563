//! Task-list checkboxes.
//!
//! A list item whose first line starts with `[ ]`, `[x]` or `[X]` followed by
//! a space or tab becomes a task item. Anything else (`[y]`, a missing
//! bracket, no trailing blank) leaves the item and its text untouched.

use crate::backend::RenderBackend;
use crate::node::{Checkbox, Node, NodeKind, Payload, Span};
use crate::scanner::{Cursor, list_marker_prefix};

use super::{BlockMatch, ItemStart, Match};

/// Block extension turning list items into task items.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CheckboxExtension;

impl CheckboxExtension {
    pub(crate) fn try_match(self, start: &ItemStart<'_>) -> Match<BlockMatch> {
        let Some(prefix) = start.source.get(start.item_start..start.content_start) else {
            return Match::Declined;
        };
        if !list_marker_prefix(prefix) {
            return Match::Declined;
        }

        let mut cursor = Cursor::at(start.source, start.content_start);
        let checked = if cursor.eat_str("[ ]") {
            false
        } else if cursor.eat_str("[x]") || cursor.eat_str("[X]") {
            true
        } else {
            return Match::Declined;
        };
        if !matches!(cursor.peek(), Some(' ' | '\t')) {
            tracing::trace!(
                offset = start.content_start,
                "checkbox declined: marker not followed by a blank"
            );
            return Match::Declined;
        }

        // Escapes and entities rewrite text; the run must still spell the marker.
        let marker = &start.source[start.content_start..cursor.pos()];
        if !start.text.starts_with(marker) {
            return Match::Declined;
        }
        let mut text = Cursor::at(start.text, marker.len());
        text.eat_while(|c| c == ' ' || c == '\t');

        Match::Matched(BlockMatch {
            payload: Payload::Checkbox(Checkbox {
                checked,
                span: Span::new(start.content_start, cursor.pos()),
            }),
            consumed: text.pos(),
        })
    }

    /// Flag every list that contains a task item.
    pub(crate) fn postprocess(self, node: &mut Node) {
        for child in &mut node.children {
            self.postprocess(child);
        }
        if !matches!(node.kind, NodeKind::List(_)) {
            return;
        }
        let has_task = node.children.iter().any(Node::is_task_item);
        if let NodeKind::List(data) = &mut node.kind {
            data.task = has_task;
        }
    }

    pub(crate) fn render<B: RenderBackend>(self, node: &Node, out: &mut String) {
        if let Some(checkbox) = node.checkbox() {
            B::task_list_marker(checkbox.checked, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::ListData;

    fn start(source: &str, content_start: usize) -> ItemStart<'_> {
        ItemStart {
            source,
            item_start: 0,
            content_start,
            text: &source[content_start..],
        }
    }

    fn matched(source: &str, content_start: usize) -> BlockMatch {
        CheckboxExtension
            .try_match(&start(source, content_start))
            .matched()
            .expect("expected a checkbox")
    }

    #[test]
    fn test_checked() {
        let found = matched("- [x] done", 2);
        assert_eq!(
            found.payload,
            Payload::Checkbox(Checkbox {
                checked: true,
                span: Span::new(2, 5),
            })
        );
        assert_eq!(found.consumed, 4);
    }

    #[test]
    fn test_upper_case_checked() {
        let found = matched("* [X] done", 2);
        assert!(matches!(
            found.payload,
            Payload::Checkbox(Checkbox { checked: true, .. })
        ));
    }

    #[test]
    fn test_unchecked() {
        let found = matched("1. [ ] todo", 3);
        assert!(matches!(
            found.payload,
            Payload::Checkbox(Checkbox { checked: false, .. })
        ));
    }

    #[test]
    fn test_consumes_all_blanks_after_marker() {
        let found = matched("- [ ]   spaced", 2);
        assert_eq!(found.consumed, 6);
    }

    #[test]
    fn test_declines_unknown_mark() {
        let result = CheckboxExtension.try_match(&start("- [z] nope", 2));
        assert_eq!(result, Match::Declined);
    }

    #[test]
    fn test_declines_without_trailing_blank() {
        assert_eq!(
            CheckboxExtension.try_match(&start("- [x]done", 2)),
            Match::Declined
        );
        assert_eq!(
            CheckboxExtension.try_match(&start("- [ ]", 2)),
            Match::Declined
        );
    }

    #[test]
    fn test_declines_missing_bracket() {
        assert_eq!(
            CheckboxExtension.try_match(&start("- [x done", 2)),
            Match::Declined
        );
    }

    #[test]
    fn test_declines_when_not_on_first_line() {
        let source = "-\n  [x] late";
        assert_eq!(
            CheckboxExtension.try_match(&start(source, 4)),
            Match::Declined
        );
    }

    #[test]
    fn test_declines_when_text_differs_from_source() {
        let source = "- \\[x] escaped";
        let item = ItemStart {
            source,
            item_start: 0,
            content_start: 2,
            text: "[x] escaped",
        };
        assert_eq!(CheckboxExtension.try_match(&item), Match::Declined);
    }

    #[test]
    fn test_postprocess_flags_task_lists() {
        let task = Node::new(NodeKind::Item, 0..7).with_payload(Payload::Checkbox(Checkbox {
            checked: false,
            span: Span::new(2, 5),
        }));
        let plain = Node::new(NodeKind::Item, 8..15);
        let mut list = Node::new(NodeKind::List(ListData::default()), 0..15);
        list.children = vec![task, plain];
        let mut plain_list = Node::new(NodeKind::List(ListData::default()), 16..20);
        plain_list.children = vec![Node::new(NodeKind::Item, 16..20)];
        let mut root = Node::new(NodeKind::Document, 0..20);
        root.children = vec![list, plain_list];

        CheckboxExtension.postprocess(&mut root);

        assert!(root.children[0].list_data().unwrap().task);
        assert!(!root.children[1].list_data().unwrap().task);
    }
}
