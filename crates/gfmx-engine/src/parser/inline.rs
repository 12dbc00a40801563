//! Inline pass: text merging, trigger scanning and coalescing.
//!
//! Text runs are only offered to extensions when they are verbatim slices of
//! the source. Runs produced by entities or backslash escapes never match, so
//! `&#64;bob` stays text.

use crate::extension::InlineScan;
use crate::node::{Node, NodeKind};
use crate::registry::Registry;
use crate::scanner::Cursor;

/// Whether `node` is a text node whose literal equals its source slice.
pub(crate) fn is_verbatim(source: &str, node: &Node) -> bool {
    node.as_text()
        .is_some_and(|literal| source.get(node.span.as_range()) == Some(literal))
}

/// Append an inline node, merging it into a preceding contiguous verbatim text.
pub(crate) fn push_inline(source: &str, children: &mut Vec<Node>, node: Node) {
    if let Some(last) = children.last_mut()
        && last.span.end == node.span.start
        && is_verbatim(source, last)
        && is_verbatim(source, &node)
        && let Some(next) = node.as_text()
        && let NodeKind::Text { literal } = &mut last.kind
    {
        literal.push_str(next);
        last.span.end = node.span.end;
        return;
    }
    children.push(node);
}

/// Offer every verbatim text run below `children` to the registry's inline
/// triggers, splitting runs around matched extension nodes.
pub(crate) fn scan_triggers(source: &str, registry: &Registry, children: &mut Vec<Node>) {
    if registry.inline_triggers().next().is_none() {
        return;
    }

    let old = std::mem::take(children);
    for mut child in old {
        if is_verbatim(source, &child) {
            split_text(source, registry, child, children);
            continue;
        }
        if child.kind.scans_triggers() {
            scan_triggers(source, registry, &mut child.children);
        }
        children.push(child);
    }
}

fn split_text(source: &str, registry: &Registry, node: Node, out: &mut Vec<Node>) {
    let Some(literal) = node.as_text() else {
        out.push(node);
        return;
    };
    let base = node.span.start;
    let mut cursor = Cursor::new(literal);
    let mut pending = 0;
    let mut pieces = Vec::new();

    while let Some(c) = cursor.peek() {
        if registry.is_trigger(c) {
            let at = cursor.pos();
            let scan = InlineScan {
                source,
                cursor: cursor.clone(),
                base,
            };
            let found = registry
                .inline_handlers(c)
                .find_map(|ext| ext.try_match_inline(&scan).matched());
            if let Some(found) = found {
                if pending < at {
                    pieces.push(text_node(&literal[pending..at], base + pending));
                }
                pieces.push(found.node);
                cursor = Cursor::at(literal, at + found.consumed);
                pending = cursor.pos();
                continue;
            }
        }
        cursor.bump();
    }

    if pieces.is_empty() {
        out.push(node);
        return;
    }
    if pending < literal.len() {
        pieces.push(text_node(&literal[pending..], base + pending));
    }
    out.append(&mut pieces);
}

fn text_node(literal: &str, start: usize) -> Node {
    Node::new(NodeKind::text(literal), start..start + literal.len())
}

/// Merge adjacent text nodes throughout the subtree.
pub(crate) fn coalesce_text(children: &mut Vec<Node>) {
    let old = std::mem::take(children);
    for mut child in old {
        coalesce_text(&mut child.children);
        if let Some(last) = children.last_mut()
            && let NodeKind::Text { literal } = &mut last.kind
            && let NodeKind::Text { literal: next } = &child.kind
        {
            literal.push_str(next);
            last.span.end = child.span.end;
            continue;
        }
        children.push(child);
    }
}
