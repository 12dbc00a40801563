//! Flattened, presentation-oriented view of a document.
//!
//! Clients that lay out native views rather than HTML want a shallow list of
//! elements: block quotes fold into quote lines carrying their depth, images
//! split paragraphs, and a task item's checkbox becomes the first element of
//! its first text line.

use std::fmt;

use crate::document::Document;
use crate::node::{Checkbox, Node, NodeKind, Span};

/// Inline element of a text line.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum TextElement {
    Text { text: String },
    SoftBreak,
    LineBreak,
    Code { text: String },
    Emphasis { children: TextLine },
    Strong { children: TextLine },
    Link {
        children: TextLine,
        title: String,
        url: String,
    },
    Strikethrough { children: TextLine },
    Mention { login: String },
    Checkbox { checked: bool, span: Span },
    Html { text: String },
}

/// A run of inline elements.
pub type TextLine = Vec<TextElement>;

impl TextElement {
    /// Text a reader would see: markup dropped, mentions reduced to the login.
    #[must_use]
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.push_plain(&mut out);
        out
    }

    fn push_plain(&self, out: &mut String) {
        match self {
            Self::Text { text } | Self::Code { text } => out.push_str(text),
            Self::SoftBreak | Self::LineBreak => out.push('\n'),
            Self::Emphasis { children }
            | Self::Strong { children }
            | Self::Strikethrough { children }
            | Self::Link { children, .. } => {
                for child in children {
                    child.push_plain(out);
                }
            }
            Self::Mention { login } => out.push_str(login),
            Self::Checkbox { .. } | Self::Html { .. } => {}
        }
    }
}

/// Plain text of a whole line.
#[must_use]
pub fn plain_text(line: &[TextElement]) -> String {
    let mut out = String::new();
    for element in line {
        element.push_plain(&mut out);
    }
    out
}

fn join(line: &[TextElement]) -> String {
    line.iter().map(ToString::to_string).collect()
}

impl fmt::Display for TextElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { text } | Self::Html { text } => f.write_str(text),
            Self::SoftBreak | Self::LineBreak => f.write_str("\n"),
            Self::Code { text } => write!(f, "`{text}`"),
            Self::Emphasis { children } => write!(f, "_{}_", join(children)),
            Self::Strong { children } => write!(f, "**{}**", join(children)),
            Self::Link {
                children,
                title,
                url,
            } => write!(f, "[{}]({url} \"{title}\")", join(children)),
            Self::Strikethrough { children } => write!(f, "~~{}~~", join(children)),
            Self::Mention { login } => write!(f, "@{login}"),
            Self::Checkbox { checked, .. } => f.write_str(if *checked { "[x]" } else { "[ ]" }),
        }
    }
}

/// Row of a flattened table.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum TableRow {
    Header(Vec<TextLine>),
    Row(Vec<TextLine>),
}

/// Top-level element of the flattened view.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(tag = "type", rename_all = "snake_case"))]
pub enum Element {
    Text {
        items: TextLine,
    },
    Quote {
        items: TextLine,
        /// Block quote depth, starting at 1.
        level: usize,
    },
    Image {
        title: String,
        url: String,
    },
    Html {
        text: String,
    },
    Table {
        rows: Vec<TableRow>,
    },
    ThematicBreak,
    CodeBlock {
        text: String,
        language: Option<String>,
    },
    Heading {
        text: TextLine,
        level: u8,
    },
    List {
        /// Elements of each item.
        items: Vec<Vec<Element>>,
        ordered: bool,
        /// List nesting depth, 0 for top-level lists.
        level: usize,
    },
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text { items } => write!(f, "text: {}", join(items)),
            Self::Quote { items, .. } => write!(f, "quote: {}", join(items)),
            Self::Image { url, .. } => write!(f, "image: {url}"),
            Self::Html { text } => write!(f, "html: {text}"),
            Self::Table { .. } => f.write_str("table"),
            Self::ThematicBreak => f.write_str("hr"),
            Self::CodeBlock { text, .. } => write!(f, "codeBlock: {text}"),
            Self::Heading { text, level } => write!(f, "heading-{level}: {}", join(text)),
            Self::List { items, ordered, .. } => {
                let kind = if *ordered { "ordered" } else { "unordered" };
                let items: Vec<String> = items
                    .iter()
                    .map(|item| item.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "))
                    .collect();
                write!(f, "list-{kind}: {}", items.join("\n"))
            }
        }
    }
}

#[derive(Clone, Copy)]
struct Depth {
    quote: usize,
    list: usize,
}

impl Document {
    /// Flatten the tree into presentation elements.
    ///
    /// # Example
    ///
    /// ```
    /// use gfmx_engine::{Element, Parser, TextElement, global_registry};
    ///
    /// let document = Parser::new(global_registry()).parse("> hi @bob");
    /// let elements = document.flat_elements();
    ///
    /// assert_eq!(
    ///     elements,
    ///     vec![Element::Quote {
    ///         items: vec![
    ///             TextElement::Text { text: "hi ".to_owned() },
    ///             TextElement::Mention { login: "bob".to_owned() },
    ///         ],
    ///         level: 1,
    ///     }]
    /// );
    /// ```
    #[must_use]
    pub fn flat_elements(&self) -> Vec<Element> {
        let mut out = Vec::new();
        let depth = Depth { quote: 0, list: 0 };
        for block in &self.root().children {
            fold_block(block, depth, &mut out);
        }
        out
    }
}

fn fold_block(node: &Node, depth: Depth, out: &mut Vec<Element>) {
    match &node.kind {
        NodeKind::BlockQuote => {
            let deeper = Depth {
                quote: depth.quote + 1,
                ..depth
            };
            for child in &node.children {
                fold_block(child, deeper, out);
            }
        }
        NodeKind::Paragraph => fold_paragraph(&node.children, depth, out),
        NodeKind::Heading { level } => out.push(Element::Heading {
            text: text_line(&node.children),
            level: *level,
        }),
        NodeKind::CodeBlock { info, literal } => out.push(Element::CodeBlock {
            text: literal.clone(),
            language: info
                .as_deref()
                .and_then(|info| info.split_whitespace().next())
                .map(ToOwned::to_owned),
        }),
        NodeKind::HtmlBlock { literal } => out.push(Element::Html {
            text: literal.clone(),
        }),
        NodeKind::ThematicBreak => out.push(Element::ThematicBreak),
        NodeKind::List(data) => {
            let inner = Depth {
                quote: 0,
                list: depth.list + 1,
            };
            let items = node
                .children
                .iter()
                .map(|item| fold_item(item, inner))
                .collect();
            out.push(Element::List {
                items,
                ordered: data.is_ordered(),
                level: depth.list,
            });
        }
        NodeKind::Table { .. } => out.push(Element::Table {
            rows: node.children.iter().map(table_row).collect(),
        }),
        _ if node.is_block() => {
            for child in &node.children {
                fold_block(child, depth, out);
            }
        }
        _ => fold_paragraph(std::slice::from_ref(node), depth, out),
    }
}

fn fold_item(item: &Node, depth: Depth) -> Vec<Element> {
    let mut elements = Vec::new();
    for child in &item.children {
        fold_block(child, depth, &mut elements);
    }

    if let Some(&Checkbox { checked, span }) = item.checkbox() {
        let checkbox = TextElement::Checkbox { checked, span };
        match elements.first_mut() {
            Some(Element::Text { items }) => items.insert(0, checkbox),
            _ => elements.insert(
                0,
                Element::Text {
                    items: vec![checkbox],
                },
            ),
        }
    }
    elements
}

fn fold_paragraph(inlines: &[Node], depth: Depth, out: &mut Vec<Element>) {
    let mut line = TextLine::new();
    for inline in inlines {
        if let NodeKind::Image { url, title } = &inline.kind {
            flush_line(&mut line, depth, out);
            out.push(Element::Image {
                title: title.clone(),
                url: url.clone(),
            });
        } else if let Some(element) = text_element(inline) {
            line.push(element);
        }
    }
    flush_line(&mut line, depth, out);
}

fn flush_line(line: &mut TextLine, depth: Depth, out: &mut Vec<Element>) {
    if line.is_empty() {
        return;
    }
    let items = std::mem::take(line);
    out.push(if depth.quote > 0 {
        Element::Quote {
            items,
            level: depth.quote,
        }
    } else {
        Element::Text { items }
    });
}

fn table_row(row: &Node) -> TableRow {
    let cells = row
        .children
        .iter()
        .map(|cell| text_line(&cell.children))
        .collect();
    if row.kind == NodeKind::TableHead {
        TableRow::Header(cells)
    } else {
        TableRow::Row(cells)
    }
}

fn text_line(inlines: &[Node]) -> TextLine {
    inlines.iter().filter_map(text_element).collect()
}

fn text_element(node: &Node) -> Option<TextElement> {
    let element = match &node.kind {
        NodeKind::Text { literal } => TextElement::Text {
            text: literal.clone(),
        },
        NodeKind::SoftBreak => TextElement::SoftBreak,
        NodeKind::HardBreak => TextElement::LineBreak,
        NodeKind::Code { literal } => TextElement::Code {
            text: literal.clone(),
        },
        NodeKind::Html { literal } => TextElement::Html {
            text: literal.clone(),
        },
        NodeKind::Emphasis => TextElement::Emphasis {
            children: text_line(&node.children),
        },
        NodeKind::Strong => TextElement::Strong {
            children: text_line(&node.children),
        },
        NodeKind::Strikethrough => TextElement::Strikethrough {
            children: text_line(&node.children),
        },
        NodeKind::Link { url, title } => TextElement::Link {
            children: text_line(&node.children),
            title: title.clone(),
            url: url.clone(),
        },
        NodeKind::Extension { .. } => TextElement::Mention {
            login: node.mention()?.handle.clone(),
        },
        _ => return None,
    };
    Some(element)
}
