//! `gfmx tree` command implementation.

use std::fmt::Write;
use std::path::PathBuf;

use clap::Args;
use gfmx_config::{CliSettings, Config};
use gfmx_engine::{Document, Node, NodeKind, Parser, Payload};

use crate::commands::{read_input, registry_for};
use crate::error::CliError;
use crate::output::write_stdout;

/// Arguments for the tree command.
#[derive(Args)]
pub(crate) struct TreeArgs {
    /// Markdown file to parse (default: stdin).
    input: Option<PathBuf>,

    /// Path to configuration file (default: auto-discover gfmx.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print JSON instead of an indented outline.
    #[arg(long)]
    json: bool,

    /// Print the flattened element list instead of the tree.
    #[arg(long)]
    flat: bool,

    /// Disable GFM tables, strikethrough and footnotes.
    #[arg(long)]
    no_gfm: bool,
}

impl TreeArgs {
    /// Execute the tree command.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration fails, input cannot be read or
    /// JSON serialization fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            gfm: self.no_gfm.then_some(false),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let source = read_input(self.input.as_deref())?;
        let registry = registry_for(&config.parse)?;
        let document = Parser::new(&registry)
            .with_gfm(config.parse.gfm)
            .parse(&source);

        let text = match (self.flat, self.json) {
            (false, false) => outline(&document),
            (false, true) => serde_json::to_string_pretty(document.root())?,
            (true, false) => flat_outline(&document),
            (true, true) => serde_json::to_string_pretty(&document.flat_elements())?,
        };
        write_stdout(&text)?;
        Ok(())
    }
}

/// Indented outline of the tree, one node per line.
pub(crate) fn outline(document: &Document) -> String {
    let mut out = String::new();
    outline_node(document, document.root(), 0, &mut out);
    out
}

fn outline_node(document: &Document, node: &Node, depth: usize, out: &mut String) {
    let (line, col) = document.line_col(node.span.start);
    let _ = write!(
        out,
        "{:indent$}{} {}:{} [{}..{}]",
        "",
        describe(&node.kind),
        line,
        col,
        node.span.start,
        node.span.end,
        indent = depth * 2
    );
    match &node.payload {
        Some(Payload::Mention(mention)) => {
            let _ = write!(out, " @{}", mention.handle);
        }
        Some(Payload::Checkbox(checkbox)) => {
            let mark = if checkbox.checked { 'x' } else { ' ' };
            let _ = write!(out, " [{mark}]");
        }
        None => {}
    }
    out.push('\n');

    for child in &node.children {
        outline_node(document, child, depth + 1, out);
    }
}

/// One-word kind name plus the attributes worth showing in an outline.
fn describe(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Document => "document".to_owned(),
        NodeKind::Paragraph => "paragraph".to_owned(),
        NodeKind::Heading { level } => format!("heading-{level}"),
        NodeKind::BlockQuote => "blockquote".to_owned(),
        NodeKind::CodeBlock { info, .. } => match info.as_deref() {
            Some(info) if !info.is_empty() => format!("code_block {info}"),
            _ => "code_block".to_owned(),
        },
        NodeKind::HtmlBlock { .. } => "html_block".to_owned(),
        NodeKind::ThematicBreak => "thematic_break".to_owned(),
        NodeKind::List(data) => {
            let mut name = match data.start {
                Some(start) => format!("list ordered={start}"),
                None => "list".to_owned(),
            };
            name.push_str(if data.tight { " tight" } else { " loose" });
            if data.task {
                name.push_str(" task");
            }
            name
        }
        NodeKind::Item => "item".to_owned(),
        NodeKind::Table { .. } => "table".to_owned(),
        NodeKind::TableHead => "table_head".to_owned(),
        NodeKind::TableRow => "table_row".to_owned(),
        NodeKind::TableCell => "table_cell".to_owned(),
        NodeKind::FootnoteDefinition { label } => format!("footnote_definition {label}"),
        NodeKind::Text { literal } => format!("text {literal:?}"),
        NodeKind::Code { literal } => format!("code {literal:?}"),
        NodeKind::Html { literal } => format!("html {literal:?}"),
        NodeKind::SoftBreak => "soft_break".to_owned(),
        NodeKind::HardBreak => "hard_break".to_owned(),
        NodeKind::Emphasis => "emphasis".to_owned(),
        NodeKind::Strong => "strong".to_owned(),
        NodeKind::Strikethrough => "strikethrough".to_owned(),
        NodeKind::Link { url, .. } => format!("link {url}"),
        NodeKind::Image { url, .. } => format!("image {url}"),
        NodeKind::FootnoteReference { label } => format!("footnote_reference {label}"),
        NodeKind::Extension { extension } => extension.to_string(),
    }
}

/// Flattened elements, one per line.
pub(crate) fn flat_outline(document: &Document) -> String {
    let mut out = String::new();
    for element in document.flat_elements() {
        let _ = writeln!(out, "{element}");
    }
    out
}
