//! Extensible GitHub-flavored markdown engine.
//!
//! This crate parses markdown into a [`Node`] tree and renders it through a
//! generic [`MarkdownRenderer`]. On top of the CommonMark/GFM grammar it runs
//! pluggable syntax extensions held in a [`Registry`]:
//!
//! - [`MentionExtension`]: `@handle` references (inline trigger `@`)
//! - [`CheckboxExtension`]: `[ ]` / `[x]` task-list items (list-item block starter)
//!
//! # Architecture
//!
//! Data flows loader → registry → parser → tree → renderer:
//!
//! - [`ensure_registered`] / [`global_registry`] populate the process-wide
//!   registry exactly once. Callers that want an explicit handle build their
//!   own with [`Registry::with_extensions`].
//! - [`Parser`] consults the registry while building the tree. A failed match
//!   is [`Match::Declined`] and leaves the input as literal text.
//! - [`MarkdownRenderer`] walks the tree; format differences live in the
//!   [`RenderBackend`] implementations [`HtmlBackend`] and [`XhtmlBackend`].
//!
//! # Example
//!
//! ```
//! use gfmx_engine::{HtmlBackend, MarkdownRenderer, Parser, global_registry};
//!
//! let registry = global_registry();
//! let document = Parser::new(registry).parse("- [ ] review @alice's patch");
//! let html = MarkdownRenderer::<HtmlBackend>::new(registry)
//!     .with_mention_url_template("https://github.com/{handle}")
//!     .render(&document);
//!
//! assert!(html.contains(r#"<input type="checkbox" disabled>"#));
//! assert!(html.contains(r#"<a class="mention" href="https://github.com/alice">@alice</a>"#));
//! ```

mod backend;
mod document;
mod elements;
pub mod extension;
mod html;
mod loader;
mod node;
mod parser;
mod registry;
mod renderer;
mod scanner;
mod util;
mod xhtml;

pub use backend::RenderBackend;
pub use document::Document;
pub use elements::{Element, TableRow, TextElement, TextLine, plain_text};
pub use extension::{
    CheckboxExtension, Extension, ExtensionKind, HANDLE_PLACEHOLDER, Match, MentionExtension,
    UnknownExtension, create_extension, expand_template,
};
pub use html::HtmlBackend;
pub use loader::{BUILTIN_EXTENSIONS, ensure_registered, global_registry};
pub use node::{Alignment, Checkbox, ListData, Mention, Node, NodeKind, Payload, Span};
pub use parser::Parser;
pub use registry::{Registration, Registry, register_extension};
pub use renderer::{MarkdownRenderer, RenderOptions, markdown_to_html};
pub use scanner::{
    Cursor, LineIndex, LineSpan, is_handle_char, is_word_boundary, list_marker_prefix,
};
pub use util::escape_html;
pub use xhtml::XhtmlBackend;
