//! Render backend trait for format-specific rendering.
//!
//! This trait abstracts the differences between HTML5 and XHTML output,
//! allowing the main renderer to be generic over the output format.

use crate::node::Alignment;

/// Backend trait for format-specific rendering operations.
///
/// Implementations provide format-specific rendering for:
/// - Code blocks and blockquotes
/// - Void elements (`<br>`, `<hr>`, `<img>`, `<input>`)
/// - Extension output (task-list checkboxes, mentions)
/// - Whitespace between blocks
pub trait RenderBackend {
    /// Render a code block.
    ///
    /// # Arguments
    ///
    /// * `lang` - Optional language identifier (e.g., "rust", "python")
    /// * `content` - The code content
    /// * `out` - Output buffer to write to
    fn code_block(lang: Option<&str>, content: &str, out: &mut String);

    /// Render blockquote start tag.
    fn blockquote_start(out: &mut String) {
        out.push_str("<blockquote>");
    }

    /// Render blockquote end tag.
    fn blockquote_end(out: &mut String) {
        out.push_str("</blockquote>");
    }

    /// Render an image.
    ///
    /// # Arguments
    ///
    /// * `src` - Image source URL
    /// * `alt` - Alt text for the image
    /// * `title` - Title attribute, omitted when empty
    /// * `out` - Output buffer to write to
    fn image(src: &str, alt: &str, title: &str, out: &mut String);

    /// Render a hard break.
    ///
    /// Default uses `<br>`. Override for format-specific rendering (e.g., `<br />`).
    fn hard_break(out: &mut String) {
        out.push_str("<br>");
    }

    /// Render a horizontal rule.
    ///
    /// Default uses `<hr>`. Override for format-specific rendering (e.g., `<hr />`).
    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr>");
    }

    /// Render a task list marker, including the space that separates it
    /// from the item content.
    ///
    /// Default uses HTML checkbox. Override for format-specific rendering.
    fn task_list_marker(checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked disabled> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled> "#);
        }
    }

    /// Render a mention.
    ///
    /// `href` is the expanded URL template; without one the mention is inert
    /// styled text.
    fn mention(handle: &str, href: Option<&str>, out: &mut String);

    /// Attribute carrying a table cell's alignment, with a leading space.
    fn cell_alignment(alignment: Alignment) -> &'static str {
        match alignment {
            Alignment::Left => r#" style="text-align:left""#,
            Alignment::Center => r#" style="text-align:center""#,
            Alignment::Right => r#" style="text-align:right""#,
            Alignment::None => "",
        }
    }

    /// Separate adjacent block-level markup.
    ///
    /// Called around every block tag. Default emits nothing, producing
    /// compact output.
    fn block_break(_out: &mut String) {}
}
