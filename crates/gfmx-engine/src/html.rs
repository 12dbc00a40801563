//! HTML backend for markdown rendering.
//!
//! Produces compact HTML5 output suitable for web display.

use std::fmt::Write;

use crate::backend::RenderBackend;
use crate::util::escape_html;

/// HTML render backend.
///
/// Produces semantic HTML5 with:
/// - `<pre><code>` for code blocks
/// - `<blockquote>` for blockquotes
/// - `<img>` for images
/// - `<a class="mention">` for mentions
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        if let Some(lang) = lang {
            let _ = write!(
                out,
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                escape_html(lang),
                escape_html(content)
            );
        } else {
            let _ = write!(out, "<pre><code>{}</code></pre>", escape_html(content));
        }
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        let title_attr = if title.is_empty() {
            String::new()
        } else {
            format!(r#" title="{}""#, escape_html(title))
        };
        let _ = write!(
            out,
            r#"<img src="{}"{title_attr} alt="{}">"#,
            escape_html(src),
            escape_html(alt)
        );
    }

    fn mention(handle: &str, href: Option<&str>, out: &mut String) {
        let handle = escape_html(handle);
        match href {
            Some(href) => {
                let _ = write!(
                    out,
                    r#"<a class="mention" href="{}">@{handle}</a>"#,
                    escape_html(href)
                );
            }
            None => {
                let _ = write!(out, r#"<span class="mention">@{handle}</span>"#);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Alignment;

    #[test]
    fn test_code_block_with_language() {
        let mut out = String::new();
        HtmlBackend::code_block(Some("rust"), "fn main() {}", &mut out);
        assert_eq!(
            out,
            r#"<pre><code class="language-rust">fn main() {}</code></pre>"#
        );
    }

    #[test]
    fn test_code_block_without_language() {
        let mut out = String::new();
        HtmlBackend::code_block(None, "a < b", &mut out);
        assert_eq!(out, "<pre><code>a &lt; b</code></pre>");
    }

    #[test]
    fn test_blockquote() {
        let mut out = String::new();
        HtmlBackend::blockquote_start(&mut out);
        out.push_str("content");
        HtmlBackend::blockquote_end(&mut out);
        assert_eq!(out, "<blockquote>content</blockquote>");
    }

    #[test]
    fn test_image_with_title() {
        let mut out = String::new();
        HtmlBackend::image("image.png", "Alt text", "Image title", &mut out);
        assert_eq!(
            out,
            r#"<img src="image.png" title="Image title" alt="Alt text">"#
        );
    }

    #[test]
    fn test_task_list_marker() {
        let mut out = String::new();
        HtmlBackend::task_list_marker(true, &mut out);
        HtmlBackend::task_list_marker(false, &mut out);
        assert_eq!(
            out,
            r#"<input type="checkbox" checked disabled> <input type="checkbox" disabled> "#
        );
    }

    #[test]
    fn test_mention_link() {
        let mut out = String::new();
        HtmlBackend::mention("bob", Some("https://example.com/?u=bob&x=1"), &mut out);
        assert_eq!(
            out,
            r#"<a class="mention" href="https://example.com/?u=bob&amp;x=1">@bob</a>"#
        );
    }

    #[test]
    fn test_mention_without_template() {
        let mut out = String::new();
        HtmlBackend::mention("bob", None, &mut out);
        assert_eq!(out, r#"<span class="mention">@bob</span>"#);
    }

    #[test]
    fn test_block_break_is_compact() {
        let mut out = String::from("<p>a</p>");
        HtmlBackend::block_break(&mut out);
        assert_eq!(out, "<p>a</p>");
        assert_eq!(
            HtmlBackend::cell_alignment(Alignment::Center),
            r#" style="text-align:center""#
        );
    }
}
