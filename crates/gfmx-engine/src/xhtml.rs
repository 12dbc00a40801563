//! XHTML backend compatible with cmark-gfm's HTML output.
//!
//! Void elements are self-closed and every block ends on its own line, so
//! output can be diffed against other GFM renderers.

use std::fmt::Write;

use crate::backend::RenderBackend;
use crate::node::Alignment;
use crate::util::escape_html;

/// XHTML render backend.
pub struct XhtmlBackend;

impl RenderBackend for XhtmlBackend {
    fn code_block(lang: Option<&str>, content: &str, out: &mut String) {
        match lang {
            Some(lang) => {
                let _ = write!(
                    out,
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    escape_html(lang),
                    escape_html(content)
                );
            }
            None => {
                let _ = write!(out, "<pre><code>{}</code></pre>", escape_html(content));
            }
        }
    }

    fn image(src: &str, alt: &str, title: &str, out: &mut String) {
        let _ = write!(
            out,
            r#"<img src="{}" alt="{}""#,
            escape_html(src),
            escape_html(alt)
        );
        if !title.is_empty() {
            let _ = write!(out, r#" title="{}""#, escape_html(title));
        }
        out.push_str(" />");
    }

    fn hard_break(out: &mut String) {
        out.push_str("<br />\n");
    }

    fn horizontal_rule(out: &mut String) {
        out.push_str("<hr />");
    }

    fn task_list_marker(checked: bool, out: &mut String) {
        if checked {
            out.push_str(r#"<input type="checkbox" checked="" disabled="" /> "#);
        } else {
            out.push_str(r#"<input type="checkbox" disabled="" /> "#);
        }
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

    fn cell_alignment(alignment: Alignment) -> &'static str {
        match alignment {
            Alignment::Left => r#" align="left""#,
            Alignment::Center => r#" align="center""#,
            Alignment::Right => r#" align="right""#,
            Alignment::None => "",
        }
    }

    fn block_break(out: &mut String) {
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_void_elements_self_close() {
        let mut out = String::new();
        XhtmlBackend::hard_break(&mut out);
        XhtmlBackend::horizontal_rule(&mut out);
        assert_eq!(out, "<br />\n<hr />");
    }

    #[test]
    fn test_image() {
        let mut out = String::new();
        XhtmlBackend::image("a.png", "A", "", &mut out);
        assert_eq!(out, r#"<img src="a.png" alt="A" />"#);

        out.clear();
        XhtmlBackend::image("a.png", "A", "T", &mut out);
        assert_eq!(out, r#"<img src="a.png" alt="A" title="T" />"#);
    }

    #[test]
    fn test_task_list_marker() {
        let mut out = String::new();
        XhtmlBackend::task_list_marker(true, &mut out);
        assert_eq!(out, r#"<input type="checkbox" checked="" disabled="" /> "#);
    }

    #[test]
    fn test_block_break_only_once() {
        let mut out = String::new();
        XhtmlBackend::block_break(&mut out);
        assert!(out.is_empty());

        out.push_str("<p>a</p>");
        XhtmlBackend::block_break(&mut out);
        XhtmlBackend::block_break(&mut out);
        assert_eq!(out, "<p>a</p>\n");
    }

    #[test]
    fn test_cell_alignment() {
        assert_eq!(XhtmlBackend::cell_alignment(Alignment::Right), r#" align="right""#);
        assert_eq!(XhtmlBackend::cell_alignment(Alignment::None), "");
    }
}
