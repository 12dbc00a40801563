//! Line-oriented text scanning.
//!
//! The scanner never allocates per character: it hands out byte offsets and
//! `&str` slices into the source, which is the unit tree spans are measured in.

/// Byte range of one source line, excluding its terminator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineSpan {
    /// Offset of the first byte of the line.
    pub start: usize,
    /// Offset one past the last content byte (terminator excluded).
    pub end: usize,
}

/// Line table for a document, used to map byte offsets to positions.
///
/// Recognises `\n`, `\r\n` and a bare `\r` as line terminators.
///
/// # Example
///
/// ```
/// use gfmx_engine::LineIndex;
///
/// let index = LineIndex::new("one\r\ntwo\nthree");
/// assert_eq!(index.len(), 3);
/// assert_eq!(index.line_col(5), (2, 1));
/// ```
#[derive(Clone, Debug)]
pub struct LineIndex {
    lines: Vec<LineSpan>,
}

impl LineIndex {
    /// Build the line table for `source`.
    #[must_use]
    pub fn new(source: &str) -> Self {
        let bytes = source.as_bytes();
        let mut lines = Vec::new();
        let mut start = 0;
        let mut ix = 0;

        while ix < bytes.len() {
            match bytes[ix] {
                b'\n' => {
                    lines.push(LineSpan { start, end: ix });
                    ix += 1;
                    start = ix;
                }
                b'\r' => {
                    lines.push(LineSpan { start, end: ix });
                    ix += if bytes.get(ix + 1) == Some(&b'\n') { 2 } else { 1 };
                    start = ix;
                }
                _ => ix += 1,
            }
        }

        if start < bytes.len() || lines.is_empty() {
            lines.push(LineSpan {
                start,
                end: bytes.len(),
            });
        }

        Self { lines }
    }

    /// Number of lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the table is empty (never true: an empty source has one empty line).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Iterate over line spans in source order.
    pub fn lines(&self) -> impl Iterator<Item = LineSpan> + '_ {
        self.lines.iter().copied()
    }

    /// Map a byte offset to a 1-based `(line, column)` pair.
    ///
    /// Columns count bytes. Offsets past the end clamp to the last line.
    #[must_use]
    pub fn line_col(&self, offset: usize) -> (usize, usize) {
        let line = self
            .lines
            .partition_point(|span| span.start <= offset)
            .saturating_sub(1);
        let start = self.lines.get(line).map_or(0, |span| span.start);
        (line + 1, offset - start + 1)
    }
}

/// Forward-only cursor over a string slice.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    /// Create a cursor positioned at the start of `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    /// Create a cursor positioned at byte offset `pos`.
    ///
    /// `pos` must lie on a char boundary.
    #[must_use]
    pub fn at(text: &'a str, pos: usize) -> Self {
        debug_assert!(text.is_char_boundary(pos));
        Self { text, pos }
    }

    /// Current byte offset.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// The whole text the cursor walks.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Unconsumed remainder.
    #[must_use]
    pub fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    /// Whether all input was consumed.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    /// Char under the cursor.
    #[must_use]
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Char `n` chars ahead of the cursor.
    #[must_use]
    pub fn peek_at(&self, n: usize) -> Option<char> {
        self.rest().chars().nth(n)
    }

    /// Char immediately before the cursor.
    #[must_use]
    pub fn prev(&self) -> Option<char> {
        self.text[..self.pos].chars().next_back()
    }

    /// Consume one char.
    pub fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Consume chars while `pred` holds and return the consumed slice.
    pub fn eat_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.text[start..self.pos]
    }

    /// Consume `literal` if the remainder starts with it.
    pub fn eat_str(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }
}

/// Chars allowed in a mention handle.
#[must_use]
pub fn is_handle_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Whether `offset` in `source` sits on a word boundary.
///
/// Start of input, whitespace and punctuation are boundaries. Letters and
/// digits of any script, `-` and `_` are not: they continue an identifier.
#[must_use]
pub fn is_word_boundary(source: &str, offset: usize) -> bool {
    match source[..offset].chars().next_back() {
        None => true,
        Some(c) => !(c.is_alphanumeric() || c == '-' || c == '_'),
    }
}

fn is_blank(c: char) -> bool {
    c == ' ' || c == '\t'
}

/// Whether `prefix` is exactly a list marker opening a list item's first line.
///
/// Accepts optional indentation and block quote markers, then a bullet
/// (`-`, `+`, `*`) or an ordered marker (1-9 digits and `.` or `)`), then at
/// least one space or tab. Anything else, including a line break, rejects.
#[must_use]
pub fn list_marker_prefix(prefix: &str) -> bool {
    let mut cursor = Cursor::new(prefix);
    loop {
        cursor.eat_while(is_blank);
        if !cursor.eat_str(">") {
            break;
        }
    }

    match cursor.peek() {
        Some('-' | '+' | '*') => {
            cursor.bump();
        }
        Some(c) if c.is_ascii_digit() => {
            let digits = cursor.eat_while(|c| c.is_ascii_digit());
            if digits.len() > 9 || !matches!(cursor.bump(), Some('.' | ')')) {
                return false;
            }
        }
        _ => return false,
    }

    let gap = cursor.eat_while(is_blank);
    !gap.is_empty() && cursor.is_eof()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_index_mixed_terminators() {
        let index = LineIndex::new("a\r\nbb\rccc\nd");
        let lines: Vec<_> = index.lines().collect();
        assert_eq!(
            lines,
            vec![
                LineSpan { start: 0, end: 1 },
                LineSpan { start: 3, end: 5 },
                LineSpan { start: 6, end: 9 },
                LineSpan { start: 10, end: 11 },
            ]
        );
    }

    #[test]
    fn test_line_index_empty_source() {
        let index = LineIndex::new("");
        assert_eq!(index.len(), 1);
        assert_eq!(index.line_col(0), (1, 1));
    }

    #[test]
    fn test_line_index_trailing_newline() {
        let index = LineIndex::new("x\n");
        assert_eq!(index.len(), 1);
        assert_eq!(index.line_col(0), (1, 1));
    }

    #[test]
    fn test_line_col() {
        let index = LineIndex::new("# Title\n\n- [ ] todo");
        assert_eq!(index.line_col(0), (1, 1));
        assert_eq!(index.line_col(8), (2, 1));
        assert_eq!(index.line_col(11), (3, 3));
    }

    #[test]
    fn test_cursor_eat_while() {
        let mut cursor = Cursor::new("bob-1_x said");
        assert_eq!(cursor.eat_while(is_handle_char), "bob-1_x");
        assert_eq!(cursor.peek(), Some(' '));
        assert_eq!(cursor.peek_at(1), Some('s'));
        assert_eq!(cursor.prev(), Some('x'));
        assert_eq!(cursor.rest(), " said");
    }

    #[test]
    fn test_cursor_multibyte() {
        let mut cursor = Cursor::new("é@");
        assert_eq!(cursor.bump(), Some('é'));
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.peek(), Some('@'));
    }

    #[test]
    fn test_cursor_eat_str() {
        let mut cursor = Cursor::new("[x] done");
        assert!(!cursor.eat_str("[ ]"));
        assert!(cursor.eat_str("[x]"));
        assert_eq!(cursor.pos(), 3);
    }

    #[test]
    fn test_word_boundary() {
        assert!(is_word_boundary("@bob", 0));
        assert!(is_word_boundary("hi @bob", 3));
        assert!(is_word_boundary("(@bob)", 1));
        assert!(is_word_boundary("line\n@bob", 5));
        assert!(!is_word_boundary("email@x", 5));
        assert!(!is_word_boundary("a_@b", 2));
        assert!(!is_word_boundary("été@b", 5));
    }

    #[test]
    fn test_list_marker_prefix_bullets() {
        assert!(list_marker_prefix("- "));
        assert!(list_marker_prefix("* "));
        assert!(list_marker_prefix("+\t"));
        assert!(list_marker_prefix("  - "));
        assert!(list_marker_prefix("> - "));
    }

    #[test]
    fn test_list_marker_prefix_ordered() {
        assert!(list_marker_prefix("1. "));
        assert!(list_marker_prefix("42) "));
        assert!(!list_marker_prefix("1234567890. "));
        assert!(!list_marker_prefix("1: "));
    }

    #[test]
    fn test_list_marker_prefix_rejects() {
        assert!(!list_marker_prefix(""));
        assert!(!list_marker_prefix("-"));
        assert!(!list_marker_prefix("foo "));
        assert!(!list_marker_prefix("-\n  "));
        assert!(!list_marker_prefix("- foo "));
    }
}
