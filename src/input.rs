//! Input buffer: the input string and its cursor.
//!
//! All regex matching in the crate goes through this module so the
//! anchoring discipline lives in one place: a pattern matches only when the
//! match begins exactly at the cursor. `regex` has no anchored-at-offset
//! entry point, but its leftmost-first search guarantees that whenever a
//! match starting at the cursor exists, `captures_at`/`find_at` return that
//! match first, so checking the match start is equivalent to anchoring.
//!
//! The cursor is a byte offset and always sits on a character boundary;
//! reported columns are character counts, which is what caret alignment
//! needs.

use regex::Regex;

/// A resolved cursor position: 1-based line, 0-based character column, and
/// the full text of the line the position sits on (bounded by the nearest
/// line terminators on either side).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub line: usize,
    pub column: usize,
    pub line_text: String,
}

#[derive(Debug)]
pub(crate) struct InputBuffer {
    text: String,
    cursor: usize,
}

impl InputBuffer {
    pub(crate) fn new(text: String) -> Self {
        InputBuffer { text, cursor: 0 }
    }

    pub(crate) fn position(&self) -> usize {
        self.cursor
    }

    /// Restore a cursor value previously returned by `position()`.
    pub(crate) fn set_position(&mut self, pos: usize) {
        debug_assert!(pos <= self.text.len());
        self.cursor = pos;
    }

    pub(crate) fn at_end_of_text(&self) -> bool {
        self.cursor >= self.text.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.text.len()
    }

    /// Append more input without disturbing the cursor. Only the skipper
    /// calls this: a whitespace boundary is the one append point that
    /// cannot split a token.
    pub(crate) fn append(&mut self, more: &str) {
        self.text.push_str(more);
    }

    /// Try `re` anchored at the cursor; on success consume the match and
    /// return the matched text plus any capture groups in input order.
    pub(crate) fn match_at(&mut self, re: &Regex) -> Option<(String, Vec<Option<String>>)> {
        let caps = re.captures_at(&self.text, self.cursor)?;
        let whole = caps.get(0).expect("group 0 always participates");
        if whole.start() != self.cursor {
            return None;
        }
        let groups = (1..caps.len())
            .map(|i| caps.get(i).map(|m| m.as_str().to_string()))
            .collect();
        self.cursor = whole.end();
        Some((whole.as_str().to_string(), groups))
    }

    /// The same test as `match_at`, without consuming.
    pub(crate) fn peek_at(&self, re: &Regex) -> bool {
        re.find_at(&self.text, self.cursor)
            .map_or(false, |m| m.start() == self.cursor)
    }

    /// Start offset of the first match of `re` at or after the cursor
    /// (not anchored).
    pub(crate) fn find_from(&self, re: &Regex) -> Option<usize> {
        re.find_at(&self.text, self.cursor).map(|m| m.start())
    }

    /// Consume and return the text between the cursor and `stop`.
    pub(crate) fn take_to(&mut self, stop: usize) -> String {
        debug_assert!(stop >= self.cursor && stop <= self.text.len());
        let taken = self.text[self.cursor..stop].to_string();
        self.cursor = stop;
        taken
    }

    pub(crate) fn location(&self) -> Location {
        self.location_at(self.cursor)
    }

    /// Line, column and line text for an arbitrary offset.
    pub(crate) fn location_at(&self, pos: usize) -> Location {
        let pos = pos.min(self.text.len());
        let before = &self.text[..pos];
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = self.text[line_start..pos].chars().count();
        let line_end = self.text[pos..]
            .find('\n')
            .map_or(self.text.len(), |i| pos + i);
        let full_line = &self.text[line_start..line_end];
        let line_text = full_line.strip_suffix('\r').unwrap_or(full_line).to_string();
        Location {
            line,
            column,
            line_text,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> InputBuffer {
        InputBuffer::new(text.to_string())
    }

    #[test]
    fn match_at_is_anchored() {
        let re = Regex::new("world").unwrap();
        let mut input = buffer("hello world");
        assert!(input.match_at(&re).is_none());
        assert_eq!(input.position(), 0);
        input.set_position(6);
        let (text, groups) = input.match_at(&re).unwrap();
        assert_eq!(text, "world");
        assert!(groups.is_empty());
        assert_eq!(input.position(), 11);
    }

    #[test]
    fn match_at_returns_captures_in_order() {
        let re = Regex::new("(a+)(b+)?(c+)").unwrap();
        let mut input = buffer("aacc");
        let (text, groups) = input.match_at(&re).unwrap();
        assert_eq!(text, "aacc");
        assert_eq!(
            groups,
            vec![Some("aa".to_string()), None, Some("cc".to_string())]
        );
    }

    #[test]
    fn peek_at_does_not_consume() {
        let re = Regex::new("hello").unwrap();
        let input = buffer("hello");
        assert!(input.peek_at(&re));
        assert_eq!(input.position(), 0);
    }

    #[test]
    fn location_on_single_line() {
        let input = buffer("hello world");
        assert_eq!(
            input.location_at(0),
            Location {
                line: 1,
                column: 0,
                line_text: "hello world".to_string()
            }
        );
        assert_eq!(input.location_at(5).column, 5);
        assert_eq!(input.location_at(11).column, 11);
        assert_eq!(input.location_at(11).line, 1);
    }

    #[test]
    fn location_across_lines() {
        let input = buffer("hello\nworld");
        let at_newline = input.location_at(5);
        assert_eq!((at_newline.line, at_newline.column), (1, 5));
        assert_eq!(at_newline.line_text, "hello");
        let at_end = input.location_at(11);
        assert_eq!((at_end.line, at_end.column), (2, 5));
        assert_eq!(at_end.line_text, "world");
    }

    #[test]
    fn location_strips_carriage_return() {
        let input = buffer("one\r\ntwo");
        let loc = input.location_at(1);
        assert_eq!(loc.line_text, "one");
        let loc = input.location_at(6);
        assert_eq!((loc.line, loc.line_text.as_str()), (2, "two"));
    }

    #[test]
    fn column_counts_characters_not_bytes() {
        let input = buffer("αβγ x");
        let loc = input.location_at("αβγ ".len());
        assert_eq!(loc.column, 4);
    }

    #[test]
    fn append_leaves_cursor_alone() {
        let mut input = buffer("ab");
        input.set_position(2);
        input.append("cd");
        assert_eq!(input.position(), 2);
        assert!(!input.at_end_of_text());
    }
}
