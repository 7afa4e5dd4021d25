//! Delimiter scanning using memchr
//!
//! The scanner is a byte cursor over UTF-8 text. Every delimiter it stops at is
//! ASCII, so the slices it hands out always fall on character boundaries.

use memchr::{memchr, memchr2, memchr_iter, memmem};

use super::error::Position;

/// Scanner for markup delimiter detection
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    /// Create a new scanner for the given input
    #[inline]
    pub fn new(input: &'a str) -> Self {
        Scanner { input, pos: 0 }
    }

    #[inline]
    fn bytes(&self) -> &'a [u8] {
        self.input.as_bytes()
    }

    /// Get the current position
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Rewind or fast-forward to a previously observed position
    #[inline]
    pub fn set_position(&mut self, pos: usize) {
        debug_assert!(self.input.is_char_boundary(pos));
        self.pos = pos;
    }

    /// Get a slice from start to end positions
    #[inline]
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.input[start..end]
    }

    /// Peek at current byte without advancing
    #[inline]
    pub fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    /// Advance by n bytes
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.pos += n;
    }

    /// Skip whitespace characters (space, tab, newline, carriage return)
    #[inline]
    pub fn skip_whitespace(&mut self) {
        let bytes = self.bytes();
        while self.pos < bytes.len() && is_whitespace(bytes[self.pos]) {
            self.pos += 1;
        }
    }

    /// Check if input starts with a byte sequence at current position
    #[inline]
    pub fn starts_with(&self, needle: &[u8]) -> bool {
        self.bytes()[self.pos..].starts_with(needle)
    }

    /// Find next occurrence of a specific byte
    #[inline]
    pub fn find_byte(&self, byte: u8) -> Option<usize> {
        memchr(byte, &self.bytes()[self.pos..]).map(|i| self.pos + i)
    }

    /// Find next occurrence of a byte sequence
    #[inline]
    pub fn find_sequence(&self, needle: &[u8]) -> Option<usize> {
        memmem::find(&self.bytes()[self.pos..], needle).map(|i| self.pos + i)
    }

    /// Read text content up to the next '<' (or end of input)
    pub fn read_text(&mut self) -> &'a str {
        let start = self.pos;
        let end = self.find_byte(b'<').unwrap_or(self.input.len());
        self.pos = end;
        &self.input[start..end]
    }

    /// Read a quoted value body up to the next '"' or '<' (or end of input)
    pub fn read_quoted(&mut self) -> &'a str {
        let start = self.pos;
        let end = memchr2(b'"', b'<', &self.bytes()[start..])
            .map(|i| start + i)
            .unwrap_or(self.input.len());
        self.pos = end;
        &self.input[start..end]
    }

    /// Read a name: any run of bytes that are neither structural nor whitespace
    pub fn read_name(&mut self) -> &'a str {
        let start = self.pos;
        let bytes = self.bytes();
        while self.pos < bytes.len() && is_name_byte(bytes[self.pos]) {
            self.pos += 1;
        }
        &self.input[start..self.pos]
    }

    /// Resolve a byte offset to a 1-based line and column (columns count characters)
    pub fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.input.len());
        let before = &self.bytes()[..offset];
        let line = memchr_iter(b'\n', before).count() + 1;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map(|i| i + 1)
            .unwrap_or(0);
        let column = self.input[line_start..offset].chars().count() + 1;
        Position { line, column }
    }
}

/// Check if byte is whitespace
#[inline]
pub fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

/// Structural bytes never appear inside a name
#[inline]
pub fn is_structural(b: u8) -> bool {
    matches!(b, b'<' | b'>' | b'"' | b'/' | b'=')
}

#[inline]
fn is_name_byte(b: u8) -> bool {
    !is_structural(b) && !is_whitespace(b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_text_stops_at_tag() {
        let mut scanner = Scanner::new("hello <world>");
        assert_eq!(scanner.read_text(), "hello ");
        assert_eq!(scanner.peek(), Some(b'<'));
    }

    #[test]
    fn test_read_name() {
        let mut scanner = Scanner::new("element-name>");
        assert_eq!(scanner.read_name(), "element-name");
        assert_eq!(scanner.position(), 12);
    }

    #[test]
    fn test_read_name_unicode() {
        let mut scanner = Scanner::new("bücher id=\"1\"");
        assert_eq!(scanner.read_name(), "bücher");
        assert_eq!(scanner.peek(), Some(b' '));
    }

    #[test]
    fn test_read_quoted() {
        let mut scanner = Scanner::new("a b/c=d\">");
        assert_eq!(scanner.read_quoted(), "a b/c=d");
        assert_eq!(scanner.peek(), Some(b'"'));
    }

    #[test]
    fn test_skip_whitespace() {
        let mut scanner = Scanner::new("  \t\n hello");
        scanner.skip_whitespace();
        assert_eq!(scanner.position(), 5);
    }

    #[test]
    fn test_position_of() {
        let scanner = Scanner::new("<a>\n  <b>\n</a>");
        assert_eq!(scanner.position_of(0), Position { line: 1, column: 1 });
        assert_eq!(scanner.position_of(6), Position { line: 2, column: 3 });
        assert_eq!(scanner.position_of(10), Position { line: 3, column: 1 });
    }

    #[test]
    fn test_find_sequence() {
        let scanner = Scanner::new("<!DOCTYPE x [ <!ENTITY a \"b\"> ]>");
        assert_eq!(scanner.find_sequence(b"]>"), Some(30));
    }
}
