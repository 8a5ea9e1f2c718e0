//! Read-only cursor over UTF-8 source text.
//!
//! The tokenizer never touches the source directly; everything goes through
//! this window. Byte lookahead is the fast path, with on-demand decoding of
//! a full scalar value for the rare identifier or whitespace characters
//! outside ASCII. The window never allocates.

/// Returned by byte peeks past the end of the text.
pub const EOF_BYTE: u8 = 0;

#[derive(Clone)]
pub struct TextWindow<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> TextWindow<'a> {
    pub fn new(text: &'a str) -> Self {
        TextWindow { text, pos: 0 }
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn has_more_content(&self) -> bool {
        self.pos < self.text.len()
    }

    /// Byte at the cursor, `EOF_BYTE` at end of text.
    #[inline]
    pub fn peek(&self) -> u8 {
        self.peek_ahead(0)
    }

    /// Byte `n` past the cursor, `EOF_BYTE` past end of text.
    #[inline]
    pub fn peek_ahead(&self, n: usize) -> u8 {
        self.text.as_bytes().get(self.pos + n).copied().unwrap_or(EOF_BYTE)
    }

    /// Decodes the scalar value at the cursor. Returns the replacement
    /// character with width 1 for bytes that are not valid UTF-8 here
    /// (possible when the cursor sits inside a multi-byte sequence).
    pub fn peek_char32(&self) -> (char, usize) {
        match self.try_peek_char32() {
            Some(c) => (c, c.len_utf8()),
            None => ('\u{FFFD}', 1),
        }
    }

    /// Decodes the scalar value at the cursor, or `None` at end of text or
    /// on a non-boundary position.
    pub fn try_peek_char32(&self) -> Option<char> {
        self.text.get(self.pos..)?.chars().next()
    }

    #[inline]
    pub fn advance(&mut self, n: usize) {
        debug_assert!(self.pos + n <= self.text.len());
        self.pos += n;
    }

    /// Advances past `b` if it is the next byte.
    #[inline]
    pub fn try_advance(&mut self, b: u8) -> bool {
        if self.peek() == b {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    pub fn seek(&mut self, pos: usize) {
        debug_assert!(pos <= self.text.len());
        self.pos = pos;
    }

    /// Source slice between two cursor positions.
    pub fn slice(&self, start: usize, end: usize) -> &'a str {
        &self.text[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_lookahead_and_eof() {
        let mut w = TextWindow::new("ab");
        assert_eq!(w.peek(), b'a');
        assert_eq!(w.peek_ahead(1), b'b');
        assert_eq!(w.peek_ahead(2), EOF_BYTE);
        w.advance(2);
        assert!(!w.has_more_content());
        assert_eq!(w.peek(), EOF_BYTE);
    }

    #[test]
    fn char32_decoding() {
        let w = TextWindow::new("λx");
        let (c, width) = w.peek_char32();
        assert_eq!(c, 'λ');
        assert_eq!(width, 2);
    }

    #[test]
    fn char32_inside_sequence_is_replacement() {
        let mut w = TextWindow::new("λ");
        w.advance(1);
        let (c, width) = w.peek_char32();
        assert_eq!(c, '\u{FFFD}');
        assert_eq!(width, 1);
    }

    #[test]
    fn try_advance_only_on_match() {
        let mut w = TextWindow::new("=>");
        assert!(w.try_advance(b'='));
        assert!(!w.try_advance(b'='));
        assert!(w.try_advance(b'>'));
    }
}
