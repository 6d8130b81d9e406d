//! Byte-by-byte cursor over ASCII Newick text.
//!
//! [ByteParser] borrows its input and offers peek, consume and skip operations,
//! plus quote-aware label parsing. Gene-tree files are read line by line, so
//! each line gets its own short-lived parser.

use crate::parser::parsing_error::ParsingError;

// =#========================================================================#=
// BYTE PARSER
// =#========================================================================#=
/// A byte-by-byte parser over a borrowed slice of ASCII text.
///
/// # Features
/// - Whitespace and `[...]` comment skipping
/// - Quote-aware label parsing (single quotes, `''` as escaped quote)
/// - Context extraction for error reporting
///
/// # Example
/// ```
/// use phylodisc::parser::byte_parser::ByteParser;
///
/// let mut parser = ByteParser::for_str("  [comment] (A,B);");
/// parser.skip_comment_and_whitespace().unwrap();
/// assert_eq!(parser.peek(), Some(b'('));
/// ```
pub struct ByteParser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl<'a> ByteParser<'a> {
    /// Creates a new [ByteParser] over the bytes of a string.
    pub fn for_str(input: &'a str) -> Self {
        Self::for_bytes(input.as_bytes())
    }

    /// Creates a new [ByteParser] over a byte slice.
    pub fn for_bytes(input: &'a [u8]) -> Self {
        Self { input, pos: 0 }
    }

    /// Peeks at the current byte without consuming it.
    ///
    /// # Returns
    /// * `Some(u8)` - The current byte if available
    /// * `None` - If at end of data (EOF)
    #[inline(always)]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// Gets the current byte and advances the position (consumes it).
    #[inline(always)]
    pub fn next_byte(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.pos += 1;
        Some(byte)
    }

    /// Returns whether the end of data (EOF) has been reached.
    pub fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Returns the current byte offset in the input.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Returns `true` if the current byte equals `ch`.
    #[inline]
    pub fn peek_is(&self, ch: u8) -> bool {
        self.peek() == Some(ch)
    }

    /// Consumes the current byte if it equals `ch`.
    ///
    /// # Returns
    /// `true` if the byte was matched and consumed, `false` otherwise
    pub fn consume_if(&mut self, ch: u8) -> bool {
        if self.peek_is(ch) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    /// Skips (consumes) all consecutive whitespace characters.
    pub fn skip_whitespace(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() {
                self.pos += 1;
            } else {
                break;
            }
        }
    }

    /// Skips (consumes) a `[...]` comment if present.
    ///
    /// # Returns
    /// * `Ok(true)` - A comment was found and consumed
    /// * `Ok(false)` - No comment at current position
    /// * `Err(ParsingError)` - Comment was opened but never closed
    pub fn skip_comment(&mut self) -> Result<bool, ParsingError> {
        if !self.consume_if(b'[') {
            return Ok(false);
        }

        while let Some(b) = self.next_byte() {
            if b == b']' {
                return Ok(true);
            }
        }

        Err(ParsingError::unclosed_comment(self))
    }

    /// Skips (consumes) all consecutive whitespace and comments.
    pub fn skip_comment_and_whitespace(&mut self) -> Result<(), ParsingError> {
        self.skip_whitespace();
        while self.skip_comment()? {
            self.skip_whitespace();
        }
        Ok(())
    }

    /// Returns a string from up to `k` bytes from the current position for error context.
    ///
    /// Invalid UTF-8 sequences are replaced with the Unicode replacement character.
    pub fn context(&self, k: usize) -> String {
        let start = self.pos.min(self.input.len());
        let end = (start + k).min(self.input.len());
        String::from_utf8_lossy(&self.input[start..end]).into_owned()
    }

    /// Parses a label (quoted or unquoted) with the given delimiter set.
    ///
    /// Leading whitespace and comments are skipped. An empty string is
    /// returned if a delimiter follows immediately.
    pub fn parse_label(&mut self, delimiters: &[u8]) -> Result<String, ParsingError> {
        self.skip_comment_and_whitespace()?;

        if self.peek_is(b'\'') {
            self.parse_quoted_label()
        } else {
            Ok(self.parse_unquoted_label(delimiters))
        }
    }

    /// Parses a label enclosed in single quotes, where a doubled quote
    /// (`'Wilson''s'`) stands for a literal one.
    ///
    /// Assumes the opening quote has not been consumed yet. The returned label
    /// has the enclosing quotes removed.
    pub fn parse_quoted_label(&mut self) -> Result<String, ParsingError> {
        self.next_byte(); // consume opening '

        let mut label = Vec::new();
        while let Some(b) = self.next_byte() {
            if b != b'\'' {
                label.push(b);
            } else if self.consume_if(b'\'') {
                label.push(b'\'');
            } else {
                return Ok(String::from_utf8_lossy(&label).into_owned());
            }
        }

        Err(ParsingError::unclosed_quote(self))
    }

    /// Parses an unquoted label until any of the given delimiters (or EOF).
    pub fn parse_unquoted_label(&mut self, delimiters: &[u8]) -> String {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if delimiters.contains(&b) {
                break;
            }
            self.pos += 1;
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }

    /// Consumes the longest run of bytes that may form a floating point
    /// number (digits, `.`, sign, exponent marker) and returns it.
    pub fn parse_number_token(&mut self) -> String {
        let start = self.pos;
        while let Some(b) = self.peek() {
            if b.is_ascii_digit() || matches!(b, b'.' | b'-' | b'+' | b'e' | b'E') {
                self.pos += 1;
            } else {
                break;
            }
        }
        String::from_utf8_lossy(&self.input[start..self.pos]).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_nested_whitespace_and_comments() {
        let mut parser = ByteParser::for_str(" \t[a] \n[b]x");
        parser.skip_comment_and_whitespace().unwrap();
        assert_eq!(parser.peek(), Some(b'x'));
    }

    #[test]
    fn unclosed_comment_is_an_error() {
        let mut parser = ByteParser::for_str("[never closed");
        assert!(parser.skip_comment().is_err());
    }

    #[test]
    fn quoted_label_unescapes_doubled_quotes() {
        let mut parser = ByteParser::for_str("'Baillon''s Crake':1");
        let label = parser.parse_label(b",:;)").unwrap();
        assert_eq!(label, "Baillon's Crake");
        assert_eq!(parser.peek(), Some(b':'));
    }

    #[test]
    fn unquoted_label_stops_at_delimiter() {
        let mut parser = ByteParser::for_str("Apteryx_haastii,B");
        assert_eq!(parser.parse_unquoted_label(b","), "Apteryx_haastii");
        assert!(parser.consume_if(b','));
    }

    #[test]
    fn number_token_accepts_scientific_notation() {
        let mut parser = ByteParser::for_str("1.5e-10)");
        assert_eq!(parser.parse_number_token(), "1.5e-10");
        assert_eq!(parser.peek(), Some(b')'));
    }
}
