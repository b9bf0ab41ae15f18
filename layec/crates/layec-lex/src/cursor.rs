//! The character cursor.
//!
//! The cursor turns raw source bytes into a canonical stream of code
//! points. Canonicalization happens at this level, not in the token
//! reader:
//!
//! 1. `\n\r` is a single `\n`.
//! 2. `\r` is a `\n`, absorbing a following `\n`.
//! 3. Under [`Mode::C`], a backslash followed by a newline (either flavor,
//!    plus its paired other half) is a single space.
//!
//! Strides of folded sequences are summed, so byte positions always point
//! into the real source text. Bytes that fail to decode surface as
//! U+FFFD with a flag set rather than ending the stream; the token reader
//! decides what to tell the user.

use std::sync::Arc;

use layec_util::Source;

use crate::mode::Mode;
use crate::utf8::{self, DecodeError};

/// Converts a character to the code point value the cursor works in.
#[inline]
pub(crate) const fn cp(c: char) -> u32 {
    c as u32
}

/// One canonicalized code point and the bytes it covers.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Decoded {
    cp: u32,
    stride: usize,
    malformed: bool,
}

/// A cursor over the text of one source.
///
/// The cursor owns a handle to its source and maintains the byte position,
/// the canonicalized current code point and its stride, the current line
/// number, and the start-of-line flag. It also tracks the file name and
/// line number *presented* to the program, which a `#line` directive may
/// override without moving the cursor.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use layec_lex::{Cursor, Mode};
/// use layec_util::Source;
///
/// let source = Arc::new(Source::new("demo.c", "ab", false));
/// let mut cursor = Cursor::new(source, Mode::C);
/// assert_eq!(cursor.current(), u32::from('a'));
/// cursor.advance(Mode::C);
/// assert_eq!(cursor.current(), u32::from('b'));
/// cursor.advance(Mode::C);
/// assert!(cursor.is_at_end());
/// ```
pub struct Cursor {
    source: Arc<Source>,

    /// Byte position of the current code point.
    position: usize,
    /// Byte stride of the current (canonicalized) code point. Zero only at
    /// the end of the text.
    stride: usize,
    /// The current code point. Zero at the end of the text.
    current: u32,
    /// True if the current code point stands in for bytes that failed to
    /// decode.
    current_malformed: bool,

    /// Current line number, 1-based.
    line_number: u32,
    /// True for the first character of a line.
    at_start_of_line: bool,

    /// File name presented to the program instead of the source name.
    presented_file: Option<String>,
}

impl Cursor {
    /// Creates a cursor at the start of `source`, folding under `mode`.
    pub fn new(source: Arc<Source>, mode: Mode) -> Self {
        let mut cursor = Self {
            source,
            position: 0,
            stride: 0,
            current: 0,
            current_malformed: false,
            line_number: 1,
            at_start_of_line: true,
            presented_file: None,
        };
        cursor.refold(mode);
        cursor
    }

    /// One decode step at `offset`, with malformed-byte recovery. Returns
    /// `None` at or past the end of the text.
    fn decode_raw(&self, offset: usize) -> Option<Decoded> {
        let text = self.source.text();
        match utf8::decode(text, offset) {
            Ok((cp, stride)) => Some(Decoded {
                cp,
                stride,
                malformed: false,
            }),
            Err(DecodeError::OutOfRange) => None,
            Err(DecodeError::EndOfData) => {
                if offset >= text.len() {
                    None
                } else {
                    // a multi-byte sequence cut short by the end of the
                    // text; consume the tail as one malformed unit.
                    Some(Decoded {
                        cp: 0xFFFD,
                        stride: text.len() - offset,
                        malformed: true,
                    })
                }
            }
            Err(_) => Some(Decoded {
                cp: 0xFFFD,
                stride: 1,
                malformed: true,
            }),
        }
    }

    /// Decodes the canonicalized code point at `offset`.
    fn peek_raw(&self, offset: usize, mode: Mode) -> Option<Decoded> {
        let raw = self.decode_raw(offset)?;
        if raw.malformed {
            return Some(raw);
        }

        let mut current = raw.cp;
        let mut stride = raw.stride;
        let mut next_offset = offset + stride;

        // The sequence '\n\r' is handled as a single '\n'.
        if current == cp('\n') {
            if let Some(ahead) = self.decode_raw(next_offset) {
                if !ahead.malformed && ahead.cp == cp('\r') {
                    stride += ahead.stride;
                    next_offset += ahead.stride;
                }
            }
        }

        // The character '\r' and the sequence '\r\n' are handled as a
        // single '\n'.
        if current == cp('\r') {
            current = cp('\n');
            if let Some(ahead) = self.decode_raw(next_offset) {
                if !ahead.malformed && ahead.cp == cp('\n') {
                    stride += ahead.stride;
                    next_offset += ahead.stride;
                }
            }
        }

        // In C, a backslash at the end of a line splices the line; the
        // spliced sequence is handled as a single space. Both newline
        // orders are accepted, with the paired other half absorbed.
        if mode.contains(Mode::C) && current == cp('\\') {
            if let Some(ahead) = self.decode_raw(next_offset) {
                if !ahead.malformed && (ahead.cp == cp('\r') || ahead.cp == cp('\n')) {
                    current = cp(' ');
                    stride += ahead.stride;
                    next_offset += ahead.stride;

                    let other = if ahead.cp == cp('\r') { cp('\n') } else { cp('\r') };
                    if let Some(paired) = self.decode_raw(next_offset) {
                        if !paired.malformed && paired.cp == other {
                            stride += paired.stride;
                        }
                    }
                }
            }
        }

        Some(Decoded {
            cp: current,
            stride,
            malformed: false,
        })
    }

    /// Re-decodes the current code point under `mode`.
    ///
    /// Called after every advance, and whenever the mode set changes in a
    /// way that affects folding.
    pub(crate) fn refold(&mut self, mode: Mode) {
        match self.peek_raw(self.position, mode) {
            Some(decoded) => {
                self.current = decoded.cp;
                self.stride = decoded.stride;
                self.current_malformed = decoded.malformed;
            }
            None => {
                self.current = 0;
                self.stride = 0;
                self.current_malformed = false;
            }
        }
    }

    /// Returns the current code point, zero at the end of the text.
    #[inline]
    pub fn current(&self) -> u32 {
        self.current
    }

    /// Returns true if the current code point stands in for undecodable
    /// bytes.
    #[inline]
    pub fn current_malformed(&self) -> bool {
        self.current_malformed
    }

    /// Returns the byte position of the current code point.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the byte stride of the current code point.
    #[inline]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns true if the cursor is past the last code point.
    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Returns the current line number, 1-based.
    #[inline]
    pub fn line_number(&self) -> u32 {
        self.line_number
    }

    /// Sets the line number presented to the program.
    pub fn set_line_number(&mut self, line_number: u32) {
        self.line_number = line_number;
    }

    /// Returns true if the current code point is the first of its line.
    #[inline]
    pub fn at_start_of_line(&self) -> bool {
        self.at_start_of_line
    }

    /// Clears the start-of-line flag. The token reader calls this once it
    /// has recorded the flag into a token.
    pub(crate) fn reset_start_of_line(&mut self) {
        self.at_start_of_line = false;
    }

    /// Returns the file name presented to the program, the source name
    /// unless overridden.
    pub fn file_name(&self) -> &str {
        self.presented_file
            .as_deref()
            .unwrap_or_else(|| self.source.name())
    }

    /// Overrides the presented file name, or restores the source name.
    pub fn set_presented_file(&mut self, file: Option<String>) {
        self.presented_file = file;
    }

    /// Returns the source this cursor reads.
    pub fn source(&self) -> &Arc<Source> {
        &self.source
    }

    /// Moves to the next code point.
    ///
    /// Traversing a canonical newline bumps the line number and raises the
    /// start-of-line flag. At the end of the text this does nothing.
    pub fn advance(&mut self, mode: Mode) {
        // the end of the text is the only zero-stride state.
        if self.stride == 0 {
            self.current = 0;
            return;
        }

        if self.current == cp('\n') {
            self.line_number += 1;
            self.at_start_of_line = true;
        }

        self.position += self.stride;
        self.refold(mode);
    }

    /// Returns the code point `ahead` positions past the current one,
    /// without moving the cursor. `peek(0)` is the current code point;
    /// past the end the result is zero.
    pub fn peek(&self, ahead: usize, mode: Mode) -> u32 {
        if ahead == 0 {
            return self.current;
        }

        let mut offset = self.position + self.stride;
        let mut result = 0;
        for _ in 0..ahead {
            match self.peek_raw(offset, mode) {
                Some(decoded) => {
                    result = decoded.cp;
                    offset += decoded.stride;
                }
                None => return 0,
            }
        }
        result
    }

    /// Consumes the current code point if it equals `expected`.
    pub fn match_char(&mut self, expected: char, mode: Mode) -> bool {
        if self.current == cp(expected) && !self.is_at_end() {
            self.advance(mode);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor_over(text: &str, mode: Mode) -> Cursor {
        Cursor::new(Arc::new(Source::new("test", text, false)), mode)
    }

    fn drain(text: &str, mode: Mode) -> Vec<u32> {
        let mut cursor = cursor_over(text, mode);
        let mut out = Vec::new();
        while !cursor.is_at_end() {
            out.push(cursor.current());
            cursor.advance(mode);
        }
        out
    }

    fn codes(text: &str) -> Vec<u32> {
        text.chars().map(u32::from).collect()
    }

    #[test]
    fn test_empty_source() {
        let cursor = cursor_over("", Mode::C);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current(), 0);
        assert_eq!(cursor.stride(), 0);
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(drain("abc", Mode::C), codes("abc"));
    }

    #[test]
    fn test_utf8_text() {
        assert_eq!(drain("a\u{03B1}b", Mode::LAYE), codes("a\u{03B1}b"));
    }

    #[test]
    fn test_advance_past_end_is_a_no_op() {
        let mut cursor = cursor_over("a", Mode::C);
        cursor.advance(Mode::C);
        assert!(cursor.is_at_end());
        cursor.advance(Mode::C);
        cursor.advance(Mode::C);
        assert!(cursor.is_at_end());
        assert_eq!(cursor.current(), 0);
    }

    #[test]
    fn test_crlf_folds_to_one_newline() {
        assert_eq!(drain("a\r\nb", Mode::C), codes("a\nb"));
    }

    #[test]
    fn test_lfcr_folds_to_one_newline() {
        assert_eq!(drain("a\n\rb", Mode::C), codes("a\nb"));
    }

    #[test]
    fn test_lone_cr_becomes_newline() {
        assert_eq!(drain("a\rb", Mode::C), codes("a\nb"));
    }

    #[test]
    fn test_two_newlines_stay_two() {
        assert_eq!(drain("a\n\nb", Mode::C), codes("a\n\nb"));
        assert_eq!(drain("a\r\n\r\nb", Mode::C), codes("a\n\nb"));
    }

    #[test]
    fn test_line_continuation_folds_to_space_in_c() {
        assert_eq!(drain("a\\\nb", Mode::C), codes("a b"));
        assert_eq!(drain("a\\\rb", Mode::C), codes("a b"));
        assert_eq!(drain("a\\\r\nb", Mode::C), codes("a b"));
        assert_eq!(drain("a\\\n\rb", Mode::C), codes("a b"));
    }

    #[test]
    fn test_line_continuation_not_folded_in_laye() {
        assert_eq!(drain("a\\\nb", Mode::LAYE), codes("a\\\nb"));
    }

    #[test]
    fn test_backslash_not_before_newline_is_kept() {
        assert_eq!(drain("a\\b", Mode::C), codes("a\\b"));
    }

    #[test]
    fn test_folded_strides_preserve_positions() {
        let mut cursor = cursor_over("a\\\r\nb", Mode::C);
        assert_eq!(cursor.position(), 0);
        cursor.advance(Mode::C); // past 'a'
        assert_eq!(cursor.position(), 1);
        assert_eq!(cursor.current(), cp(' '));
        assert_eq!(cursor.stride(), 3);
        cursor.advance(Mode::C); // past the folded splice
        assert_eq!(cursor.position(), 4);
        assert_eq!(cursor.current(), cp('b'));
    }

    #[test]
    fn test_line_numbers() {
        let mut cursor = cursor_over("a\nb\r\nc", Mode::C);
        assert_eq!(cursor.line_number(), 1);
        while cursor.current() != cp('b') {
            cursor.advance(Mode::C);
        }
        assert_eq!(cursor.line_number(), 2);
        while !cursor.is_at_end() {
            cursor.advance(Mode::C);
        }
        assert_eq!(cursor.line_number(), 3);
    }

    #[test]
    fn test_start_of_line_flag() {
        let mut cursor = cursor_over("a\nb", Mode::C);
        assert!(cursor.at_start_of_line());
        cursor.reset_start_of_line();
        cursor.advance(Mode::C); // 'a' -> '\n'
        assert!(!cursor.at_start_of_line());
        cursor.advance(Mode::C); // '\n' -> 'b'
        assert!(cursor.at_start_of_line());
    }

    #[test]
    fn test_peek_zero_is_current() {
        let cursor = cursor_over("xyz", Mode::C);
        assert_eq!(cursor.peek(0, Mode::C), cp('x'));
    }

    #[test]
    fn test_peek_ahead() {
        let cursor = cursor_over("xyz", Mode::C);
        assert_eq!(cursor.peek(1, Mode::C), cp('y'));
        assert_eq!(cursor.peek(2, Mode::C), cp('z'));
        assert_eq!(cursor.peek(3, Mode::C), 0);
        assert_eq!(cursor.peek(100, Mode::C), 0);
    }

    #[test]
    fn test_peek_sees_canonical_stream() {
        let cursor = cursor_over("a\\\nb\r\nc", Mode::C);
        assert_eq!(cursor.peek(1, Mode::C), cp(' '));
        assert_eq!(cursor.peek(2, Mode::C), cp('b'));
        assert_eq!(cursor.peek(3, Mode::C), cp('\n'));
        assert_eq!(cursor.peek(4, Mode::C), cp('c'));
    }

    #[test]
    fn test_peek_has_no_side_effects() {
        let mut cursor = cursor_over("abcd", Mode::C);
        let before = (cursor.position(), cursor.current(), cursor.stride());
        cursor.peek(3, Mode::C);
        cursor.peek(1, Mode::C);
        assert_eq!(
            (cursor.position(), cursor.current(), cursor.stride()),
            before
        );
        cursor.advance(Mode::C);
        assert_eq!(cursor.current(), cp('b'));
    }

    #[test]
    fn test_match_char() {
        let mut cursor = cursor_over("=>", Mode::LAYE);
        assert!(cursor.match_char('=', Mode::LAYE));
        assert!(!cursor.match_char('=', Mode::LAYE));
        assert!(cursor.match_char('>', Mode::LAYE));
        assert!(!cursor.match_char('>', Mode::LAYE));
    }

    #[test]
    fn test_malformed_byte_is_replacement_not_eof() {
        let source = Arc::new(Source::new("bad", vec![b'a', 0xFF, b'b'], false));
        let mut cursor = Cursor::new(source, Mode::C);
        assert_eq!(cursor.current(), cp('a'));
        cursor.advance(Mode::C);
        assert_eq!(cursor.current(), 0xFFFD);
        assert!(cursor.current_malformed());
        assert_eq!(cursor.stride(), 1);
        cursor.advance(Mode::C);
        assert_eq!(cursor.current(), cp('b'));
        assert!(!cursor.current_malformed());
    }

    #[test]
    fn test_truncated_sequence_consumes_the_tail() {
        let source = Arc::new(Source::new("bad", vec![b'a', 0xE2, 0x82], false));
        let mut cursor = Cursor::new(source, Mode::C);
        cursor.advance(Mode::C);
        assert_eq!(cursor.current(), 0xFFFD);
        assert_eq!(cursor.stride(), 2);
        cursor.advance(Mode::C);
        assert!(cursor.is_at_end());
    }

    #[test]
    fn test_embedded_nul_is_an_ordinary_byte() {
        let source = Arc::new(Source::new("nul", vec![b'a', 0, b'b'], false));
        let mut cursor = Cursor::new(source, Mode::C);
        cursor.advance(Mode::C);
        assert_eq!(cursor.current(), 0);
        assert_eq!(cursor.stride(), 1);
        assert!(!cursor.is_at_end());
        cursor.advance(Mode::C);
        assert_eq!(cursor.current(), cp('b'));
    }

    #[test]
    fn test_presented_file_override() {
        let mut cursor = cursor_over("x", Mode::C);
        assert_eq!(cursor.file_name(), "test");
        cursor.set_presented_file(Some("other.c".to_string()));
        assert_eq!(cursor.file_name(), "other.c");
        cursor.set_presented_file(None);
        assert_eq!(cursor.file_name(), "test");
        cursor.set_line_number(42);
        assert_eq!(cursor.line_number(), 42);
    }
}
