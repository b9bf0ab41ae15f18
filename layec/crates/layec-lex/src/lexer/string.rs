//! Character constants, string literals, and header names.
//!
//! The lexer only finds the matching closing quote and records the raw
//! interior; escape sequences are evaluated lazily by the preprocessor.
//! A backslash therefore does exactly one thing here: it keeps the
//! following code point from closing the literal.

use crate::cursor::cp;
use crate::token::{TokenKind, TokenValue};

use super::Lexer;

impl<'ctx> Lexer<'ctx> {
    /// Lexes a character constant. The opening quote (and any prefix) has
    /// been consumed; `kind` is selected by the prefix.
    pub(crate) fn lex_character_constant(
        &mut self,
        begin: usize,
        kind: TokenKind,
    ) -> (TokenKind, TokenValue<'ctx>) {
        let (interior, terminated) = self.scan_quoted_interior('\'');

        if !terminated {
            self.error_at(begin, "Unterminated character constant.");
        } else if interior.is_empty() {
            self.error_at(begin, "Empty character constant.");
        }

        (kind, TokenValue::Text(interior))
    }

    /// Lexes a string literal. The opening quote (and any prefix) has been
    /// consumed; `kind` is selected by the prefix.
    pub(crate) fn lex_string_literal(
        &mut self,
        begin: usize,
        kind: TokenKind,
    ) -> (TokenKind, TokenValue<'ctx>) {
        let (interior, terminated) = self.scan_quoted_interior('"');

        if !terminated {
            self.error_at(begin, "Unterminated string literal.");
        }

        (kind, TokenValue::Text(interior))
    }

    /// Lexes a header name under `HEADER_NAMES` mode. The opening `<` or
    /// `"` has been consumed; `close` is the matching terminator. Header
    /// names have no escape sequences.
    pub(crate) fn lex_header_name(
        &mut self,
        begin: usize,
        close: char,
    ) -> (TokenKind, TokenValue<'ctx>) {
        let interior_begin = self.cursor.position();
        let interior_end;

        loop {
            if self.cursor.is_at_end() || self.current() == cp('\n') {
                interior_end = self.cursor.position();
                self.error_at(begin, "Unterminated header name.");
                break;
            }
            if self.current() == cp(close) {
                interior_end = self.cursor.position();
                self.advance();
                break;
            }
            self.advance();
        }

        let text = self.intern_range(interior_begin, interior_end);
        (TokenKind::HeaderName, TokenValue::Text(text))
    }

    /// Consumes up to and including the closing quote, or up to a newline
    /// or the end of the file. Returns the interned interior and whether
    /// the literal was terminated.
    fn scan_quoted_interior(&mut self, quote: char) -> (&'ctx [u8], bool) {
        let interior_begin = self.cursor.position();
        let interior_end;
        let terminated;

        loop {
            if self.cursor.is_at_end() || self.current() == cp('\n') {
                interior_end = self.cursor.position();
                terminated = false;
                break;
            }

            if self.current() == cp(quote) {
                interior_end = self.cursor.position();
                self.advance();
                terminated = true;
                break;
            }

            if self.current() == cp('\\') {
                self.advance();
                // the escaped code point cannot close the literal; its
                // meaning is resolved later.
                if !self.cursor.is_at_end() && self.current() != cp('\n') {
                    self.advance();
                }
                continue;
            }

            self.advance();
        }

        (self.intern_range(interior_begin, interior_end), terminated)
    }
}
