//! Number lexing.
//!
//! The two dialects diverge completely here. C mode produces pp-numbers,
//! the deliberately permissive preprocessing superset that swallows
//! almost anything number-adjacent without interpreting it. Laye mode
//! produces a plain decimal integer constant; radix prefixes and
//! exponents are handled by a later stage of the Laye pipeline.

use crate::lexer::operator::AsciiDigitCp;
use crate::token::{TokenKind, TokenValue};

use super::Lexer;

impl<'ctx> Lexer<'ctx> {
    /// Lexes a C pp-number. The leading digit, or the leading dot of a
    /// `.5`-shaped number, has been consumed.
    ///
    /// Continuation is greedy: digits, dots, identifier-continue
    /// characters, a single-quote digit separator when a digit follows,
    /// and a sign when it follows an exponent character.
    pub(crate) fn lex_pp_number(&mut self, begin: usize) -> (TokenKind, TokenValue<'ctx>) {
        loop {
            if self.cursor.is_at_end() || self.cursor.current_malformed() {
                break;
            }

            let c = self.current();

            if c == u32::from('\'') && self.peek(1).is_ascii_digit_cp() {
                self.advance();
                self.advance();
                continue;
            }

            let is_exponent = c == u32::from('e')
                || c == u32::from('E')
                || c == u32::from('p')
                || c == u32::from('P');
            if is_exponent && (self.peek(1) == u32::from('+') || self.peek(1) == u32::from('-')) {
                self.advance();
                self.advance();
                continue;
            }

            if c == u32::from('.') || crate::lexer::identifier::is_identifier_continue(c) {
                self.advance();
                continue;
            }

            break;
        }

        let text = self.intern_range(begin, self.cursor.position());
        (TokenKind::PpNumber, TokenValue::Text(text))
    }

    /// Lexes a Laye integer constant, a contiguous run of decimal digits
    /// whose first digit has been consumed.
    pub(crate) fn lex_laye_number(&mut self, begin: usize) -> (TokenKind, TokenValue<'ctx>) {
        while !self.cursor.is_at_end() && self.current().is_ascii_digit_cp() {
            self.advance();
        }

        let text = &self.source.text()[begin..self.cursor.position()];
        let mut value: i64 = 0;
        let mut overflowed = false;
        for &digit in text {
            debug_assert!(digit.is_ascii_digit());
            value = match value
                .checked_mul(10)
                .and_then(|v| v.checked_add(i64::from(digit - b'0')))
            {
                Some(v) => v,
                None => {
                    overflowed = true;
                    break;
                }
            };
        }

        if overflowed {
            self.error_at(begin, "Integer constant is too large.");
            value = i64::MAX;
        }

        (TokenKind::IntegerConstant, TokenValue::Int(value))
    }
}
