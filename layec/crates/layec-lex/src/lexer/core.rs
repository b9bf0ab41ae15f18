//! The token reading loop.

use crate::cursor::cp;
use crate::mode::Mode;
use crate::token::{Token, TokenKind, TokenValue};

use super::Lexer;

impl<'ctx> Lexer<'ctx> {
    /// Reads one preprocessing token.
    ///
    /// Always consumes at least one code point, except at the end of the
    /// file, where it returns an end-of-file token with an empty range at
    /// the end of the text, forever.
    pub fn read_pp_token(&mut self) -> Token<'ctx> {
        debug_assert!(
            self.mode.has_language(),
            "reading a token with no language mode set"
        );

        let trivia_begin = self.cursor.position();
        self.scan_leading_trivia();

        let at_start_of_line = self.cursor.at_start_of_line();
        let has_whitespace_before = self.cursor.position() != trivia_begin;
        self.cursor.reset_start_of_line();

        let begin = self.cursor.position();
        let trivia = self.take_trivia();

        if self.cursor.is_at_end() {
            let end_of_text = self.source.len();
            return Token {
                kind: TokenKind::EndOfFile,
                at_start_of_line,
                has_whitespace_before,
                expansion_disabled: false,
                range: self.range(end_of_text, end_of_text),
                value: TokenValue::None,
                trivia,
            };
        }

        let malformed = self.cursor.current_malformed();
        let c = self.current();
        self.advance();

        let (kind, value) = self.dispatch(begin, c, malformed);

        let end = self.cursor.position();
        if end <= begin {
            self.fatal_at(begin, "lexer did not consume a character");
        }
        let range = self.range(begin, end);

        self.scan_trailing_trivia();

        Token {
            kind,
            at_start_of_line,
            has_whitespace_before,
            expansion_disabled: false,
            range,
            value,
            trivia,
        }
    }

    /// Dispatches on the first (already consumed) code point of a token.
    fn dispatch(&mut self, begin: usize, c: u32, malformed: bool) -> (TokenKind, TokenValue<'ctx>) {
        use crate::token::TokenKind as K;

        if malformed {
            self.err_invalid_bytes(begin);
            return (K::Invalid, TokenValue::None);
        }

        // every non-ASCII code point is acceptable as an identifier start.
        if c >= 0x80 {
            return self.lex_identifier(begin);
        }

        let none = TokenValue::None;
        match c as u8 {
            b'\n' => {
                if !self.mode.contains(Mode::DIRECTIVE) {
                    self.fatal_at(
                        begin,
                        "the newline character is white space unless within a preprocessing directive",
                    );
                }
                (K::PpEndOfDirective, none)
            }

            b'#' => {
                if self.is_c() && self.try_advance('#') {
                    (K::HashHash, none)
                } else if self.is_laye() && self.try_advance('[') {
                    (K::HashSquare, none)
                } else {
                    (K::Hash, none)
                }
            }

            b'(' => (K::OpenParen, none),
            b')' => (K::CloseParen, none),
            b'[' => (K::OpenSquare, none),
            b']' => (K::CloseSquare, none),
            b'{' => (K::OpenCurly, none),
            b'}' => (K::CloseCurly, none),
            b',' => (K::Comma, none),
            b';' => (K::SemiColon, none),

            b'.' => self.lex_dot(begin),
            b':' => (self.lex_colon(), none),
            b'=' => (self.lex_equal(), none),
            b'!' => (self.lex_bang(), none),
            b'<' if self.mode.contains(Mode::HEADER_NAMES) => self.lex_header_name(begin, '>'),
            b'<' => (self.lex_less(), none),
            b'>' => (self.lex_greater(), none),
            b'+' => (self.lex_plus(), none),
            b'-' => (self.lex_minus(), none),
            b'*' => (self.lex_star(), none),
            b'/' => (self.lex_slash(), none),
            b'%' => (self.lex_percent(), none),
            b'^' => (self.lex_caret(), none),
            b'~' => (self.lex_tilde(), none),
            b'&' => (self.lex_ampersand(), none),
            b'|' => (self.lex_pipe(), none),
            b'?' => (self.lex_question(), none),

            b'"' if self.mode.contains(Mode::HEADER_NAMES) => self.lex_header_name(begin, '"'),
            b'"' => self.lex_string_literal(begin, K::StringLiteral),
            b'\'' => self.lex_character_constant(begin, K::CharacterConstant),

            b'L' | b'u' | b'U' => self.lex_identifier_or_prefixed_literal(begin, c as u8),

            b'_' | b'$' | b'a'..=b'z' | b'A'..=b'Z' => self.lex_identifier(begin),

            b'0'..=b'9' => {
                if self.is_c() {
                    self.lex_pp_number(begin)
                } else {
                    self.lex_laye_number(begin)
                }
            }

            _ => {
                self.err_invalid_character(begin);
                (K::Invalid, none)
            }
        }
    }

    /// Resolves an `L`, `u`, `u8` or `U` head into a prefixed character or
    /// string literal, or falls through to an ordinary identifier.
    fn lex_identifier_or_prefixed_literal(
        &mut self,
        begin: usize,
        lead: u8,
    ) -> (TokenKind, TokenValue<'ctx>) {
        use crate::token::TokenKind as K;

        if lead == b'u'
            && self.current() == cp('8')
            && (self.peek(1) == cp('\'') || self.peek(1) == cp('"'))
        {
            self.advance(); // '8'
            let quote = self.current();
            self.advance();
            return if quote == cp('\'') {
                self.lex_character_constant(begin, K::Utf8CharacterConstant)
            } else {
                self.lex_string_literal(begin, K::Utf8StringLiteral)
            };
        }

        if self.current() == cp('\'') || self.current() == cp('"') {
            let quote = self.current();
            self.advance();
            let kind = match (lead, quote == cp('\'')) {
                (b'L', true) => K::WideCharacterConstant,
                (b'L', false) => K::WideStringLiteral,
                (b'u', true) => K::Utf16CharacterConstant,
                (b'u', false) => K::Utf16StringLiteral,
                (_, true) => K::Utf32CharacterConstant,
                (_, false) => K::Utf32StringLiteral,
            };
            return if quote == cp('\'') {
                self.lex_character_constant(begin, kind)
            } else {
                self.lex_string_literal(begin, kind)
            };
        }

        self.lex_identifier(begin)
    }
}
