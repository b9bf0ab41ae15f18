//! Trivia scanning.
//!
//! Trivia is everything between tokens: horizontal white space, newlines,
//! comments, and the shebang line. Leading trivia runs until something
//! token-shaped appears; trailing trivia additionally stops at the end of
//! the line, so line-bound constructs like directives see their
//! terminator.

use crate::cursor::cp;
use crate::mode::Mode;
use crate::token::{Trivia, TriviaKind};

use super::Lexer;

impl<'ctx> Lexer<'ctx> {
    /// Scans the trivia before a token.
    pub(crate) fn scan_leading_trivia(&mut self) {
        self.scan_trivia(true);
    }

    /// Scans the trivia after a token, up to the end of its line.
    pub(crate) fn scan_trailing_trivia(&mut self) {
        self.scan_trivia(false);
    }

    fn scan_trivia(&mut self, is_leading: bool) {
        loop {
            if self.cursor.is_at_end() {
                return;
            }

            let c = self.current();

            if c == cp(' ') || c == cp('\t') || c == cp('\u{0B}') {
                let begin = self.cursor.position();
                while self.current() == cp(' ')
                    || self.current() == cp('\t')
                    || self.current() == cp('\u{0B}')
                {
                    self.advance();
                }
                self.push_trivia(TriviaKind::HorizontalWhitespace, begin);
                continue;
            }

            if c == cp('\n') {
                // newlines end the trailing trivia list, and terminate
                // leading trivia inside a directive so the newline can be
                // lexed as the end-of-directive token.
                if !is_leading || self.mode.contains(Mode::DIRECTIVE) {
                    return;
                }
                let begin = self.cursor.position();
                self.advance();
                self.push_trivia(TriviaKind::Newline, begin);
                continue;
            }

            if c == cp('#') && self.cursor.position() == 0 && self.peek(1) == cp('!') {
                let begin = self.cursor.position();
                self.advance(); // '#'
                self.advance(); // '!'
                while !self.cursor.is_at_end() && self.current() != cp('\n') {
                    self.advance();
                }
                self.push_trivia(TriviaKind::Shebang, begin);
                continue;
            }

            if c == cp('/') && self.peek(1) == cp('/') {
                let begin = self.cursor.position();
                self.advance();
                self.advance();
                while !self.cursor.is_at_end() && self.current() != cp('\n') {
                    self.advance();
                }
                self.push_trivia(TriviaKind::LineComment, begin);
                // the line is over; a trailing list ends with it.
                if !is_leading {
                    return;
                }
                continue;
            }

            if c == cp('/') && self.peek(1) == cp('*') {
                self.scan_block_comment();
                continue;
            }

            return;
        }
    }

    /// Consumes a `/* ... */` comment. Under Laye rules the delimiters
    /// nest; under C-only rules the first `*/` ends the comment. When both
    /// language bits are set, nesting wins.
    fn scan_block_comment(&mut self) {
        let begin = self.cursor.position();
        let nests = self.is_laye();

        self.advance(); // '/'
        self.advance(); // '*'

        let mut depth = 1u32;
        while depth > 0 {
            if self.cursor.is_at_end() {
                self.err_unclosed_comment(begin);
                break;
            }

            if self.current() == cp('*') && self.peek(1) == cp('/') {
                self.advance();
                self.advance();
                depth -= 1;
            } else if nests && self.current() == cp('/') && self.peek(1) == cp('*') {
                self.advance();
                self.advance();
                depth += 1;
            } else {
                self.advance();
            }
        }

        self.push_trivia(TriviaKind::BlockComment, begin);
    }

    fn push_trivia(&mut self, kind: TriviaKind, begin: usize) {
        let range = self.range(begin, self.cursor.position());
        self.record_trivia(Trivia { kind, range });
    }
}
