//! The preprocessing-token lexer.
//!
//! One [`Lexer`] reads one source under a stack of [`Mode`] sets. The
//! entry point is [`Lexer::read_pp_token`], which always returns a token;
//! recoverable problems become error diagnostics plus an
//! [`TokenKind::Invalid`](crate::TokenKind::Invalid) token, and contract
//! violations are fatal.

mod core;
mod identifier;
mod number;
mod operator;
mod string;
mod trivia;

pub use identifier::{is_identifier_continue, is_identifier_start};

use std::sync::Arc;

use layec_util::{Context, Loc, Range, Source, SourceId};

use crate::cursor::Cursor;
use crate::mode::Mode;
use crate::token::{Token, TokenKind, Trivia};

/// The mode-driven preprocessing-token lexer.
///
/// # Examples
///
/// ```
/// use layec_lex::{Lexer, Mode, TokenKind};
/// use layec_util::{Context, DiagSink};
///
/// let context = Context::new(DiagSink::silent());
/// let main = context.add_source("main.c", "int x;", false);
/// let mut lexer = Lexer::new(&context, main, Mode::C);
///
/// let token = lexer.read_pp_token();
/// assert_eq!(token.kind, TokenKind::PpNotKeyword);
/// assert_eq!(token.text(), Some(&b"int"[..]));
/// ```
pub struct Lexer<'ctx> {
    context: &'ctx Context,
    source: Arc<Source>,
    source_id: SourceId,
    cursor: Cursor,

    mode: Mode,
    mode_stack: Vec<Mode>,

    keep_trivia: bool,
    trivia_buf: Vec<Trivia>,
}

impl<'ctx> Lexer<'ctx> {
    /// Creates a lexer over the source registered under `source_id`.
    pub fn new(context: &'ctx Context, source_id: SourceId, mode: Mode) -> Self {
        let source = context.sources().get(source_id);
        Self {
            context,
            cursor: Cursor::new(source.clone(), mode),
            source,
            source_id,
            mode,
            mode_stack: Vec::new(),
            keep_trivia: false,
            trivia_buf: Vec::new(),
        }
    }

    /// Retains trivia and attaches it to the following token. Off by
    /// default; formatters and language servers turn it on.
    pub fn with_trivia(mut self, keep_trivia: bool) -> Self {
        self.keep_trivia = keep_trivia;
        self
    }

    /// Returns the active mode set.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Installs a new mode set, saving the current one.
    ///
    /// The current code point is re-folded under the new mode, since the
    /// language bits change what the cursor canonicalizes.
    pub fn push_mode(&mut self, mode: Mode) {
        self.mode_stack.push(self.mode);
        self.mode = mode;
        self.cursor.refold(mode);
    }

    /// Restores the mode set saved by the matching [`Lexer::push_mode`].
    pub fn pop_mode(&mut self) {
        match self.mode_stack.pop() {
            Some(mode) => {
                self.mode = mode;
                self.cursor.refold(mode);
            }
            None => self
                .context
                .diag()
                .fatal(Some(self.loc(self.cursor.position())), "unbalanced lexer mode pop"),
        }
    }

    /// Returns the file name presented to the program.
    pub fn file_name(&self) -> &str {
        self.cursor.file_name()
    }

    /// Returns the line number presented to the program.
    pub fn line_number(&self) -> u32 {
        self.cursor.line_number()
    }

    /// Overrides the presented file name and line number, the effect of a
    /// `#line` directive. `None` restores the source's own name.
    pub fn override_location(&mut self, file: Option<String>, line_number: u32) {
        self.cursor.set_presented_file(file);
        self.cursor.set_line_number(line_number);
    }

    /// Returns the source this lexer reads.
    pub fn source(&self) -> &Arc<Source> {
        &self.source
    }

    pub(crate) fn is_c(&self) -> bool {
        self.mode.is_c()
    }

    pub(crate) fn is_laye(&self) -> bool {
        self.mode.is_laye()
    }

    fn suppress_diags(&self) -> bool {
        self.mode.contains(Mode::REJECTED_BRANCH)
    }

    pub(crate) fn current(&self) -> u32 {
        self.cursor.current()
    }

    pub(crate) fn peek(&self, ahead: usize) -> u32 {
        self.cursor.peek(ahead, self.mode)
    }

    pub(crate) fn advance(&mut self) {
        self.cursor.advance(self.mode);
    }

    /// Consumes the current code point if it equals `expected`.
    pub(crate) fn try_advance(&mut self, expected: char) -> bool {
        self.cursor.match_char(expected, self.mode)
    }

    pub(crate) fn range(&self, begin: usize, end: usize) -> Range {
        Range::new(self.source_id, begin, end)
    }

    fn loc(&self, offset: usize) -> Loc {
        Loc::resolved(&self.source, offset)
    }

    /// Copies the source bytes `[begin, end)` into the arena.
    pub(crate) fn intern_range(&self, begin: usize, end: usize) -> &'ctx [u8] {
        self.context.arena().intern_bytes(&self.source.text()[begin..end])
    }

    /// Emits a recoverable error unless a rejected branch suppresses it.
    pub(crate) fn error_at(&self, offset: usize, message: impl Into<String>) {
        if self.suppress_diags() {
            return;
        }
        self.context.diag().error(self.loc(offset), message);
    }

    /// Emits a fatal contract-violation diagnostic. Never returns.
    pub(crate) fn fatal_at(&self, offset: usize, message: impl Into<String>) -> ! {
        self.context.diag().fatal(Some(self.loc(offset)), message)
    }

    pub(crate) fn err_invalid_character(&self, offset: usize) {
        self.error_at(offset, "Invalid character in source text.");
    }

    pub(crate) fn err_invalid_bytes(&self, offset: usize) {
        self.error_at(offset, "Invalid UTF-8 sequence in source text.");
    }

    pub(crate) fn err_unclosed_comment(&self, offset: usize) {
        self.error_at(offset, "Unclosed delimited comment.");
    }

    /// Takes the buffered trivia as an arena slice for the token being
    /// built, or `None` when retention is off.
    fn take_trivia(&mut self) -> Option<&'ctx [Trivia]> {
        if !self.keep_trivia || self.trivia_buf.is_empty() {
            self.trivia_buf.clear();
            return None;
        }
        let slice = self.context.arena().alloc_slice(&self.trivia_buf);
        self.trivia_buf.clear();
        Some(slice)
    }

    /// Records a piece of trivia when retention is on.
    pub(crate) fn record_trivia(&mut self, trivia: Trivia) {
        if self.keep_trivia {
            self.trivia_buf.push(trivia);
        }
    }
}

/// Iterating a lexer yields tokens up to, and not including, the
/// end-of-file token.
impl<'ctx> Iterator for Lexer<'ctx> {
    type Item = Token<'ctx>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.read_pp_token();
        if token.kind == TokenKind::EndOfFile {
            None
        } else {
            Some(token)
        }
    }
}
