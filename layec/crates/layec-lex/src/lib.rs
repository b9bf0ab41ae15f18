//! layec-lex - the mode-driven preprocessing lexer for the layec front
//! end.
//!
//! The lexer reads one source as UTF-8 and produces the canonical stream
//! of preprocessing tokens that the preprocessor and parsers consume. Both
//! supported dialects, the C family and Laye, share this one scanner; a
//! bitset of [`Mode`] flags selects the syntax rules per call, and nested
//! contexts (a directive inside a C file, a header name inside a
//! directive) push and pop mode sets on the lexer.
//!
//! The pipeline inside this crate:
//!
//! - [`utf8`] decodes bytes to code points, leniently;
//! - [`Cursor`] canonicalizes newlines and C line continuations, and
//!   serves arbitrary-depth lookahead;
//! - [`Lexer`] skips trivia and reads one token per call, flagging each
//!   with its start-of-line and whitespace-before bits;
//! - [`TokenKind`] is the single declarative table of every kind, keyword
//!   spelling and availability mask the front end knows about.
//!
//! Keyword classification happens *after* lexing: the lexer emits
//! [`TokenKind::PpNotKeyword`] for everything identifier-shaped, and
//! consumers call [`classify_keyword`] with their [`Dialect`].
//!
//! # Examples
//!
//! ```
//! use layec_lex::{Lexer, Mode, TokenKind};
//! use layec_util::{Context, DiagSink};
//!
//! let context = Context::new(DiagSink::silent());
//! let main = context.add_source("main.c", "int x = 0;", false);
//!
//! let kinds: Vec<TokenKind> = Lexer::new(&context, main, Mode::C)
//!     .map(|token| token.kind)
//!     .collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::PpNotKeyword,
//!         TokenKind::PpNotKeyword,
//!         TokenKind::Equal,
//!         TokenKind::PpNumber,
//!         TokenKind::SemiColon,
//!     ],
//! );
//! ```

pub mod cursor;
pub mod lexer;
pub mod mode;
pub mod token;
pub mod utf8;

mod edge_cases;

pub use cursor::Cursor;
pub use lexer::{is_identifier_continue, is_identifier_start, Lexer};
pub use mode::Mode;
pub use token::{
    classify_directive_keyword, classify_keyword, CStandard, Dialect, KeywordKey, Language, Token,
    TokenCategory, TokenKind, TokenValue, Trivia, TriviaKind,
};
pub use utf8::{decode, DecodeError};
