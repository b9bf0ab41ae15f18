//! Cross-cutting lexer tests.
