//! Lexer modes.
//!
//! Modes compose: a directive body inside a C file lexes under
//! `C | DIRECTIVE`, and a directive expecting a header name adds
//! `HEADER_NAMES` on top. The set is therefore a bitset, never an enum.

use bitflags::bitflags;

bitflags! {
    /// The syntax rules in effect for one lexer call.
    ///
    /// At least one of [`Mode::LAYE`] and [`Mode::C`] must be set while
    /// reading a language token; the two may be set together only for
    /// scanning territory the dialects share.
    ///
    /// # Examples
    ///
    /// ```
    /// use layec_lex::Mode;
    ///
    /// let mode = Mode::C | Mode::DIRECTIVE;
    /// assert!(mode.is_c());
    /// assert!(!mode.is_laye());
    /// assert!(mode.contains(Mode::DIRECTIVE));
    /// ```
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Mode: u8 {
        /// Laye syntax rules: nested block comments, the extra punctuators
        /// and Laye number syntax.
        const LAYE = 1 << 0;
        /// C syntax rules: `...`, line continuation folding, pp-numbers,
        /// flat block comments.
        const C = 1 << 1;
        /// Inside a preprocessing directive; a newline terminates the
        /// directive instead of being consumed as white space.
        const DIRECTIVE = 1 << 2;
        /// The next token may be a `<...>` or `"..."` header name.
        const HEADER_NAMES = 1 << 3;
        /// Inside a rejected conditional branch; diagnostics are
        /// suppressed but tokens are still produced.
        const REJECTED_BRANCH = 1 << 4;
    }
}

impl Mode {
    /// Returns true if C rules are in effect.
    #[inline]
    pub fn is_c(self) -> bool {
        self.contains(Mode::C)
    }

    /// Returns true if Laye rules are in effect.
    #[inline]
    pub fn is_laye(self) -> bool {
        self.contains(Mode::LAYE)
    }

    /// Returns true if at least one language bit is set.
    #[inline]
    pub fn has_language(self) -> bool {
        self.intersects(Mode::LAYE.union(Mode::C))
    }
}
