//! Token kinds, token records, and keyword classification.
//!
//! Every token kind the front end knows about is declared exactly once, in
//! the [`token_kinds!`] invocation below, together with its category, its
//! canonical spelling (when it has one) and its keyword availability mask
//! (when it is a keyword). Everything else in this module is derived from
//! that table.
//!
//! The lexer itself never produces keyword kinds: identifier-shaped tokens
//! come out as [`TokenKind::PpNotKeyword`] and consumers re-classify them
//! against the active [`Dialect`] with [`classify_keyword`]. This keeps the
//! byte-level scanner free of dialect policy.

use std::hash::BuildHasherDefault;
use std::sync::LazyLock;

use bitflags::bitflags;
use indexmap::IndexMap;
use rustc_hash::FxHasher;
use static_assertions::assert_eq_size;

use layec_util::Range;

/// An ordered map with the compiler's preferred hasher.
type FxIndexMap<K, V> = IndexMap<K, V, BuildHasherDefault<FxHasher>>;

bitflags! {
    /// Describes under which dialect configurations a keyword is reserved.
    ///
    /// An identifier is a keyword for a configuration exactly when its mask
    /// intersects the configuration's mask; see [`Dialect::keyword_key`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeywordKey: u16 {
        /// A keyword in all variants of C.
        const C = 1 << 0;
        /// A keyword in all variants of Laye.
        const LAYE = 1 << 1;
        /// A keyword introduced to C in C99.
        const C99 = 1 << 2;
        /// A keyword introduced to C in C23.
        const C23 = 1 << 3;
        /// A keyword if GNU extensions are enabled.
        const GNU = 1 << 4;
        /// A keyword if Microsoft extensions are enabled.
        const MS = 1 << 5;
        /// A keyword if Microsoft compatibility mode is enabled.
        const MS_COMPAT = 1 << 6;
        /// A keyword if Clang extensions are enabled.
        const CLANG = 1 << 7;
        /// A keyword if Choir extensions are enabled.
        const CHOIR = 1 << 8;
        /// A keyword if `bool` is a built-in type.
        const BOOL = 1 << 9;

        /// A keyword in all variants of C and Laye.
        const ALL = Self::C.bits() | Self::LAYE.bits();
    }
}

/// The broad category a token kind belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    /// Not produced by ordinary lexing: [`TokenKind::Invalid`] and
    /// [`TokenKind::EndOfFile`].
    Special,
    /// Preprocessing markers without a fixed spelling.
    Marker,
    /// Preprocessing directive keywords, recognized by the preprocessor.
    Directive,
    /// Literals, identifiers and header names.
    Literal,
    /// Punctuators with a single canonical spelling.
    Punct,
    /// Language keywords, subject to dialect availability.
    Keyword,
}

macro_rules! token_kinds {
    (@spelling) => { None };
    (@spelling $s:literal) => { Some($s) };
    (@key) => { KeywordKey::empty() };
    (@key $($key:ident)|+) => { KeywordKey::empty()$(.union(KeywordKey::$key))+ };

    ($($category:ident $name:ident $(= $spelling:literal)? $(: $($key:ident)|+)?),* $(,)?) => {
        /// The distinct kind of a token.
        ///
        /// Kind determines both the broad purpose a token serves and which
        /// payload variant of [`TokenValue`] it carries.
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
        #[repr(u16)]
        pub enum TokenKind {
            $($name),*
        }

        impl TokenKind {
            /// Every declared kind, in declaration order.
            pub const KINDS: &'static [TokenKind] = &[$(TokenKind::$name),*];

            /// Returns the name of the enum constant for this kind.
            pub fn name(self) -> &'static str {
                match self {
                    $(TokenKind::$name => stringify!($name)),*
                }
            }

            /// Returns the canonical spelling of this kind, if it has a
            /// single one.
            pub fn spelling(self) -> Option<&'static str> {
                match self {
                    $(TokenKind::$name => token_kinds!(@spelling $($spelling)?)),*
                }
            }

            /// Returns the keyword availability mask of this kind, empty
            /// for anything that is not a keyword.
            pub fn keyword_key(self) -> KeywordKey {
                match self {
                    $(TokenKind::$name => token_kinds!(@key $($($key)|+)?)),*
                }
            }

            /// Returns the category this kind belongs to.
            pub fn category(self) -> TokenCategory {
                match self {
                    $(TokenKind::$name => TokenCategory::$category),*
                }
            }
        }
    };
}

token_kinds! {
    // Special tokens.
    Special Invalid,
    Special EndOfFile,

    // Preprocessing markers.
    Marker PpNotKeyword,
    Marker PpEndOfDirective,
    Marker PpNumber,
    Marker PpMacroParam,
    Marker PpLayeTokenMacro,
    Marker PpLayeExprMacro,
    Marker PpLayeNumber,

    // Conditional inclusion.
    Directive PpIf = "if",
    Directive PpElif = "elif",
    Directive PpElse = "else",
    Directive PpEndif = "endif",
    Directive PpIfdef = "ifdef",
    Directive PpIfndef = "ifndef",
    Directive PpElifdef = "elifdef",
    Directive PpElifndef = "elifndef",
    Directive PpDefined = "defined",
    Directive PpHasInclude = "__has_include",
    Directive PpHasEmbed = "__has_embed",
    Directive PpHasCAttribute = "__has_c_attribute",
    Directive PpHasIncludeNext = "__has_include_next",
    Directive PpHasBuiltin = "__has_builtin",
    Directive PpHasAttribute = "__has_attribute",
    Directive PpHasFeature = "__has_feature",
    Directive PpHasExtension = "__has_extension",
    Directive PpIsIdentifier = "__is_identifier",

    // Source file and resource inclusion.
    Directive PpInclude = "include",
    Directive PpIncludeNext = "include_next",
    Directive PpEmbed = "embed",

    // Macro replacement.
    Directive PpDefine = "define",
    Directive PpUndef = "undef",
    Directive PpVaOpt = "__VA_OPT__",
    Directive PpVaArgs = "__VA_ARGS__",

    // Line control and diagnostic directives.
    Directive PpLine = "line",
    Directive PpError = "error",
    Directive PpWarning = "warning",
    Directive PpPragma = "pragma",

    // Predefined macro names and the pragma operator.
    Directive PpLineMacro = "__LINE__",
    Directive PpFileMacro = "__FILE__",
    Directive PpPragmaOperator = "_Pragma",

    // Identifiers, constants, literals, header names.
    Literal Identifier,
    Literal RawIdentifier,
    Literal IntegerConstant,
    Literal FloatingConstant,
    Literal CharacterConstant,
    Literal WideCharacterConstant,
    Literal Utf8CharacterConstant,
    Literal Utf16CharacterConstant,
    Literal Utf32CharacterConstant,
    Literal StringLiteral,
    Literal WideStringLiteral,
    Literal Utf8StringLiteral,
    Literal Utf16StringLiteral,
    Literal Utf32StringLiteral,
    Literal HeaderName,

    // Punctuators shared by C and Laye, plus the C-only set.
    Punct Hash = "#",
    Punct HashHash = "##",
    Punct OpenParen = "(",
    Punct CloseParen = ")",
    Punct OpenSquare = "[",
    Punct CloseSquare = "]",
    Punct OpenCurly = "{",
    Punct CloseCurly = "}",
    Punct Comma = ",",
    Punct SemiColon = ";",
    Punct Dot = ".",
    Punct DotDotDot = "...",
    Punct Colon = ":",
    Punct ColonColon = "::",
    Punct Equal = "=",
    Punct EqualEqual = "==",
    Punct EqualGreater = "=>",
    Punct Bang = "!",
    Punct BangEqual = "!=",
    Punct Less = "<",
    Punct LessEqual = "<=",
    Punct LessLess = "<<",
    Punct LessLessEqual = "<<=",
    Punct Greater = ">",
    Punct GreaterEqual = ">=",
    Punct GreaterGreater = ">>",
    Punct GreaterGreaterEqual = ">>=",
    Punct Plus = "+",
    Punct PlusEqual = "+=",
    Punct PlusPlus = "++",
    Punct Minus = "-",
    Punct MinusEqual = "-=",
    Punct MinusMinus = "--",
    Punct MinusGreater = "->",
    Punct Star = "*",
    Punct StarEqual = "*=",
    Punct Slash = "/",
    Punct SlashEqual = "/=",
    Punct Percent = "%",
    Punct PercentEqual = "%=",
    Punct Caret = "^",
    Punct CaretEqual = "^=",
    Punct Tilde = "~",
    Punct Ampersand = "&",
    Punct AmpersandEqual = "&=",
    Punct AmpersandAmpersand = "&&",
    Punct Pipe = "|",
    Punct PipeEqual = "|=",
    Punct PipePipe = "||",
    Punct Question = "?",

    // Laye-only punctuators.
    Punct HashSquare = "#[",
    Punct DotDot = "..",
    Punct DotDotEqual = "..=",
    Punct LessEqualGreater = "<=>",
    Punct TildeEqual = "~=",
    Punct QuestionQuestion = "??",
    Punct QuestionQuestionEqual = "??=",

    // C keywords.
    Keyword KwAlignas = "alignas" : C,
    Keyword KwAlignof = "alignof" : C23 | LAYE,
    Keyword KwAuto = "auto" : C,
    Keyword KwBool = "bool" : BOOL | C23 | LAYE,
    Keyword KwBreak = "break" : ALL,
    Keyword KwCase = "case" : ALL,
    Keyword KwChar = "char" : C,
    Keyword KwConst = "const" : ALL,
    Keyword KwConstexpr = "constexpr" : ALL,
    Keyword KwContinue = "continue" : ALL,
    Keyword KwDefault = "default" : ALL,
    Keyword KwDo = "do" : ALL,
    Keyword KwDouble = "double" : C,
    Keyword KwElse = "else" : ALL,
    Keyword KwEnum = "enum" : ALL,
    Keyword KwExtern = "extern" : C,
    Keyword KwFalse = "false" : BOOL | C23 | LAYE,
    Keyword KwFloat = "float" : C,
    Keyword KwFor = "for" : ALL,
    Keyword KwGoto = "goto" : ALL,
    Keyword KwIf = "if" : ALL,
    Keyword KwInline = "inline" : C99 | GNU | LAYE,
    Keyword KwInt = "int" : ALL,
    Keyword KwLong = "long" : C,
    Keyword KwNullptr = "nullptr" : C23,
    Keyword KwRegister = "register" : ALL,
    Keyword KwRestrict = "restrict" : C99,
    Keyword KwReturn = "return" : ALL,
    Keyword KwShort = "short" : C,
    Keyword KwSigned = "signed" : C,
    Keyword KwSizeof = "sizeof" : ALL,
    Keyword KwStatic = "static" : ALL,
    Keyword KwStaticAssert = "static_assert" : C,
    Keyword KwStruct = "struct" : ALL,
    Keyword KwSwitch = "switch" : ALL,
    Keyword KwThreadLocal = "thread_local" : ALL,
    Keyword KwTrue = "true" : BOOL | C23 | LAYE,
    Keyword KwTypedef = "typedef" : C,
    Keyword KwTypeof = "typeof" : C23 | GNU | LAYE,
    Keyword KwTypeofUnqual = "typeof_unqual" : C23 | LAYE,
    Keyword KwUnion = "union" : C,
    Keyword KwUnsigned = "unsigned" : C,
    Keyword KwVoid = "void" : ALL,
    Keyword KwVolatile = "volatile" : C,
    Keyword KwWhile = "while" : ALL,
    Keyword KwBitInt = "_BitInt" : C,
    Keyword KwAtomic = "_Atomic" : C,
    Keyword KwComplex = "_Complex" : C,
    Keyword KwDecimal128 = "_Decimal128" : C,
    Keyword KwDecimal32 = "_Decimal32" : C,
    Keyword KwDecimal64 = "_Decimal64" : C,
    Keyword KwGeneric = "_Generic" : C,
    Keyword KwImaginary = "_Imaginary" : C,
    Keyword KwNoreturnC = "_Noreturn" : C,

    // C standard keyword aliases.
    Keyword KwAlignasAlias = "_Alignas" : C,
    Keyword KwAlignofAlias = "_Alignof" : C,
    Keyword KwBoolAlias = "_Bool" : C,
    Keyword KwStaticAssertAlias = "_Static_assert" : C,
    Keyword KwThreadLocalAlias = "_Thread_local" : C,

    // GNU extensions.
    Keyword KwAsm = "asm" : C | GNU,
    Keyword KwAsmGnu = "__asm__" : C | GNU,
    Keyword KwAttribute = "__attribute__" : C | GNU,
    Keyword KwAutoType = "__auto_type" : C | GNU,
    Keyword KwThreadGnu = "__thread" : C | GNU,

    // Laye keywords.
    Keyword KwAlias = "alias" : LAYE,
    Keyword KwAnd = "and" : LAYE,
    Keyword KwAs = "as" : LAYE,
    Keyword KwAssert = "assert" : LAYE,
    Keyword KwBoolSized : LAYE,
    Keyword KwBuiltinFfiBool = "__builtin_ffi_bool" : LAYE,
    Keyword KwBuiltinFfiChar = "__builtin_ffi_char" : LAYE,
    Keyword KwBuiltinFfiShort = "__builtin_ffi_short" : LAYE,
    Keyword KwBuiltinFfiInt = "__builtin_ffi_int" : LAYE,
    Keyword KwBuiltinFfiLong = "__builtin_ffi_long" : LAYE,
    Keyword KwBuiltinFfiLongLong = "__builtin_ffi_long_long" : LAYE,
    Keyword KwBuiltinFfiFloat = "__builtin_ffi_float" : LAYE,
    Keyword KwBuiltinFfiDouble = "__builtin_ffi_double" : LAYE,
    Keyword KwBuiltinFfiLongDouble = "__builtin_ffi_long_double" : LAYE,
    Keyword KwCallconv = "callconv" : LAYE,
    Keyword KwCast = "cast" : LAYE,
    Keyword KwCountof = "countof" : LAYE,
    Keyword KwDefer = "defer" : LAYE,
    Keyword KwDelegate = "delegate" : LAYE,
    Keyword KwDelete = "delete" : LAYE,
    Keyword KwDiscard = "discard" : LAYE,
    Keyword KwDiscardable = "discardable" : LAYE,
    Keyword KwEval = "eval" : LAYE,
    Keyword KwExport = "export" : LAYE,
    Keyword KwFallthrough = "fallthrough" : LAYE,
    Keyword KwFloat32 = "float32" : LAYE,
    Keyword KwFloat64 = "float64" : LAYE,
    Keyword KwForeign = "foreign" : LAYE,
    Keyword KwFrom = "from" : LAYE,
    Keyword KwGlobal = "global" : LAYE,
    Keyword KwImport = "import" : LAYE,
    Keyword KwIntSized : LAYE,
    Keyword KwIs = "is" : LAYE,
    Keyword KwModule = "module" : LAYE,
    Keyword KwMut = "mut" : LAYE,
    Keyword KwNew = "new" : LAYE,
    Keyword KwNil = "nil" : LAYE,
    Keyword KwNoreturn = "noreturn" : LAYE,
    Keyword KwNot = "not" : LAYE,
    Keyword KwOffsetof = "offsetof" : LAYE,
    Keyword KwOperator = "operator" : LAYE,
    Keyword KwOr = "or" : LAYE,
    Keyword KwPragma = "pragma" : LAYE,
    Keyword KwRankof = "rankof" : LAYE,
    Keyword KwRef = "ref" : LAYE,
    Keyword KwStrict = "strict" : LAYE,
    Keyword KwTemplate = "template" : LAYE,
    Keyword KwTest = "test" : LAYE,
    Keyword KwUnreachable = "unreachable" : LAYE,
    Keyword KwVar = "var" : LAYE,
    Keyword KwVarargs = "varargs" : LAYE,
    Keyword KwVariant = "variant" : LAYE,
    Keyword KwXor = "xor" : LAYE,
    Keyword KwXyzzy = "xyzzy" : LAYE,
    Keyword KwYield = "yield" : LAYE,
}

assert_eq_size!(TokenKind, u16);

impl TokenKind {
    /// Returns true for language keywords.
    pub fn is_keyword(self) -> bool {
        self.category() == TokenCategory::Keyword
    }

    /// Returns true for punctuators.
    pub fn is_punctuator(self) -> bool {
        self.category() == TokenCategory::Punct
    }

    /// Returns true for preprocessing directive keywords.
    pub fn is_directive_keyword(self) -> bool {
        self.category() == TokenCategory::Directive
    }
}

/// Keyword spellings to kinds, in table declaration order.
static KEYWORDS: LazyLock<FxIndexMap<&'static str, TokenKind>> = LazyLock::new(|| {
    TokenKind::KINDS
        .iter()
        .copied()
        .filter(|kind| kind.category() == TokenCategory::Keyword)
        .filter_map(|kind| kind.spelling().map(|spelling| (spelling, kind)))
        .collect()
});

/// Directive keyword spellings to kinds, in table declaration order.
static DIRECTIVE_KEYWORDS: LazyLock<FxIndexMap<&'static str, TokenKind>> = LazyLock::new(|| {
    TokenKind::KINDS
        .iter()
        .copied()
        .filter(|kind| kind.category() == TokenCategory::Directive)
        .filter_map(|kind| kind.spelling().map(|spelling| (spelling, kind)))
        .collect()
});

/// The language a dialect configuration lexes and parses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Language {
    /// The C family.
    C,
    /// Laye.
    Laye,
}

/// A revision of the C standard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum CStandard {
    C89,
    C99,
    C11,
    C17,
    C23,
}

/// A dialect configuration: the language, the standard revision, and the
/// enabled extension families.
///
/// # Examples
///
/// ```
/// use layec_lex::{classify_keyword, CStandard, Dialect, TokenKind};
///
/// let c23 = Dialect::c(CStandard::C23);
/// assert_eq!(classify_keyword(b"typeof", c23), Some(TokenKind::KwTypeof));
///
/// let c11 = Dialect::c(CStandard::C11);
/// assert_eq!(classify_keyword(b"typeof", c11), None);
/// assert_eq!(
///     classify_keyword(b"typeof", c11.with_gnu(true)),
///     Some(TokenKind::KwTypeof),
/// );
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dialect {
    pub language: Language,
    pub c_standard: CStandard,
    pub gnu: bool,
    pub ms: bool,
    pub ms_compat: bool,
    pub clang: bool,
    pub choir: bool,
    /// True if `bool` is a built-in type under this configuration. Always
    /// true from C23 on.
    pub bool_is_builtin: bool,
}

impl Dialect {
    /// A plain C dialect at the given standard revision, no extensions.
    pub fn c(c_standard: CStandard) -> Dialect {
        Dialect {
            language: Language::C,
            c_standard,
            gnu: false,
            ms: false,
            ms_compat: false,
            clang: false,
            choir: false,
            bool_is_builtin: c_standard >= CStandard::C23,
        }
    }

    /// The Laye dialect.
    pub fn laye() -> Dialect {
        Dialect {
            language: Language::Laye,
            c_standard: CStandard::C23,
            gnu: false,
            ms: false,
            ms_compat: false,
            clang: false,
            choir: false,
            bool_is_builtin: true,
        }
    }

    /// Toggles GNU extensions.
    pub fn with_gnu(mut self, gnu: bool) -> Dialect {
        self.gnu = gnu;
        self
    }

    /// Toggles Microsoft extensions.
    pub fn with_ms(mut self, ms: bool) -> Dialect {
        self.ms = ms;
        self
    }

    /// Toggles Clang extensions.
    pub fn with_clang(mut self, clang: bool) -> Dialect {
        self.clang = clang;
        self
    }

    /// Toggles Choir extensions.
    pub fn with_choir(mut self, choir: bool) -> Dialect {
        self.choir = choir;
        self
    }

    /// Declares whether `bool` is a built-in type.
    pub fn with_bool_builtin(mut self, bool_is_builtin: bool) -> Dialect {
        self.bool_is_builtin = bool_is_builtin;
        self
    }

    /// Computes the active keyword availability mask.
    pub fn keyword_key(self) -> KeywordKey {
        let mut key = match self.language {
            Language::Laye => KeywordKey::LAYE,
            Language::C => {
                let mut key = KeywordKey::C;
                if self.c_standard >= CStandard::C99 {
                    key |= KeywordKey::C99;
                }
                if self.c_standard >= CStandard::C23 {
                    key |= KeywordKey::C23;
                }
                key
            }
        };

        if self.gnu {
            key |= KeywordKey::GNU;
        }
        if self.ms {
            key |= KeywordKey::MS;
            key |= KeywordKey::MS_COMPAT;
        }
        if self.ms_compat {
            key |= KeywordKey::MS_COMPAT;
        }
        if self.clang {
            key |= KeywordKey::CLANG;
        }
        if self.choir {
            key |= KeywordKey::CHOIR;
        }
        if self.bool_is_builtin {
            key |= KeywordKey::BOOL;
        }

        key
    }
}

/// Classifies identifier text as a keyword under a dialect.
///
/// Returns `None` if the text is not keyword-shaped or the keyword is not
/// reserved under the dialect's configuration.
pub fn classify_keyword(text: &[u8], dialect: Dialect) -> Option<TokenKind> {
    let text = std::str::from_utf8(text).ok()?;
    let kind = *KEYWORDS.get(text)?;
    if kind.keyword_key().intersects(dialect.keyword_key()) {
        Some(kind)
    } else {
        None
    }
}

/// Classifies identifier text as a preprocessing directive keyword.
///
/// Directive keywords are shared by every dialect, so no configuration is
/// involved.
pub fn classify_directive_keyword(text: &[u8]) -> Option<TokenKind> {
    let text = std::str::from_utf8(text).ok()?;
    DIRECTIVE_KEYWORDS.get(text).copied()
}

/// The kind-discriminated payload of a token.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TokenValue<'a> {
    /// No payload.
    None,
    /// Arena-interned text: identifier spellings, pp-number spellings, and
    /// the raw (undecoded) interiors of literals and header names.
    Text(&'a [u8]),
    /// The value of a character constant once evaluated.
    Char(u32),
    /// The value of an integer constant.
    Int(i64),
    /// The value of a floating constant.
    Float(f64),
}

/// A piece of trivia retained between tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Trivia {
    pub kind: TriviaKind,
    pub range: Range,
}

/// What a retained piece of trivia is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriviaKind {
    /// Spaces, tabs and vertical tabs.
    HorizontalWhitespace,
    /// A canonical newline.
    Newline,
    /// A `//` comment, up to but not including the line end.
    LineComment,
    /// A `/* ... */` comment.
    BlockComment,
    /// A `#!` line at the very start of the source.
    Shebang,
}

/// One preprocessing token.
///
/// Tokens are plain values; text payloads borrow from the arena of the
/// context that produced them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Token<'a> {
    /// The kind of this token.
    pub kind: TokenKind,

    /// True if this token is the first on its line, preceded only by white
    /// space or comments.
    pub at_start_of_line: bool,
    /// True if any white space or comment separates this token from the
    /// previous character.
    pub has_whitespace_before: bool,
    /// True if this token must not be considered for macro expansion.
    pub expansion_disabled: bool,

    /// The source range of this token.
    pub range: Range,

    /// The kind-discriminated payload.
    pub value: TokenValue<'a>,

    /// Leading trivia, retained only when the lexer is asked to keep it.
    pub trivia: Option<&'a [Trivia]>,
}

impl<'a> Token<'a> {
    /// Returns the text payload, if this token carries one.
    pub fn text(&self) -> Option<&'a [u8]> {
        match self.value {
            TokenValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer payload, if this token carries one.
    pub fn int_value(&self) -> Option<i64> {
        match self.value {
            TokenValue::Int(value) => Some(value),
            _ => None,
        }
    }
}
