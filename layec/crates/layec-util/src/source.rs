//! Source text and byte-offset ranges.
//!
//! A [`Source`] is an immutable named buffer of UTF-8 bytes. Sources are
//! registered with a [`SourceMap`], which hands out stable [`SourceId`]s so
//! that ranges and diagnostics can refer to a source without borrowing it.

use std::cell::RefCell;
use std::sync::Arc;

use static_assertions::assert_eq_size;

/// Source text from any language or input origin.
///
/// The text is kept as raw bytes rather than a `str`: the lexer decodes it
/// itself and must keep producing tokens even when the buffer contains byte
/// sequences Rust's `str` type would reject.
///
/// # Examples
///
/// ```
/// use layec_util::Source;
///
/// let source = Source::new("main.c", "int x = 0;", false);
/// assert_eq!(source.name(), "main.c");
/// assert_eq!(source.len(), 10);
/// assert!(!source.is_system());
/// ```
#[derive(Debug)]
pub struct Source {
    /// The name of this source, usually a canonical file path or an
    /// angle-bracketed internal name such as `<command-line>`.
    name: String,

    /// The full text of this source, interpreted as UTF-8.
    text: Vec<u8>,

    /// True if this source is a "system" input whose language rules are
    /// applied more leniently, primarily system C headers.
    is_system: bool,
}

impl Source {
    /// Creates a new source from a name and its text bytes.
    pub fn new(name: impl Into<String>, text: impl Into<Vec<u8>>, is_system: bool) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            is_system,
        }
    }

    /// Returns the name of this source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the full text of this source.
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    /// Returns the length of the text in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Returns true if the text is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Returns true if this is a system source.
    pub fn is_system(&self) -> bool {
        self.is_system
    }

    /// Resolves a byte offset to a 1-based `(line, column)` pair.
    ///
    /// Newlines are counted the way the lexer canonicalizes them: `\n`,
    /// `\r`, `\r\n` and `\n\r` each count as a single line break. The
    /// column is a byte column within the line.
    ///
    /// # Examples
    ///
    /// ```
    /// use layec_util::Source;
    ///
    /// let source = Source::new("demo", "ab\ncd", false);
    /// assert_eq!(source.line_col(0), (1, 1));
    /// assert_eq!(source.line_col(4), (2, 2));
    /// ```
    pub fn line_col(&self, offset: usize) -> (u32, u32) {
        let offset = offset.min(self.text.len());
        let mut line: u32 = 1;
        let mut line_start = 0usize;

        let mut i = 0usize;
        while i < offset {
            let b = self.text[i];
            if b == b'\n' || b == b'\r' {
                let pair = if b == b'\n' { b'\r' } else { b'\n' };
                i += 1;
                if i < offset && self.text[i] == pair {
                    i += 1;
                }
                line += 1;
                line_start = i;
            } else {
                i += 1;
            }
        }

        (line, (offset - line_start) as u32 + 1)
    }
}

/// A unique identifier for a registered [`Source`].
///
/// Ids are assigned sequentially as sources are added to a [`SourceMap`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceId(u32);

impl SourceId {
    /// Returns the raw index value.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Registry of every source participating in a compilation.
///
/// The map owns its sources behind `Arc` so that a lexer can hold on to its
/// source while further sources are registered, which happens whenever the
/// preprocessor resolves an inclusion mid-lex.
///
/// # Examples
///
/// ```
/// use layec_util::SourceMap;
///
/// let sources = SourceMap::new();
/// let id = sources.add("main.c", "int x;", false);
/// assert_eq!(sources.get(id).name(), "main.c");
/// ```
#[derive(Debug, Default)]
pub struct SourceMap {
    sources: RefCell<Vec<Arc<Source>>>,
}

impl SourceMap {
    /// Creates an empty source map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a source and returns its id.
    pub fn add(
        &self,
        name: impl Into<String>,
        text: impl Into<Vec<u8>>,
        is_system: bool,
    ) -> SourceId {
        let mut sources = self.sources.borrow_mut();
        let id = SourceId(sources.len() as u32);
        sources.push(Arc::new(Source::new(name, text, is_system)));
        id
    }

    /// Returns the source registered under `id`.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this map.
    pub fn get(&self, id: SourceId) -> Arc<Source> {
        self.sources.borrow()[id.index()].clone()
    }

    /// Returns the number of registered sources.
    pub fn len(&self) -> usize {
        self.sources.borrow().len()
    }

    /// Returns true if no sources have been registered.
    pub fn is_empty(&self) -> bool {
        self.sources.borrow().is_empty()
    }
}

/// A byte range within the text of a referenced source.
///
/// The invariant `begin <= end <= len` is established by the code producing
/// the range; a range with `begin == end` denotes an insertion point. The
/// byte length of the range is `end - begin`.
///
/// # Examples
///
/// ```
/// use layec_util::{Range, SourceMap};
///
/// let sources = SourceMap::new();
/// let id = sources.add("main.c", "int x;", false);
/// let range = Range::new(id, 0, 3);
/// assert_eq!(range.len(), 3);
/// assert!(range.contains(2));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Range {
    /// The source this range applies to.
    pub source: SourceId,
    /// The beginning byte offset of this range.
    pub begin: usize,
    /// The ending byte offset of this range, exclusive.
    pub end: usize,
}

impl Range {
    /// Creates a new range.
    #[inline]
    pub fn new(source: SourceId, begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end, "range begins after it ends");
        Self { source, begin, end }
    }

    /// Returns the byte length of this range.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.begin
    }

    /// Returns true if this range is an insertion point.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.begin == self.end
    }

    /// Returns true if this range contains the byte offset.
    #[inline]
    pub fn contains(&self, offset: usize) -> bool {
        self.begin <= offset && offset < self.end
    }

    /// Returns the smallest range covering both `self` and `other`.
    ///
    /// Both ranges must refer to the same source.
    pub fn to(&self, other: Range) -> Range {
        debug_assert_eq!(self.source, other.source, "ranges from different sources");
        Range {
            source: self.source,
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
        }
    }
}

assert_eq_size!(SourceId, u32);

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn test_source_basics() {
        let source = Source::new("main.c", "int x;", false);
        assert_eq!(source.name(), "main.c");
        assert_eq!(source.text(), b"int x;");
        assert_eq!(source.len(), 6);
        assert!(!source.is_empty());
        assert!(!source.is_system());
    }

    #[test]
    fn test_source_empty() {
        let source = Source::new("<empty>", "", true);
        assert!(source.is_empty());
        assert!(source.is_system());
    }

    #[test]
    fn test_line_col_single_line() {
        let source = Source::new("demo", "hello", false);
        assert_eq!(source.line_col(0), (1, 1));
        assert_eq!(source.line_col(4), (1, 5));
    }

    #[test]
    fn test_line_col_lf() {
        let source = Source::new("demo", "ab\ncd\nef", false);
        assert_eq!(source.line_col(3), (2, 1));
        assert_eq!(source.line_col(7), (3, 2));
    }

    #[test]
    fn test_line_col_crlf_counts_once() {
        let source = Source::new("demo", "ab\r\ncd", false);
        assert_eq!(source.line_col(4), (2, 1));
        assert_eq!(source.line_col(5), (2, 2));
    }

    #[test]
    fn test_line_col_cr_only() {
        let source = Source::new("demo", "ab\rcd", false);
        assert_eq!(source.line_col(3), (2, 1));
    }

    #[test]
    fn test_line_col_past_end_clamps() {
        let source = Source::new("demo", "ab", false);
        assert_eq!(source.line_col(100), (1, 3));
    }

    #[test]
    fn test_source_map_ids() {
        let sources = SourceMap::new();
        let a = sources.add("a.c", "a", false);
        let b = sources.add("b.c", "b", true);
        assert_ne!(a, b);
        assert_eq!(sources.len(), 2);
        assert_eq!(sources.get(a).name(), "a.c");
        assert!(sources.get(b).is_system());
    }

    #[test]
    fn test_source_map_shared_handles() {
        let sources = SourceMap::new();
        let id = sources.add("a.c", "abc", false);
        let first = sources.get(id);
        let second = sources.get(id);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_range_basics() {
        let sources = SourceMap::new();
        let id = sources.add("a.c", "abcdef", false);
        let range = Range::new(id, 1, 4);
        assert_eq!(range.len(), 3);
        assert!(!range.is_empty());
        assert!(range.contains(1));
        assert!(range.contains(3));
        assert!(!range.contains(4));
    }

    #[test]
    fn test_range_insertion_point() {
        let sources = SourceMap::new();
        let id = sources.add("a.c", "abc", false);
        let range = Range::new(id, 2, 2);
        assert!(range.is_empty());
        assert_eq!(range.len(), 0);
        assert!(!range.contains(2));
    }

    #[test]
    fn test_range_to() {
        let sources = SourceMap::new();
        let id = sources.add("a.c", "abcdef", false);
        let merged = Range::new(id, 1, 2).to(Range::new(id, 4, 6));
        assert_eq!(merged, Range::new(id, 1, 6));
    }

    #[quickcheck]
    fn prop_line_col_is_one_based(text: String, offset: usize) -> bool {
        let source = Source::new("prop", text, false);
        let (line, col) = source.line_col(offset);
        line >= 1 && col >= 1
    }

    #[quickcheck]
    fn prop_line_col_monotonic_lines(text: String) -> bool {
        let source = Source::new("prop", text, false);
        let mut prev_line = 0u32;
        for offset in 0..=source.len() {
            let (line, _) = source.line_col(offset);
            if line < prev_line {
                return false;
            }
            prev_line = line;
        }
        true
    }
}
