//! The shared compilation context.

use std::sync::Arc;

use crate::arena::Arena;
use crate::diag::DiagSink;
use crate::source::{Source, SourceId, SourceMap};

/// Bundles the state every compilation stage needs a reference to: the
/// source registry, the string arena, and the diagnostic sink.
///
/// A context is single-threaded; independent compilations on separate
/// threads each own their own.
///
/// # Examples
///
/// ```
/// use layec_util::{Context, DiagSink};
///
/// let context = Context::new(DiagSink::silent());
/// let id = context.add_source("main.c", "int x;", false);
/// assert_eq!(context.sources().get(id).name(), "main.c");
/// ```
#[derive(Debug)]
pub struct Context {
    sources: SourceMap,
    arena: Arena,
    diag: DiagSink,
}

impl Context {
    /// Creates a context with an empty source map and a fresh arena.
    pub fn new(diag: DiagSink) -> Self {
        Self {
            sources: SourceMap::new(),
            arena: Arena::new(),
            diag,
        }
    }

    /// Returns the source registry.
    pub fn sources(&self) -> &SourceMap {
        &self.sources
    }

    /// Returns the string arena.
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    /// Returns the diagnostic sink.
    pub fn diag(&self) -> &DiagSink {
        &self.diag
    }

    /// Registers a source, returning its id.
    pub fn add_source(
        &self,
        name: impl Into<String>,
        text: impl Into<Vec<u8>>,
        is_system: bool,
    ) -> SourceId {
        self.sources.add(name, text, is_system)
    }

    /// Returns the source registered under `id`.
    pub fn source(&self, id: SourceId) -> Arc<Source> {
        self.sources.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::{Diagnostic, Level};

    #[test]
    fn test_context_owns_its_pieces() {
        let context = Context::new(DiagSink::silent());
        let id = context.add_source("a.c", "abc", false);
        assert_eq!(context.source(id).text(), b"abc");

        let interned = context.arena().intern_bytes(b"abc");
        assert_eq!(interned, b"abc");

        context
            .diag()
            .emit(Diagnostic::new(Level::Error, None, "x"));
        assert!(context.diag().has_errors());
    }
}
