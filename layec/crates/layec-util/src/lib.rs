//! layec-util - foundation types for the layec front end.
//!
//! Everything in this crate is stage-agnostic: sources and byte ranges,
//! size and alignment arithmetic, the bump arena that backs interned text,
//! the structured diagnostic engine, and the [`Context`] that bundles them
//! for the stages above.
//!
//! The crate has no opinion about any language; the lexer, preprocessor and
//! parser crates build on these types without this crate knowing about
//! tokens or syntax.

pub mod align;
pub mod arena;
pub mod context;
pub mod diag;
pub mod source;

pub use align::Align;
pub use arena::Arena;
pub use context::Context;
pub use diag::{Collector, Consumer, DiagSink, Diagnostic, Level, Loc, Renderer};
pub use source::{Range, Source, SourceId, SourceMap};
