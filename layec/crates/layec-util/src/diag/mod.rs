//! Structured diagnostics.
//!
//! Diagnostics are delivered in *groups*: a primary record followed by the
//! notes attached to it. The [`DiagSink`] buffers the open group and hands
//! it to a [`Consumer`] whole, so a renderer never sees half a cohort.
//!
//! The sink also enforces the error limit. When a limit is configured and
//! reached, one synthetic record announces the fact and every further
//! error is dropped silently. A [`Level::Fatal`] record flushes what is
//! buffered and aborts the process; there is no unwinding past a fatal
//! diagnostic.

mod render;

pub use render::Renderer;

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::source::Source;

/// Diagnostic severity.
///
/// # Examples
///
/// ```
/// use layec_util::Level;
///
/// assert_eq!(format!("{}", Level::Error), "error");
/// assert!(Level::Fatal > Level::Warning);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// A diagnostic the active configuration has turned off. Not stored;
    /// notes attached to an ignored diagnostic are dropped with it.
    Ignore,
    /// Additional information attached to the previous diagnostic.
    Note,
    /// An observation that is neither a warning nor an error.
    Remark,
    /// A problem that does not prevent compilation.
    Warning,
    /// A problem that prevents compilation from succeeding.
    Error,
    /// A problem the compiler cannot continue past. Aborts the process.
    Fatal,
}

impl Level {
    /// Returns the display name of this level.
    pub fn name(self) -> &'static str {
        match self {
            Level::Ignore => "ignored",
            Level::Note => "note",
            Level::Remark => "remark",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Fatal => "fatal",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A resolved source position carried by a diagnostic.
///
/// The position is primarily a byte offset; a `(line, column)` pair is
/// attached when the emitter resolved one, and renderers prefer it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Loc {
    /// Name of the source, usually a file path.
    pub name: String,
    /// Byte offset into the source text.
    pub byte: usize,
    /// 1-based line and column, when resolved.
    pub line_col: Option<(u32, u32)>,
}

impl Loc {
    /// A location carrying only a byte offset.
    pub fn at(source: &Source, byte: usize) -> Loc {
        Loc {
            name: source.name().to_string(),
            byte,
            line_col: None,
        }
    }

    /// A location with the line and column resolved from the source text.
    pub fn resolved(source: &Source, byte: usize) -> Loc {
        Loc {
            name: source.name().to_string(),
            byte,
            line_col: Some(source.line_col(byte)),
        }
    }
}

/// A single diagnostic record.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    /// Severity of this record.
    pub level: Level,
    /// Source position, if the diagnostic points at one.
    pub loc: Option<Loc>,
    /// The message body. May span multiple lines.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic record.
    pub fn new(level: Level, loc: Option<Loc>, message: impl Into<String>) -> Self {
        Self {
            level,
            loc,
            message: message.into(),
        }
    }
}

/// Receives completed diagnostic groups.
///
/// The slice is a primary diagnostic followed by its notes. Implementations
/// must not assume they see every diagnostic ever emitted: ignored records
/// and errors past the limit never reach the consumer.
pub trait Consumer {
    /// Called once per completed group.
    fn group(&mut self, group: &[Diagnostic]);
}

/// A [`Consumer`] that stores groups in memory.
///
/// Handles are cheaply cloneable and share the same storage, so one can be
/// kept for inspection after another has been moved into the sink.
///
/// # Examples
///
/// ```
/// use layec_util::{Collector, DiagSink, Diagnostic, Level};
///
/// let collector = Collector::new();
/// let sink = DiagSink::new(collector.clone());
/// sink.emit(Diagnostic::new(Level::Warning, None, "something odd"));
/// sink.flush();
/// assert_eq!(collector.groups().len(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Collector {
    groups: Rc<RefCell<Vec<Vec<Diagnostic>>>>,
}

impl Collector {
    /// Creates an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns every group delivered so far.
    pub fn groups(&self) -> Vec<Vec<Diagnostic>> {
        self.groups.borrow().clone()
    }

    /// Returns every delivered message, flattened across groups.
    pub fn messages(&self) -> Vec<String> {
        self.groups
            .borrow()
            .iter()
            .flatten()
            .map(|d| d.message.clone())
            .collect()
    }
}

impl Consumer for Collector {
    fn group(&mut self, group: &[Diagnostic]) {
        self.groups.borrow_mut().push(group.to_vec());
    }
}

struct SinkState {
    consumer: Option<Box<dyn Consumer>>,
    group: Vec<Diagnostic>,
    error_count: usize,
    error_limit: usize,
    reported_error_limit: bool,
    last_was_ignored: bool,
}

impl SinkState {
    fn flush(&mut self) {
        if self.group.is_empty() {
            return;
        }
        if let Some(consumer) = self.consumer.as_mut() {
            consumer.group(&self.group);
        }
        self.group.clear();
    }
}

/// Collects diagnostic records into groups and delivers them.
///
/// # Examples
///
/// ```
/// use layec_util::{Collector, DiagSink, Diagnostic, Level};
///
/// let collector = Collector::new();
/// let sink = DiagSink::new(collector.clone());
///
/// sink.emit(Diagnostic::new(Level::Error, None, "bad token"));
/// sink.emit(Diagnostic::new(Level::Note, None, "while scanning a literal"));
/// sink.flush();
///
/// let groups = collector.groups();
/// assert_eq!(groups.len(), 1);
/// assert_eq!(groups[0].len(), 2);
/// assert_eq!(sink.error_count(), 1);
/// ```
pub struct DiagSink {
    state: RefCell<SinkState>,
}

impl DiagSink {
    /// Creates a sink delivering groups to `consumer`.
    pub fn new(consumer: impl Consumer + 'static) -> Self {
        Self {
            state: RefCell::new(SinkState {
                consumer: Some(Box::new(consumer)),
                group: Vec::new(),
                error_count: 0,
                error_limit: 0,
                reported_error_limit: false,
                last_was_ignored: false,
            }),
        }
    }

    /// Creates a sink that counts but never delivers anything.
    pub fn silent() -> Self {
        Self {
            state: RefCell::new(SinkState {
                consumer: None,
                group: Vec::new(),
                error_count: 0,
                error_limit: 0,
                reported_error_limit: false,
                last_was_ignored: false,
            }),
        }
    }

    /// Sets the error limit. Zero means unlimited.
    pub fn set_error_limit(&self, limit: usize) {
        self.state.borrow_mut().error_limit = limit;
    }

    /// Submits a diagnostic record.
    ///
    /// Notes join the open group; any other level flushes the open group
    /// first. `Fatal` flushes and aborts the process.
    pub fn emit(&self, diag: Diagnostic) {
        let mut state = self.state.borrow_mut();

        if diag.level != Level::Note {
            state.flush();
        }

        if diag.level == Level::Error
            && state.error_limit > 0
            && state.error_count >= state.error_limit
        {
            if !state.reported_error_limit {
                state.reported_error_limit = true;
                let synthetic = Diagnostic::new(
                    Level::Error,
                    None,
                    "too many errors emitted, stopping now",
                );
                state.group.push(synthetic);
                state.flush();
            }
            return;
        }

        if diag.level == Level::Ignore {
            state.last_was_ignored = true;
            return;
        }

        if diag.level == Level::Note && state.last_was_ignored {
            // notes attach only to diagnostics that were actually kept.
            return;
        }

        if diag.level >= Level::Error {
            state.error_count += 1;
        }

        state.last_was_ignored = false;
        let is_fatal = diag.level == Level::Fatal;
        state.group.push(diag);

        if is_fatal {
            state.flush();
            drop(state);
            std::process::abort();
        }
    }

    /// Emits a fatal diagnostic. Never returns.
    pub fn fatal(&self, loc: Option<Loc>, message: impl Into<String>) -> ! {
        self.emit(Diagnostic::new(Level::Fatal, loc, message));
        unreachable!("fatal diagnostics abort the process");
    }

    /// Convenience emitter for an error at a location.
    pub fn error(&self, loc: Loc, message: impl Into<String>) {
        self.emit(Diagnostic::new(Level::Error, Some(loc), message));
    }

    /// Convenience emitter for a warning at a location.
    pub fn warning(&self, loc: Loc, message: impl Into<String>) {
        self.emit(Diagnostic::new(Level::Warning, Some(loc), message));
    }

    /// Convenience emitter for a note attached to the previous diagnostic.
    pub fn note(&self, loc: Option<Loc>, message: impl Into<String>) {
        self.emit(Diagnostic::new(Level::Note, loc, message));
    }

    /// Delivers the open group, if any.
    pub fn flush(&self) {
        self.state.borrow_mut().flush();
    }

    /// Returns the number of errors kept so far. Errors converted or
    /// dropped once the limit is reached are not counted.
    pub fn error_count(&self) -> usize {
        self.state.borrow().error_count
    }

    /// Returns true if any error has been submitted.
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }
}

impl Drop for DiagSink {
    fn drop(&mut self) {
        self.state.borrow_mut().flush();
    }
}

impl fmt::Debug for DiagSink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("DiagSink")
            .field("error_count", &state.error_count)
            .field("error_limit", &state.error_limit)
            .field("buffered", &state.group.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sink_with_collector() -> (DiagSink, Collector) {
        let collector = Collector::new();
        let sink = DiagSink::new(collector.clone());
        (sink, collector)
    }

    #[test]
    fn test_notes_join_the_open_group() {
        let (sink, collector) = sink_with_collector();
        sink.emit(Diagnostic::new(Level::Error, None, "primary"));
        sink.emit(Diagnostic::new(Level::Note, None, "first note"));
        sink.emit(Diagnostic::new(Level::Note, None, "second note"));
        sink.flush();

        let groups = collector.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 3);
        assert_eq!(groups[0][0].message, "primary");
        assert_eq!(groups[0][2].message, "second note");
    }

    #[test]
    fn test_non_note_starts_a_new_group() {
        let (sink, collector) = sink_with_collector();
        sink.emit(Diagnostic::new(Level::Error, None, "first"));
        sink.emit(Diagnostic::new(Level::Warning, None, "second"));
        sink.flush();

        let groups = collector.groups();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0][0].message, "first");
        assert_eq!(groups[1][0].message, "second");
    }

    #[test]
    fn test_ignored_diagnostic_swallows_its_notes() {
        let (sink, collector) = sink_with_collector();
        sink.emit(Diagnostic::new(Level::Ignore, None, "off"));
        sink.emit(Diagnostic::new(Level::Note, None, "attached to ignored"));
        sink.emit(Diagnostic::new(Level::Error, None, "real"));
        sink.emit(Diagnostic::new(Level::Note, None, "attached to real"));
        sink.flush();

        let groups = collector.groups();
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);
        assert_eq!(groups[0][0].message, "real");
    }

    #[test]
    fn test_error_count() {
        let (sink, _collector) = sink_with_collector();
        assert!(!sink.has_errors());
        sink.emit(Diagnostic::new(Level::Warning, None, "w"));
        assert!(!sink.has_errors());
        sink.emit(Diagnostic::new(Level::Error, None, "e1"));
        sink.emit(Diagnostic::new(Level::Error, None, "e2"));
        assert_eq!(sink.error_count(), 2);
    }

    #[test]
    fn test_error_limit_reports_once_then_drops() {
        let (sink, collector) = sink_with_collector();
        sink.set_error_limit(2);
        sink.emit(Diagnostic::new(Level::Error, None, "e1"));
        sink.emit(Diagnostic::new(Level::Error, None, "e2"));
        sink.emit(Diagnostic::new(Level::Error, None, "e3"));
        sink.emit(Diagnostic::new(Level::Error, None, "e4"));
        sink.flush();

        let messages = collector.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0], "e1");
        assert_eq!(messages[1], "e2");
        assert!(messages[2].contains("too many errors"));
    }

    #[test]
    fn test_zero_limit_is_unlimited() {
        let (sink, collector) = sink_with_collector();
        for i in 0..100 {
            sink.emit(Diagnostic::new(Level::Error, None, format!("e{i}")));
        }
        sink.flush();
        assert_eq!(collector.messages().len(), 100);
        assert_eq!(sink.error_count(), 100);
    }

    #[test]
    fn test_drop_flushes() {
        let collector = Collector::new();
        {
            let sink = DiagSink::new(collector.clone());
            sink.emit(Diagnostic::new(Level::Error, None, "buffered"));
        }
        assert_eq!(collector.messages(), vec!["buffered".to_string()]);
    }

    #[test]
    fn test_silent_sink_still_counts() {
        let sink = DiagSink::silent();
        sink.emit(Diagnostic::new(Level::Error, None, "nobody hears this"));
        assert_eq!(sink.error_count(), 1);
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Ignore < Level::Note);
        assert!(Level::Note < Level::Remark);
        assert!(Level::Remark < Level::Warning);
        assert!(Level::Warning < Level::Error);
        assert!(Level::Error < Level::Fatal);
    }
}
