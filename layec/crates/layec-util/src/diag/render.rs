//! Human-readable diagnostic rendering.
//!
//! Each group is drawn inside a "well", the decorated left gutter that ties
//! a primary diagnostic to its notes:
//!
//! ```text
//! ╭─[error] @main.c(3,5)
//! │ Invalid character in source text.
//! ├─[note]
//! │ while scanning a literal
//! ╰─
//! ```
//!
//! Groups are separated by a blank line. Color is optional ANSI.

use std::io::{self, Write};

use super::{Consumer, Diagnostic, Level};

/// Writes diagnostic groups as text.
///
/// # Examples
///
/// ```
/// use layec_util::{DiagSink, Diagnostic, Level, Renderer};
///
/// let sink = DiagSink::new(Renderer::new(Vec::new(), false));
/// sink.emit(Diagnostic::new(Level::Warning, None, "odd but legal"));
/// sink.flush();
/// ```
pub struct Renderer<W: Write> {
    out: W,
    colors: bool,
}

impl<W: Write> Renderer<W> {
    /// Creates a renderer writing to `out`, with or without ANSI color.
    pub fn new(out: W, colors: bool) -> Self {
        Self { out, colors }
    }

    /// Consumes the renderer and returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn level_color(level: Level) -> &'static str {
        match level {
            Level::Ignore => "\x1b[90m",
            Level::Note => "\x1b[36m",
            Level::Remark => "\x1b[35m",
            Level::Warning => "\x1b[33m",
            Level::Error => "\x1b[31m",
            Level::Fatal => "\x1b[1;31m",
        }
    }

    fn write_group(&mut self, group: &[Diagnostic]) -> io::Result<()> {
        for (index, diag) in group.iter().enumerate() {
            let gutter = if index == 0 { "╭─" } else { "├─" };

            write!(self.out, "{gutter}[")?;
            if self.colors {
                write!(self.out, "{}{}\x1b[0m", Self::level_color(diag.level), diag.level)?;
            } else {
                write!(self.out, "{}", diag.level)?;
            }
            write!(self.out, "]")?;

            if let Some(loc) = &diag.loc {
                match loc.line_col {
                    Some((line, col)) => write!(self.out, " @{}({line},{col})", loc.name)?,
                    None => write!(self.out, " @{}[{}]", loc.name, loc.byte)?,
                }
            }
            writeln!(self.out)?;

            for line in diag.message.lines() {
                writeln!(self.out, "│ {line}")?;
            }
        }
        writeln!(self.out, "╰─")?;
        writeln!(self.out)?;
        self.out.flush()
    }
}

impl Renderer<io::Stderr> {
    /// A renderer writing to standard error.
    pub fn stderr(colors: bool) -> Self {
        Self::new(io::stderr(), colors)
    }
}

impl<W: Write> Consumer for Renderer<W> {
    fn group(&mut self, group: &[Diagnostic]) {
        // rendering is best effort; a broken pipe must not take the
        // compiler down with it.
        let _ = self.write_group(group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Loc;
    use crate::source::Source;

    fn render(group: &[Diagnostic], colors: bool) -> String {
        let mut renderer = Renderer::new(Vec::new(), colors);
        renderer.group(group);
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn test_single_diagnostic() {
        let out = render(
            &[Diagnostic::new(Level::Error, None, "something broke")],
            false,
        );
        assert_eq!(out, "╭─[error]\n│ something broke\n╰─\n\n");
    }

    #[test]
    fn test_group_gutter_shapes() {
        let out = render(
            &[
                Diagnostic::new(Level::Error, None, "primary"),
                Diagnostic::new(Level::Note, None, "detail"),
            ],
            false,
        );
        assert!(out.starts_with("╭─[error]"));
        assert!(out.contains("├─[note]"));
        assert!(out.ends_with("╰─\n\n"));
    }

    #[test]
    fn test_byte_offset_decoration() {
        let source = Source::new("main.c", "int x;", false);
        let out = render(
            &[Diagnostic::new(
                Level::Warning,
                Some(Loc::at(&source, 4)),
                "suspicious",
            )],
            false,
        );
        assert!(out.contains("@main.c[4]"));
    }

    #[test]
    fn test_line_col_decoration() {
        let source = Source::new("main.c", "int\nx;", false);
        let out = render(
            &[Diagnostic::new(
                Level::Error,
                Some(Loc::resolved(&source, 4)),
                "bad",
            )],
            false,
        );
        assert!(out.contains("@main.c(2,1)"));
    }

    #[test]
    fn test_multi_line_message() {
        let out = render(
            &[Diagnostic::new(Level::Error, None, "first line\nsecond line")],
            false,
        );
        assert!(out.contains("│ first line\n│ second line\n"));
    }

    #[test]
    fn test_colors_wrap_the_level_name() {
        let out = render(&[Diagnostic::new(Level::Error, None, "x")], true);
        assert!(out.contains("\x1b[31merror\x1b[0m"));
    }
}
