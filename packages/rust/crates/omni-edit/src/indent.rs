//! Lazy indentation decorator.
//!
//! Indentation is recorded at each line break and only written in front of
//! the next non-empty segment, so blank lines never carry trailing
//! whitespace.

use crate::error::EditError;
use crate::sink::Sink;

const TAB_COLUMNS: usize = 4;

/// Wraps a [`Sink`] and indents every line written through it.
#[derive(Debug)]
pub struct IndentWriter<S> {
    inner: S,
    indent_text: String,
    level: usize,
    stack: Vec<usize>,
    pending_indent: bool,
}

impl<S: Sink> IndentWriter<S> {
    /// Wrap `inner`, indenting one `indent_text` per level.
    pub fn new(inner: S, indent_text: impl Into<String>) -> Self {
        Self {
            inner,
            indent_text: indent_text.into(),
            level: 0,
            stack: Vec::new(),
            pending_indent: false,
        }
    }

    /// The wrapped sink.
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// The wrapped sink, mutably. Writes made directly are not indented.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.inner
    }

    /// Unwrap the decorator.
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Current indent level.
    pub fn level(&self) -> usize {
        self.level
    }

    /// Number of pushes not yet popped.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Text written once per indent level.
    pub fn indent_text(&self) -> &str {
        &self.indent_text
    }

    /// Width in columns of the current indentation.
    pub fn indent_columns(&self) -> usize {
        columns(&self.indent_text) * self.level
    }

    /// Whether the next non-empty write starts a new line.
    pub fn at_line_start(&self) -> bool {
        self.pending_indent
    }

    /// Indent one level deeper.
    pub fn push_indent(&mut self) {
        self.stack.push(self.level);
        self.level += 1;
    }

    /// Restore the level saved by the matching [`push_indent`](Self::push_indent).
    ///
    /// # Errors
    ///
    /// [`EditError::UnbalancedIndent`] when nothing was pushed.
    pub fn pop_indent(&mut self) -> Result<(), EditError> {
        self.level = self.stack.pop().ok_or(EditError::UnbalancedIndent)?;
        Ok(())
    }

    /// Pop until exactly `depth` pushes remain.
    ///
    /// # Errors
    ///
    /// [`EditError::UnbalancedIndent`] when fewer than `depth` pushes exist.
    pub fn restore_depth(&mut self, depth: usize) -> Result<(), EditError> {
        if depth > self.stack.len() {
            return Err(EditError::UnbalancedIndent);
        }
        while self.stack.len() > depth {
            self.pop_indent()?;
        }
        Ok(())
    }

    /// Set the base level from existing leading whitespace.
    ///
    /// Tabs count as four columns. Partial levels round down.
    pub fn align_to(&mut self, whitespace: &str) {
        let unit = columns(&self.indent_text);
        self.level = if unit == 0 {
            0
        } else {
            columns(whitespace) / unit
        };
    }

    /// Write `text` without indenting any of its lines.
    ///
    /// Embedded line breaks use the wrapped sink's newline.
    ///
    /// # Errors
    ///
    /// Propagates errors from the wrapped sink.
    pub fn write_raw(&mut self, text: &str) -> Result<(), EditError> {
        self.flush_indent()?;
        let mut lines = split_lines(text);
        if let Some(first) = lines.next() {
            self.inner.write(first)?;
        }
        for line in lines {
            self.inner.write_line()?;
            self.inner.write(line)?;
        }
        Ok(())
    }

    fn flush_indent(&mut self) -> Result<(), EditError> {
        if self.pending_indent {
            self.pending_indent = false;
            for _ in 0..self.level {
                self.inner.write(&self.indent_text)?;
            }
        }
        Ok(())
    }

    fn write_segment(&mut self, segment: &str) -> Result<(), EditError> {
        if segment.is_empty() {
            return Ok(());
        }
        self.flush_indent()?;
        self.inner.write(segment)
    }
}

impl<S: Sink> Sink for IndentWriter<S> {
    fn write(&mut self, text: &str) -> Result<(), EditError> {
        let mut lines = split_lines(text);
        if let Some(first) = lines.next() {
            self.write_segment(first)?;
        }
        for line in lines {
            self.inner.write_line()?;
            self.pending_indent = true;
            self.write_segment(line)?;
        }
        Ok(())
    }

    fn write_line(&mut self) -> Result<(), EditError> {
        self.inner.write_line()?;
        self.pending_indent = true;
        Ok(())
    }

    fn set_position(&mut self, offset: usize) -> Result<(), EditError> {
        self.inner.set_position(offset)?;
        self.pending_indent = false;
        Ok(())
    }
}

/// Segments between line breaks, each without a trailing `\r`.
fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line))
}

fn columns(text: &str) -> usize {
    text.chars()
        .map(|c| if c == '\t' { TAB_COLUMNS } else { 1 })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::StringSink;

    fn writer() -> IndentWriter<StringSink> {
        IndentWriter::new(StringSink::new(), "    ")
    }

    #[test]
    fn test_blank_lines_not_indented() {
        let mut w = writer();
        w.write("{").expect("write");
        w.push_indent();
        w.write_line().expect("line");
        w.write_line().expect("line");
        w.write("x").expect("write");
        w.pop_indent().expect("pop");
        w.write_line().expect("line");
        w.write("}").expect("write");
        assert_eq!(w.inner().as_str(), "{\n\n    x\n}");
    }

    #[test]
    fn test_embedded_newlines_indented() {
        let mut w = writer();
        w.push_indent();
        w.write_line().expect("line");
        w.write("a\nb\n\nc").expect("write");
        assert_eq!(w.inner().as_str(), "\n    a\n    b\n\n    c");
    }

    #[test]
    fn test_raw_write_skips_indent() {
        let mut w = writer();
        w.push_indent();
        w.write_line().expect("line");
        w.write("@'").expect("write");
        w.write_raw("\ntext\n'@").expect("raw");
        assert_eq!(w.inner().as_str(), "\n    @'\ntext\n'@");
    }

    #[test]
    fn test_embedded_breaks_use_sink_newline() {
        let mut w = IndentWriter::new(StringSink::with_newline("\r\n"), "    ");
        w.push_indent();
        w.write_line().expect("line");
        w.write("a\nb\r\nc").expect("write");
        w.write_raw("\nd\r\n").expect("raw");
        assert_eq!(w.inner().as_str(), "\r\n    a\r\n    b\r\n    c\r\nd\r\n");
    }

    #[test]
    fn test_unbalanced_pop() {
        let mut w = writer();
        assert_eq!(w.pop_indent(), Err(EditError::UnbalancedIndent));
        w.push_indent();
        w.push_indent();
        w.restore_depth(0).expect("restore");
        assert_eq!(w.level(), 0);
        assert_eq!(w.restore_depth(1), Err(EditError::UnbalancedIndent));
    }

    #[test]
    fn test_align_to_existing_whitespace() {
        let mut w = writer();
        w.align_to("\t    ");
        assert_eq!(w.level(), 2);
        w.align_to("   ");
        assert_eq!(w.level(), 0);
    }
}
