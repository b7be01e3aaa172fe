//! Fluent writer for chained method calls.

use omni_edit::{EditError, Sink};

use crate::writer::ScriptWriter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ChainState {
    Idle,
    MethodOpen {
        depth: usize,
        on_new_lines: bool,
        arguments: usize,
    },
}

/// Writes `.Method(args).Next(args)` after an expression.
///
/// At most one call is open at a time. Closing a call restores the indent
/// depth it opened at. A chain dropped without [`complete`](Self::complete)
/// leaves its last call open.
///
/// ```rust,ignore
/// writer.write_variable("names")?;
/// writer
///     .method_chain()
///     .method("Where")?
///     .argument_text("{ $_ }")?
///     .method("ToArray")?
///     .complete()?;
/// // $names.Where({ $_ }).ToArray()
/// ```
#[derive(Debug)]
pub struct MethodChainWriter<'w> {
    writer: &'w mut ScriptWriter,
    state: ChainState,
}

impl<'w> MethodChainWriter<'w> {
    pub(crate) fn new(writer: &'w mut ScriptWriter) -> Self {
        Self {
            writer,
            state: ChainState::Idle,
        }
    }

    /// Whether a call is currently open.
    pub fn is_open(&self) -> bool {
        matches!(self.state, ChainState::MethodOpen { .. })
    }

    /// Close the open call, if any, and open `.name(`.
    ///
    /// # Errors
    ///
    /// Fails when the writer rejects output.
    pub fn method(&mut self, name: &str) -> Result<&mut Self, EditError> {
        self.open_call(".", name)
    }

    /// Close the open call, if any, and open `::name(`.
    ///
    /// # Errors
    ///
    /// Fails when the writer rejects output.
    pub fn static_method(&mut self, name: &str) -> Result<&mut Self, EditError> {
        self.open_call("::", name)
    }

    /// Put each argument of the open call on its own indented line.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidState`] when no call is open or it already has
    /// arguments.
    pub fn arguments_on_new_lines(&mut self) -> Result<&mut Self, EditError> {
        match self.state {
            ChainState::MethodOpen {
                depth,
                on_new_lines: false,
                arguments: 0,
            } => {
                self.writer.push_indent();
                self.writer.write_line()?;
                self.state = ChainState::MethodOpen {
                    depth,
                    on_new_lines: true,
                    arguments: 0,
                };
                Ok(self)
            }
            ChainState::MethodOpen { .. } => Err(EditError::InvalidState(
                "argument layout must be chosen before the first argument",
            )),
            ChainState::Idle => Err(EditError::InvalidState("no open method call")),
        }
    }

    /// Write one argument through `write`.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidState`] when no call is open, or the error from
    /// `write`.
    pub fn argument<F>(&mut self, write: F) -> Result<&mut Self, EditError>
    where
        F: FnOnce(&mut ScriptWriter) -> Result<(), EditError>,
    {
        self.separate_argument()?;
        write(&mut *self.writer)?;
        Ok(self)
    }

    /// Write one argument as plain text.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidState`] when no call is open.
    pub fn argument_text(&mut self, text: &str) -> Result<&mut Self, EditError> {
        self.argument(|writer| writer.write(text))
    }

    /// Write several plain-text arguments.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidState`] when no call is open.
    pub fn arguments<'a, I>(&mut self, texts: I) -> Result<&mut Self, EditError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        for text in texts {
            self.argument_text(text)?;
        }
        Ok(self)
    }

    /// Close the final call.
    ///
    /// # Errors
    ///
    /// [`EditError::InvalidState`] when no call is open.
    pub fn complete(&mut self) -> Result<(), EditError> {
        if !self.is_open() {
            return Err(EditError::InvalidState("no open method call"));
        }
        self.close_call()
    }

    fn open_call(&mut self, separator: &str, name: &str) -> Result<&mut Self, EditError> {
        self.close_call()?;
        self.writer.write(separator)?;
        self.writer.write(name)?;
        self.writer.write("(")?;
        self.state = ChainState::MethodOpen {
            depth: self.writer.indent_depth(),
            on_new_lines: false,
            arguments: 0,
        };
        Ok(self)
    }

    fn separate_argument(&mut self) -> Result<(), EditError> {
        let ChainState::MethodOpen {
            depth,
            on_new_lines,
            arguments,
        } = self.state
        else {
            return Err(EditError::InvalidState("no open method call"));
        };
        if arguments > 0 {
            self.writer.write(",")?;
            if on_new_lines {
                self.writer.write_line()?;
            } else {
                self.writer.write(" ")?;
            }
        }
        self.state = ChainState::MethodOpen {
            depth,
            on_new_lines,
            arguments: arguments + 1,
        };
        Ok(())
    }

    fn close_call(&mut self) -> Result<(), EditError> {
        if let ChainState::MethodOpen {
            depth,
            on_new_lines,
            ..
        } = self.state
        {
            if on_new_lines {
                self.writer.write_line()?;
                self.writer.restore_indent_depth(depth)?;
            }
            self.writer.write(")")?;
            self.state = ChainState::Idle;
        }
        Ok(())
    }
}
