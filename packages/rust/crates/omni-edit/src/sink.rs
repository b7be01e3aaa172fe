//! Sequential output surface.
//!
//! [`Sink`] is the capability every writer layer implements; decorators such
//! as [`crate::IndentWriter`] and [`crate::EditTrackingWriter`] wrap it.

use crate::error::EditError;

/// A sequential text writing surface with explicit position control.
pub trait Sink {
    /// Write `text` at the current position.
    ///
    /// # Errors
    ///
    /// Returns an error when the sink no longer accepts output.
    fn write(&mut self, text: &str) -> Result<(), EditError>;

    /// Write a line break.
    ///
    /// # Errors
    ///
    /// Returns an error when the sink no longer accepts output.
    fn write_line(&mut self) -> Result<(), EditError>;

    /// Move the write position to `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error when `offset` is not a valid position for this sink.
    fn set_position(&mut self, offset: usize) -> Result<(), EditError>;
}

/// In-memory sink backed by a `String`.
///
/// Writes are inserted at the cursor, which then advances past them.
#[derive(Debug, Clone)]
pub struct StringSink {
    buffer: String,
    position: usize,
    newline: String,
}

impl Default for StringSink {
    fn default() -> Self {
        Self::new()
    }
}

impl StringSink {
    /// Create an empty sink using `\n` line breaks.
    #[must_use]
    pub fn new() -> Self {
        Self::with_newline("\n")
    }

    /// Create an empty sink with a custom line break sequence.
    #[must_use]
    pub fn with_newline(newline: impl Into<String>) -> Self {
        Self {
            buffer: String::new(),
            position: 0,
            newline: newline.into(),
        }
    }

    /// Current contents.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    /// Current cursor offset.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Line break sequence used by [`Sink::write_line`].
    #[must_use]
    pub fn newline(&self) -> &str {
        &self.newline
    }

    /// Take the contents, leaving the sink empty with the cursor at 0.
    pub fn take(&mut self) -> String {
        self.position = 0;
        std::mem::take(&mut self.buffer)
    }
}

impl Sink for StringSink {
    fn write(&mut self, text: &str) -> Result<(), EditError> {
        self.buffer.insert_str(self.position, text);
        self.position += text.len();
        Ok(())
    }

    fn write_line(&mut self) -> Result<(), EditError> {
        let newline = self.newline.clone();
        self.write(&newline)
    }

    fn set_position(&mut self, offset: usize) -> Result<(), EditError> {
        let offset = offset.min(self.buffer.len());
        if !self.buffer.is_char_boundary(offset) {
            return Err(EditError::InvalidOffset(offset));
        }
        self.position = offset;
        Ok(())
    }
}
