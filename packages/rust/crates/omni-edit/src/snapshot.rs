//! Immutable view of the original document.

use std::sync::Arc;

use crate::error::EditError;

/// The document text as it was when a writer session began.
///
/// Cheap to clone; every clone shares the same buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    text: Arc<str>,
}

impl Snapshot {
    /// Capture `text`.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Arc::from(text.into()),
        }
    }

    /// Full text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the document is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Clamp `offset` into `[0, len]`.
    #[must_use]
    pub fn clamp(&self, offset: usize) -> usize {
        offset.min(self.text.len())
    }

    /// Read `count` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// [`EditError::SnapshotOverrun`] when the span extends past the end and
    /// [`EditError::InvalidOffset`] when either end splits a character.
    pub fn read(&self, offset: usize, count: usize) -> Result<&str, EditError> {
        let overrun = EditError::SnapshotOverrun {
            offset,
            count,
            len: self.text.len(),
        };
        let end = offset.checked_add(count).ok_or_else(|| overrun.clone())?;
        if end > self.text.len() {
            return Err(overrun);
        }
        if !self.text.is_char_boundary(offset) {
            return Err(EditError::InvalidOffset(offset));
        }
        self.text.get(offset..end).ok_or(EditError::InvalidOffset(end))
    }

    /// Offset of the first byte of the line containing `offset`.
    #[must_use]
    pub fn line_start(&self, offset: usize) -> usize {
        let offset = self.clamp(offset);
        self.text.as_bytes()[..offset]
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |i| i + 1)
    }

    /// Leading spaces and tabs of the line containing `offset`.
    #[must_use]
    pub fn leading_whitespace(&self, offset: usize) -> &str {
        let start = self.line_start(offset);
        let line = &self.text[start..];
        let width = line
            .bytes()
            .take_while(|&b| b == b' ' || b == b'\t')
            .count();
        &line[..width]
    }
}

impl From<&str> for Snapshot {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for Snapshot {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}
