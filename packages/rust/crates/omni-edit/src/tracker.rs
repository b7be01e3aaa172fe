//! Edit-tracking writer.
//!
//! Callers write the text they want the document to contain, seeking
//! forward over the parts they keep. Every run of output between two seeks
//! becomes one [`DocumentEdit`] against the original snapshot.
//!
//! Offsets are always in the snapshot's coordinate space: writing new text
//! never moves the position, only seeks do.

use tracing::{debug, trace, warn};

use crate::error::EditError;
use crate::reduce::reduce_edits;
use crate::sink::{Sink, StringSink};
use crate::snapshot::Snapshot;
use crate::types::DocumentEdit;

/// Converts sequential output into edits against an original document.
///
/// Single-threaded: one refactor computation owns one writer.
///
/// # Example
///
/// ```rust
/// use omni_edit::{EditTrackingWriter, Sink};
///
/// let mut writer = EditTrackingWriter::new("Get-Item $path");
/// writer.start_writing(0, 8).unwrap();
/// writer.write("Get-ChildItem").unwrap();
/// writer.finish_writing().unwrap();
///
/// let edits = writer.edits().unwrap();
/// assert_eq!(edits.len(), 1);
/// assert_eq!(edits[0].original_value, "Get-Item");
/// ```
#[derive(Debug)]
pub struct EditTrackingWriter {
    file_name: String,
    snapshot: Snapshot,
    last_position_set: usize,
    pending: StringSink,
    implicit_overwrite: usize,
    unreduced: Vec<DocumentEdit>,
    edit_counter: u64,
    closed: bool,
}

impl EditTrackingWriter {
    /// Start a session over `document`.
    #[must_use]
    pub fn new(document: impl Into<Snapshot>) -> Self {
        Self {
            file_name: String::new(),
            snapshot: document.into(),
            last_position_set: 0,
            pending: StringSink::new(),
            implicit_overwrite: 0,
            unreduced: Vec::new(),
            edit_counter: 0,
            closed: false,
        }
    }

    /// Set the file name stamped onto every edit.
    #[must_use]
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = file_name.into();
        self
    }

    /// Change the file name stamped onto edits created from now on.
    pub fn set_file_name(&mut self, file_name: impl Into<String>) {
        self.file_name = file_name.into();
    }

    /// Set the line break written by [`Sink::write_line`].
    #[must_use]
    pub fn with_newline(mut self, newline: impl Into<String>) -> Self {
        self.pending = StringSink::with_newline(newline);
        self
    }

    /// File name stamped onto edits.
    #[must_use]
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// The original document.
    #[must_use]
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Offset in the original document where the next edit begins.
    #[must_use]
    pub fn position(&self) -> usize {
        self.last_position_set
    }

    /// Line break written by [`Sink::write_line`].
    #[must_use]
    pub fn newline(&self) -> &str {
        self.pending.newline()
    }

    /// Output written since the last seek.
    #[must_use]
    pub fn pending_output(&self) -> &str {
        self.pending.as_str()
    }

    /// Whether the writer has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Edits created so far, before reduction.
    #[must_use]
    pub fn unreduced_edits(&self) -> &[DocumentEdit] {
        &self.unreduced
    }

    /// Seek to `offset`, finalizing pending output as an edit that replaces
    /// `overwrite` original bytes at the previous position.
    ///
    /// # Errors
    ///
    /// Fails when `offset` splits a character or the overwrite runs past the
    /// end of the snapshot.
    pub fn set_position_with(&mut self, offset: usize, overwrite: usize) -> Result<(), EditError> {
        self.ensure_open()?;
        let target = self.checked_offset(offset)?;
        if !self.pending.is_empty() {
            self.create_edit(overwrite)?;
        }
        trace!(from = self.last_position_set, to = target, "seek");
        self.last_position_set = target;
        self.implicit_overwrite = 0;
        Ok(())
    }

    /// Begin replacing the original span `[start, end)`.
    ///
    /// The span is consumed by the next [`finish_writing`](Self::finish_writing)
    /// no matter how much text is written in between.
    ///
    /// # Errors
    ///
    /// Fails when `end < start` or either offset is invalid.
    pub fn start_writing(&mut self, start: usize, end: usize) -> Result<(), EditError> {
        if end < start {
            return Err(EditError::InvalidRange { start, end });
        }
        self.set_position(start)?;
        let end = self.checked_offset(end)?;
        self.implicit_overwrite = end - self.last_position_set;
        Ok(())
    }

    /// Finalize the current write session using the span declared by
    /// [`start_writing`](Self::start_writing).
    ///
    /// # Errors
    ///
    /// Fails when the declared span no longer fits the snapshot.
    pub fn finish_writing(&mut self) -> Result<(), EditError> {
        self.finish_writing_with(self.implicit_overwrite)
    }

    /// Finalize the current write session replacing `overwrite` original bytes.
    ///
    /// Creates an edit when output is pending or `overwrite` is non-zero, so a
    /// session with no output deletes its span.
    ///
    /// # Errors
    ///
    /// Fails when the span runs past the end of the snapshot.
    pub fn finish_writing_with(&mut self, overwrite: usize) -> Result<(), EditError> {
        self.ensure_open()?;
        if !self.pending.is_empty() || overwrite > 0 {
            self.create_edit(overwrite)?;
        }
        self.implicit_overwrite = 0;
        Ok(())
    }

    /// Insert `text` at `offset` ahead of every edit already starting there.
    ///
    /// See [`replace_before`](Self::replace_before).
    ///
    /// # Errors
    ///
    /// Fails when `offset` is invalid or pending output cannot be finalized.
    pub fn insert_before(&mut self, offset: usize, text: &str) -> Result<(), EditError> {
        self.replace_before(offset, offset, text)
    }

    /// Replace `[start, end)` with `text`, ordered ahead of every edit that
    /// already starts at `start`.
    ///
    /// Pending output is finalized first. Existing edits at `start` are
    /// re-sequenced after the new one so reduction places `text` first.
    /// The write position is unchanged.
    ///
    /// # Errors
    ///
    /// Fails when the range is invalid or pending output cannot be finalized.
    pub fn replace_before(&mut self, start: usize, end: usize, text: &str) -> Result<(), EditError> {
        self.ensure_open()?;
        if end < start {
            return Err(EditError::InvalidRange { start, end });
        }
        let start = self.checked_offset(start)?;
        let end = self.checked_offset(end)?;
        let original_value = self.snapshot.read(start, end - start)?.to_string();
        self.drain_pending()?;
        if text.is_empty() && original_value.is_empty() {
            return Ok(());
        }

        let (mut displaced, kept): (Vec<_>, Vec<_>) = std::mem::take(&mut self.unreduced)
            .into_iter()
            .partition(|edit| edit.start_offset == start);
        self.unreduced = kept;

        let id = self.next_id();
        self.unreduced.push(DocumentEdit {
            file_name: self.file_name.clone(),
            start_offset: start,
            end_offset: end,
            original_value,
            new_value: text.to_string(),
            id,
        });

        displaced.sort_by_key(|edit| edit.id);
        for mut edit in displaced {
            edit.id = self.next_id();
            self.unreduced.push(edit);
        }
        debug!(start, end, len = text.len(), "wrote ahead of existing edits");
        Ok(())
    }

    /// Finalize pending output and return the reduced edit list.
    ///
    /// Can be called repeatedly; each call only drains output written since
    /// the previous one.
    ///
    /// # Errors
    ///
    /// Fails when pending output cannot be finalized or the edits overlap.
    pub fn edits(&mut self) -> Result<Vec<DocumentEdit>, EditError> {
        if !self.closed {
            self.drain_pending()?;
        }
        let reduced = reduce_edits(&self.unreduced)?;
        debug!(
            file = %self.file_name,
            unreduced = self.unreduced.len(),
            reduced = reduced.len(),
            "reduced edits"
        );
        Ok(reduced)
    }

    /// Finalize pending output and refuse further writes.
    ///
    /// # Errors
    ///
    /// Fails when pending output cannot be finalized.
    pub fn close(&mut self) -> Result<(), EditError> {
        if self.closed {
            return Ok(());
        }
        self.drain_pending()?;
        self.closed = true;
        Ok(())
    }

    fn drain_pending(&mut self) -> Result<(), EditError> {
        if !self.pending.is_empty() || self.implicit_overwrite > 0 {
            self.create_edit(self.implicit_overwrite)?;
            self.implicit_overwrite = 0;
        }
        Ok(())
    }

    fn create_edit(&mut self, overwrite: usize) -> Result<(), EditError> {
        let start = self.last_position_set;
        let original_value = self.snapshot.read(start, overwrite)?.to_string();
        let new_value = self.pending.take();
        let id = self.next_id();
        debug!(
            file = %self.file_name,
            start,
            overwrite,
            new_len = new_value.len(),
            id,
            "created edit"
        );
        self.unreduced.push(DocumentEdit {
            file_name: self.file_name.clone(),
            start_offset: start,
            end_offset: start + overwrite,
            original_value,
            new_value,
            id,
        });
        Ok(())
    }

    fn checked_offset(&self, offset: usize) -> Result<usize, EditError> {
        let clamped = self.snapshot.clamp(offset);
        if clamped != offset {
            warn!(offset, len = self.snapshot.len(), "offset clamped to document end");
        }
        if !self.snapshot.as_str().is_char_boundary(clamped) {
            return Err(EditError::InvalidOffset(clamped));
        }
        Ok(clamped)
    }

    fn ensure_open(&self) -> Result<(), EditError> {
        if self.closed {
            Err(EditError::WriterClosed)
        } else {
            Ok(())
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.edit_counter;
        self.edit_counter += 1;
        id
    }
}

impl Sink for EditTrackingWriter {
    fn write(&mut self, text: &str) -> Result<(), EditError> {
        self.ensure_open()?;
        self.pending.write(text)
    }

    fn write_line(&mut self) -> Result<(), EditError> {
        self.ensure_open()?;
        self.pending.write_line()
    }

    fn set_position(&mut self, offset: usize) -> Result<(), EditError> {
        self.set_position_with(offset, 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seek_without_output_creates_nothing() {
        let mut writer = EditTrackingWriter::new("abcdef");
        writer.set_position(2).expect("seek");
        writer.set_position(4).expect("seek");
        assert!(writer.edits().expect("edits").is_empty());
    }

    #[test]
    fn test_position_not_advanced_by_output() {
        let mut writer = EditTrackingWriter::new("abcdef");
        writer.set_position(2).expect("seek");
        writer.write("XYZXYZ").expect("write");
        writer.set_position(4).expect("seek");
        assert_eq!(writer.unreduced_edits()[0].start_offset, 2);
        assert_eq!(writer.position(), 4);
    }

    #[test]
    fn test_empty_session_deletes_span() {
        let mut writer = EditTrackingWriter::new("keep-drop-keep");
        writer.start_writing(4, 9).expect("start");
        writer.finish_writing().expect("finish");
        let edits = writer.edits().expect("edits");
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].original_value, "-drop");
        assert_eq!(edits[0].new_value, "");
    }

    #[test]
    fn test_seek_resets_implicit_overwrite() {
        let mut writer = EditTrackingWriter::new("0123456789");
        writer.start_writing(0, 5).expect("start");
        writer.set_position(7).expect("seek");
        writer.write("x").expect("write");
        let edits = writer.edits().expect("edits");
        assert_eq!(edits.len(), 1);
        assert!(edits[0].is_insertion());
        assert_eq!(edits[0].start_offset, 7);
    }

    #[test]
    fn test_failed_edit_keeps_pending_output() {
        let mut writer = EditTrackingWriter::new("abc");
        writer.set_position(2).expect("seek");
        writer.write("zz").expect("write");
        assert!(matches!(
            writer.finish_writing_with(10),
            Err(EditError::SnapshotOverrun { .. })
        ));
        assert!(writer.unreduced_edits().is_empty());
        assert_eq!(writer.pending_output(), "zz");
    }

    #[test]
    fn test_closed_writer_rejects_writes() {
        let mut writer = EditTrackingWriter::new("abc");
        writer.write("x").expect("write");
        writer.close().expect("close");
        assert_eq!(writer.write("y"), Err(EditError::WriterClosed));
        assert_eq!(writer.edits().expect("edits").len(), 1);
    }

    #[test]
    fn test_insert_before_resequences() {
        let mut writer = EditTrackingWriter::new("body");
        writer.write("first ").expect("write");
        writer.set_position(0).expect("seek");
        writer.insert_before(0, "header ").expect("insert");
        let edits = writer.edits().expect("edits");
        assert_eq!(edits.len(), 1);
        assert_eq!(edits[0].new_value, "header first ");
    }
}
