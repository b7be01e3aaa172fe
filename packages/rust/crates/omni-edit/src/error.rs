//! Error types for edit tracking operations.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use thiserror::Error;

/// Error types for edit operations.
///
/// Each variant represents a specific failure mode in the edit pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EditError {
    /// The writer asked for original text beyond the end of the snapshot.
    ///
    /// This means the writer and its snapshot are out of sync and the session
    /// cannot be continued.
    #[error("snapshot overrun: {count} bytes at offset {offset} exceed document length {len}")]
    SnapshotOverrun {
        /// Offset the read started at.
        offset: usize,
        /// Number of bytes requested.
        count: usize,
        /// Length of the snapshot.
        len: usize,
    },

    /// Offset does not fall on a character boundary of the document.
    #[error("invalid offset {0}: not a character boundary")]
    InvalidOffset(usize),

    /// Replacement range whose end precedes its start.
    #[error("invalid range: end {end} precedes start {start}")]
    InvalidRange {
        /// Range start.
        start: usize,
        /// Range end.
        end: usize,
    },

    /// Indent popped without a matching push.
    #[error("unbalanced indent: pop without matching push")]
    UnbalancedIndent,

    /// Operation issued in a state that does not allow it.
    #[error("invalid writer state: {0}")]
    InvalidState(&'static str),

    /// Write issued after the writer was closed.
    #[error("writer is closed")]
    WriterClosed,

    /// Two edits cover intersecting ranges of the original document.
    #[error("overlapping edits: [{first_start}, {first_end}) and [{second_start}, {second_end})")]
    OverlappingEdits {
        /// Start of the earlier edit.
        first_start: usize,
        /// End of the earlier edit.
        first_end: usize,
        /// Start of the later edit.
        second_start: usize,
        /// End of the later edit.
        second_end: usize,
    },

    /// An edit's recorded original text does not match the document.
    #[error("original text mismatch at offset {offset}: expected {expected:?}, found {found:?}")]
    OriginalMismatch {
        /// Start offset of the edit.
        offset: usize,
        /// Text recorded in the edit.
        expected: String,
        /// Text found in the document.
        found: String,
    },
}
