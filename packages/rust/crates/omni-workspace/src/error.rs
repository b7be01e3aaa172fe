//! Error types for applying workspace changes.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.

use omni_edit::EditError;
use thiserror::Error;

/// Failures at the host boundary.
///
/// Edits already handed to a host are never rolled back, so every variant
/// except [`ApplyError::Edit`] may leave a workspace partially changed.
#[derive(Error, Debug)]
pub enum ApplyError {
    /// Edits were inconsistent with the document or each other.
    #[error(transparent)]
    Edit(#[from] EditError),

    /// Low-level I/O error from std::io.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document does not exist.
    #[error("File not found: {0}")]
    NotFound(String),

    /// Document exceeds the size limit.
    #[error("File too large: {0} bytes (limit: {1})")]
    TooLarge(u64, u64),

    /// Document contains NUL bytes or is not valid UTF-8.
    #[error("Binary file detected: {0}")]
    BinaryFile(String),

    /// Cancellation was requested before the next discrete operation.
    #[error("Cancelled after {applied} operations")]
    Cancelled {
        /// Operations completed before cancellation was observed.
        applied: usize,
    },

    /// The host rejected a request.
    #[error("Host error: {0}")]
    Host(String),
}
