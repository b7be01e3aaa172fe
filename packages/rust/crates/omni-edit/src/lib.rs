#![allow(clippy::doc_markdown)]

//! omni-edit - Incremental edit generation for script refactoring
//!
//! Lets a code generator write the text it wants a document to contain while
//! the writer records the minimal set of non-overlapping edits that turn the
//! original document into that text. Everything the generator skips over is
//! left untouched.
//!
//! # Features
//!
//! - **Sink composition**: one [`Sink`] trait, decorated by [`IndentWriter`] and [`EditTrackingWriter`]
//! - **Snapshot coordinates**: every edit is expressed against the original text
//! - **Deterministic reduction**: same-offset edits merge in creation order
//! - **Preview**: apply edits and render a unified diff
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-edit/src/
//! ├── lib.rs      # Re-exports (this file)
//! ├── error.rs    # EditError enum (thiserror)
//! ├── types.rs    # DocumentEdit, EditPreview
//! ├── sink.rs     # Sink trait, StringSink
//! ├── snapshot.rs # Immutable original document
//! ├── tracker.rs  # EditTrackingWriter
//! ├── reduce.rs   # Same-offset edit reduction
//! ├── indent.rs   # Lazy indentation decorator
//! ├── apply.rs    # Applying and previewing edits
//! └── diff.rs     # Unified diff rendering
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use omni_edit::{apply_edits, EditTrackingWriter, Sink};
//!
//! let original = "Get-ChildItem -Recurse";
//! let mut writer = EditTrackingWriter::new(original);
//! writer.start_writing(0, original.len())?;
//! writer.write("Get-ChildItem -Recurse -File")?;
//! writer.finish_writing()?;
//!
//! let edits = writer.edits()?;
//! assert_eq!(apply_edits(original, &edits)?, "Get-ChildItem -Recurse -File");
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod apply;
pub mod diff;
mod error;
mod indent;
mod reduce;
mod sink;
mod snapshot;
mod tracker;
mod types;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use apply::{apply_edits, preview_edits, validate_edits};
pub use error::EditError;
pub use indent::IndentWriter;
pub use reduce::{ensure_disjoint, reduce_edits};
pub use sink::{Sink, StringSink};
pub use snapshot::Snapshot;
pub use tracker::EditTrackingWriter;
pub use types::{DocumentEdit, EditPreview};

// Re-export diff utility for external use
pub use diff::generate_unified_diff;
