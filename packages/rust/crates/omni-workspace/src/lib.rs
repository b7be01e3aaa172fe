#![allow(clippy::doc_markdown)]

//! omni-workspace - Workspace changes and host application
//!
//! Packages document edits with file operations, selections and commands
//! into [`WorkspaceChange`] values, gathers candidate code actions from
//! refactor providers in parallel, and applies changes through an
//! [`EditorHost`].
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-workspace/src/
//! ├── lib.rs       # Re-exports (this file)
//! ├── error.rs     # ApplyError enum (thiserror)
//! ├── change.rs    # WorkspaceChange, ChangeKind, SelectionExtent
//! ├── aggregate.rs # Per-document grouping, ChangeSet
//! ├── bag.rs       # ConcurrentBag
//! ├── gather.rs    # RefactorProvider, gather_code_actions (rayon)
//! ├── host.rs      # EditorHost trait, cancellable apply loop
//! ├── io.rs        # Size-limited, binary-aware reads
//! └── fs.rs        # FileSystemHost, parallel apply (rayon + dashmap)
//! ```

mod aggregate;
mod bag;
mod change;
mod error;
mod fs;
mod gather;
mod host;
mod io;

pub use aggregate::{aggregate_edits, ChangeSet};
pub use bag::ConcurrentBag;
pub use change::{ChangeKind, SelectionExtent, WorkspaceChange};
pub use error::ApplyError;
pub use fs::{apply_edit_changes_parallel, ApplyConfig, ApplyStats, FileSystemHost};
pub use gather::{gather_code_actions, CodeAction, RefactorContext, RefactorProvider};
pub use host::{apply_workspace_changes, ApplyReport, EditorHost};
pub use io::{is_binary, read_document, read_document_async, DEFAULT_MAX_FILE_SIZE};

pub use tokio_util::sync::CancellationToken;
