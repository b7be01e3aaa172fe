//! Workspace change records handed to host adapters.

use omni_edit::DocumentEdit;
use serde::{Deserialize, Serialize};

/// A span of one document to select in the editor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectionExtent {
    /// Document containing the selection.
    pub file_name: String,
    /// First selected byte.
    pub start_offset: usize,
    /// End of the selection, exclusive.
    pub end_offset: usize,
}

/// Discriminant of a [`WorkspaceChange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    /// Create a file.
    New,
    /// Delete a file.
    Delete,
    /// Rename a file in place.
    Rename,
    /// Move a file elsewhere.
    Move,
    /// Apply edits to one document.
    Edit,
    /// Change the editor selection.
    Context,
    /// Run an editor command.
    Command,
}

/// One unit of change for a host to apply.
///
/// `Edit` changes carry every edit for exactly one document; the other kinds
/// carry a single payload and no edits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum WorkspaceChange {
    /// Create `location` with `content`.
    New {
        /// Path of the new file.
        location: String,
        /// Initial text.
        content: String,
    },
    /// Delete `location`.
    Delete {
        /// Path of the file.
        location: String,
    },
    /// Rename `location` to `new_name` in the same directory.
    Rename {
        /// Path of the file.
        location: String,
        /// New file name.
        new_name: String,
    },
    /// Move `location` to `destination`.
    Move {
        /// Path of the file.
        location: String,
        /// Target path.
        destination: String,
    },
    /// Apply `edits` to `location`.
    Edit {
        /// Path of the document.
        location: String,
        /// Non-overlapping edits against the current document text.
        edits: Vec<DocumentEdit>,
    },
    /// Select a span after the other changes are applied.
    Context {
        /// Span to select.
        selection: SelectionExtent,
    },
    /// Run the editor command `name`.
    Command {
        /// Command identifier.
        name: String,
        /// Command arguments.
        #[serde(default)]
        arguments: Vec<serde_json::Value>,
    },
}

impl WorkspaceChange {
    /// The change's kind.
    #[must_use]
    pub fn kind(&self) -> ChangeKind {
        match self {
            Self::New { .. } => ChangeKind::New,
            Self::Delete { .. } => ChangeKind::Delete,
            Self::Rename { .. } => ChangeKind::Rename,
            Self::Move { .. } => ChangeKind::Move,
            Self::Edit { .. } => ChangeKind::Edit,
            Self::Context { .. } => ChangeKind::Context,
            Self::Command { .. } => ChangeKind::Command,
        }
    }

    /// File the change targets, if it targets one.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        match self {
            Self::New { location, .. }
            | Self::Delete { location }
            | Self::Rename { location, .. }
            | Self::Move { location, .. }
            | Self::Edit { location, .. } => Some(location),
            Self::Context { selection } => Some(&selection.file_name),
            Self::Command { .. } => None,
        }
    }

    /// Edits carried by the change; empty for non-edit kinds.
    #[must_use]
    pub fn edits(&self) -> &[DocumentEdit] {
        match self {
            Self::Edit { edits, .. } => edits,
            _ => &[],
        }
    }
}
