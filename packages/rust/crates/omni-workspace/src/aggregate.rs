//! Grouping flat edit lists into per-document changes.

use std::collections::HashMap;

use omni_edit::DocumentEdit;
use tracing::debug;

use crate::change::{SelectionExtent, WorkspaceChange};

/// Group `edits` by file name into one `Edit` change per document.
///
/// Documents appear in the order of their first edit; each document keeps
/// its edits in the order given.
pub fn aggregate_edits<I>(edits: I) -> Vec<WorkspaceChange>
where
    I: IntoIterator<Item = DocumentEdit>,
{
    let mut order: Vec<String> = Vec::new();
    let mut grouped: HashMap<String, Vec<DocumentEdit>> = HashMap::new();
    for edit in edits {
        match grouped.get_mut(&edit.file_name) {
            Some(group) => group.push(edit),
            None => {
                order.push(edit.file_name.clone());
                grouped.insert(edit.file_name.clone(), vec![edit]);
            }
        }
    }

    let changes: Vec<WorkspaceChange> = order
        .into_iter()
        .filter_map(|location| {
            let edits = grouped.remove(&location)?;
            Some(WorkspaceChange::Edit { location, edits })
        })
        .collect();
    debug!(documents = changes.len(), "aggregated edits");
    changes
}

/// Ordered collection of changes for one refactoring.
///
/// Edits are accumulated per document and emitted ahead of the other
/// changes so file operations never invalidate pending offsets.
#[derive(Debug, Default)]
pub struct ChangeSet {
    edits: Vec<DocumentEdit>,
    others: Vec<WorkspaceChange>,
}

impl ChangeSet {
    /// An empty change set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add edits, for any number of documents.
    pub fn add_edits<I>(&mut self, edits: I) -> &mut Self
    where
        I: IntoIterator<Item = DocumentEdit>,
    {
        self.edits.extend(edits);
        self
    }

    /// Create `location` with `content`.
    pub fn create_file(&mut self, location: impl Into<String>, content: impl Into<String>) -> &mut Self {
        self.others.push(WorkspaceChange::New {
            location: location.into(),
            content: content.into(),
        });
        self
    }

    /// Delete `location`.
    pub fn delete_file(&mut self, location: impl Into<String>) -> &mut Self {
        self.others.push(WorkspaceChange::Delete {
            location: location.into(),
        });
        self
    }

    /// Rename `location` to `new_name`.
    pub fn rename_file(&mut self, location: impl Into<String>, new_name: impl Into<String>) -> &mut Self {
        self.others.push(WorkspaceChange::Rename {
            location: location.into(),
            new_name: new_name.into(),
        });
        self
    }

    /// Move `location` to `destination`.
    pub fn move_file(&mut self, location: impl Into<String>, destination: impl Into<String>) -> &mut Self {
        self.others.push(WorkspaceChange::Move {
            location: location.into(),
            destination: destination.into(),
        });
        self
    }

    /// Select a span once everything else is applied.
    pub fn select(&mut self, selection: SelectionExtent) -> &mut Self {
        self.others.push(WorkspaceChange::Context { selection });
        self
    }

    /// Run an editor command.
    pub fn command(&mut self, name: impl Into<String>, arguments: Vec<serde_json::Value>) -> &mut Self {
        self.others.push(WorkspaceChange::Command {
            name: name.into(),
            arguments,
        });
        self
    }

    /// Whether nothing was added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty() && self.others.is_empty()
    }

    /// Edit changes first, then the rest in insertion order.
    #[must_use]
    pub fn into_changes(self) -> Vec<WorkspaceChange> {
        let mut changes = aggregate_edits(self.edits);
        changes.extend(self.others);
        changes
    }
}
