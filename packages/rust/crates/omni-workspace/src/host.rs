//! Host adapter boundary and the cancellable apply loop.

use async_trait::async_trait;
use omni_edit::{validate_edits, DocumentEdit};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::change::{SelectionExtent, WorkspaceChange};
use crate::error::ApplyError;

/// Operations an editor or file system must provide to receive changes.
///
/// Locations are the strings carried by [`WorkspaceChange`]; interpreting
/// them is up to the host.
#[async_trait]
pub trait EditorHost: Send + Sync {
    /// Current text of a document.
    async fn document_text(&self, location: &str) -> Result<String, ApplyError>;

    /// Apply one edit to a document.
    async fn apply_edit(&self, location: &str, edit: &DocumentEdit) -> Result<(), ApplyError>;

    /// Create a file with initial content.
    async fn create_file(&self, location: &str, content: &str) -> Result<(), ApplyError>;

    /// Delete a file.
    async fn delete_file(&self, location: &str) -> Result<(), ApplyError>;

    /// Rename a file within its directory.
    async fn rename_file(&self, location: &str, new_name: &str) -> Result<(), ApplyError>;

    /// Move a file.
    async fn move_file(&self, location: &str, destination: &str) -> Result<(), ApplyError>;

    /// Change the editor selection.
    async fn set_selection(&self, selection: &SelectionExtent) -> Result<(), ApplyError>;

    /// Run an editor command.
    async fn invoke_command(
        &self,
        name: &str,
        arguments: &[serde_json::Value],
    ) -> Result<(), ApplyError>;
}

/// Counts from one [`apply_workspace_changes`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplyReport {
    /// Changes fully applied.
    pub changes_applied: usize,
    /// Individual edits applied.
    pub edits_applied: usize,
}

/// Apply `changes` to `host` in order.
///
/// Edits for a document are validated against its current text, then sent
/// one at a time in descending start order. `cancel` is checked before every
/// edit and every other change; work already sent is not rolled back.
///
/// # Errors
///
/// [`ApplyError::Cancelled`] with the number of operations completed,
/// [`ApplyError::Edit`] when edits do not match the document, or whatever
/// the host reports.
pub async fn apply_workspace_changes<H>(
    host: &H,
    changes: &[WorkspaceChange],
    cancel: &CancellationToken,
) -> Result<ApplyReport, ApplyError>
where
    H: EditorHost + ?Sized,
{
    let mut report = ApplyReport::default();
    let mut operations = 0;

    for change in changes {
        match change {
            WorkspaceChange::Edit { location, edits } => {
                let text = host.document_text(location).await?;
                let ordered = validate_edits(&text, edits)?;
                for edit in ordered.iter().rev() {
                    if cancel.is_cancelled() {
                        return Err(ApplyError::Cancelled { applied: operations });
                    }
                    host.apply_edit(location, edit).await?;
                    operations += 1;
                    report.edits_applied += 1;
                }
                debug!(location = %location, edits = ordered.len(), "applied document edits");
            }
            other => {
                if cancel.is_cancelled() {
                    return Err(ApplyError::Cancelled { applied: operations });
                }
                apply_other(host, other).await?;
                operations += 1;
            }
        }
        report.changes_applied += 1;
    }

    info!(
        changes = report.changes_applied,
        edits = report.edits_applied,
        "applied workspace changes"
    );
    Ok(report)
}

async fn apply_other<H>(host: &H, change: &WorkspaceChange) -> Result<(), ApplyError>
where
    H: EditorHost + ?Sized,
{
    match change {
        WorkspaceChange::New { location, content } => host.create_file(location, content).await,
        WorkspaceChange::Delete { location } => host.delete_file(location).await,
        WorkspaceChange::Rename { location, new_name } => {
            host.rename_file(location, new_name).await
        }
        WorkspaceChange::Move {
            location,
            destination,
        } => host.move_file(location, destination).await,
        WorkspaceChange::Context { selection } => host.set_selection(selection).await,
        WorkspaceChange::Command { name, arguments } => {
            host.invoke_command(name, arguments).await
        }
        WorkspaceChange::Edit { .. } => Ok(()),
    }
}
