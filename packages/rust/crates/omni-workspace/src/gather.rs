//! Gathering candidate code actions from refactor providers.

use std::sync::Arc;

use omni_edit::EditError;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::bag::ConcurrentBag;
use crate::change::{SelectionExtent, WorkspaceChange};

/// What a provider is asked to refactor.
#[derive(Debug, Clone)]
pub struct RefactorContext {
    /// Document being refactored.
    pub file_name: String,
    /// Its current text.
    pub document: Arc<str>,
    /// Current selection, if any.
    pub selection: Option<SelectionExtent>,
}

impl RefactorContext {
    /// Context for a whole document with no selection.
    pub fn new(file_name: impl Into<String>, document: impl Into<Arc<str>>) -> Self {
        Self {
            file_name: file_name.into(),
            document: document.into(),
            selection: None,
        }
    }

    /// Attach a selection.
    #[must_use]
    pub fn with_selection(mut self, start_offset: usize, end_offset: usize) -> Self {
        self.selection = Some(SelectionExtent {
            file_name: self.file_name.clone(),
            start_offset,
            end_offset,
        });
        self
    }

    /// Selected text, or the whole document without a selection.
    ///
    /// Returns `None` when the selection is out of range.
    #[must_use]
    pub fn selected_text(&self) -> Option<&str> {
        match &self.selection {
            Some(selection) => self
                .document
                .get(selection.start_offset..selection.end_offset),
            None => Some(&self.document),
        }
    }
}

/// One refactoring offered to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeAction {
    /// Title shown in the editor.
    pub title: String,
    /// Name of the provider that produced it.
    pub provider: String,
    /// Changes applied when the action is chosen.
    pub changes: Vec<WorkspaceChange>,
}

/// Computes code actions for a context.
///
/// Providers run concurrently and must not share mutable state.
pub trait RefactorProvider: Send + Sync {
    /// Stable provider name.
    fn name(&self) -> &str;

    /// Cheap check run before [`code_actions`](Self::code_actions).
    fn can_handle(&self, _context: &RefactorContext) -> bool {
        true
    }

    /// Candidate actions for `context`.
    ///
    /// # Errors
    ///
    /// Propagates edit computation failures; the gatherer logs and skips them.
    fn code_actions(&self, context: &RefactorContext) -> Result<Vec<CodeAction>, EditError>;
}

/// Evaluate every provider in parallel and collect their actions.
///
/// Actions are ordered by provider position, then by the order each provider
/// returned them. A failing provider contributes nothing.
pub fn gather_code_actions(
    providers: &[Box<dyn RefactorProvider>],
    context: &RefactorContext,
) -> Vec<CodeAction> {
    let bag = ConcurrentBag::new();
    providers
        .par_iter()
        .enumerate()
        .filter(|(_, provider)| provider.can_handle(context))
        .for_each(|(index, provider)| match provider.code_actions(context) {
            Ok(actions) => {
                bag.extend(
                    actions
                        .into_iter()
                        .enumerate()
                        .map(|(seq, action)| (index, seq, action)),
                );
            }
            Err(error) => {
                warn!(
                    provider = provider.name(),
                    file = %context.file_name,
                    error = %error,
                    "refactor provider failed; skipping"
                );
            }
        });

    let mut collected = bag.into_vec();
    collected.sort_by_key(|(index, seq, _)| (*index, *seq));
    debug!(
        providers = providers.len(),
        actions = collected.len(),
        "gathered code actions"
    );
    collected.into_iter().map(|(_, _, action)| action).collect()
}
