//! Applying workspace changes to files on disk.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use omni_edit::{apply_edits, DocumentEdit};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::change::{SelectionExtent, WorkspaceChange};
use crate::error::ApplyError;
use crate::host::EditorHost;
use crate::io::{read_document, read_document_async, DEFAULT_MAX_FILE_SIZE};

fn resolve(root: &Path, location: &str) -> PathBuf {
    let path = Path::new(location);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        root.join(path)
    }
}

/// [`EditorHost`] writing straight to the file system.
///
/// Relative locations resolve against `root`. Selections are ignored and
/// commands are refused.
#[derive(Debug, Clone)]
pub struct FileSystemHost {
    root: PathBuf,
    max_file_size: u64,
}

impl FileSystemHost {
    /// Host rooted at `root` with the default size limit.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }

    /// Set the largest document the host will read.
    #[must_use]
    pub fn with_max_file_size(mut self, max_file_size: u64) -> Self {
        self.max_file_size = max_file_size;
        self
    }

    /// Absolute path for `location`.
    #[must_use]
    pub fn path_for(&self, location: &str) -> PathBuf {
        resolve(&self.root, location)
    }

    async fn ensure_parent(path: &Path) -> Result<(), ApplyError> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        Ok(())
    }
}

#[async_trait]
impl EditorHost for FileSystemHost {
    async fn document_text(&self, location: &str) -> Result<String, ApplyError> {
        read_document_async(&self.path_for(location), self.max_file_size).await
    }

    async fn apply_edit(&self, location: &str, edit: &DocumentEdit) -> Result<(), ApplyError> {
        let path = self.path_for(location);
        let text = read_document_async(&path, self.max_file_size).await?;
        let modified = apply_edits(&text, std::slice::from_ref(edit))?;
        tokio::fs::write(&path, modified).await?;
        Ok(())
    }

    async fn create_file(&self, location: &str, content: &str) -> Result<(), ApplyError> {
        let path = self.path_for(location);
        if tokio::fs::try_exists(&path).await? {
            return Err(ApplyError::Host(format!(
                "file already exists: {}",
                path.display()
            )));
        }
        Self::ensure_parent(&path).await?;
        tokio::fs::write(&path, content).await?;
        Ok(())
    }

    async fn delete_file(&self, location: &str) -> Result<(), ApplyError> {
        let path = self.path_for(location);
        tokio::fs::remove_file(&path)
            .await
            .map_err(|_| ApplyError::NotFound(path.display().to_string()))
    }

    async fn rename_file(&self, location: &str, new_name: &str) -> Result<(), ApplyError> {
        let path = self.path_for(location);
        let target = path.with_file_name(new_name);
        tokio::fs::rename(&path, &target).await?;
        Ok(())
    }

    async fn move_file(&self, location: &str, destination: &str) -> Result<(), ApplyError> {
        let path = self.path_for(location);
        let target = self.path_for(destination);
        Self::ensure_parent(&target).await?;
        tokio::fs::rename(&path, &target).await?;
        Ok(())
    }

    async fn set_selection(&self, selection: &SelectionExtent) -> Result<(), ApplyError> {
        debug!(
            file = %selection.file_name,
            start = selection.start_offset,
            end = selection.end_offset,
            "selection ignored by file system host"
        );
        Ok(())
    }

    async fn invoke_command(
        &self,
        name: &str,
        _arguments: &[serde_json::Value],
    ) -> Result<(), ApplyError> {
        Err(ApplyError::Host(format!(
            "command not supported by file system host: {name}"
        )))
    }
}

/// Statistics for a parallel apply.
#[derive(Debug, Default)]
pub struct ApplyStats {
    /// Documents read.
    pub files_scanned: usize,
    /// Documents whose text changed.
    pub files_changed: usize,
    /// Edits applied across all documents.
    pub edits_applied: usize,
    /// Errors encountered (path -> error message)
    pub errors: HashMap<String, String>,
    /// Changed documents, sorted.
    pub modified_files: Vec<String>,
}

/// Configuration for [`apply_edit_changes_parallel`].
#[derive(Debug, Clone)]
pub struct ApplyConfig {
    /// Directory relative locations resolve against.
    pub root: PathBuf,
    /// Compute results without writing files.
    pub dry_run: bool,
    /// Maximum file size in bytes (default 1MB)
    pub max_file_size: u64,
    /// Number of parallel workers (0 = auto-detect)
    pub workers: usize,
}

impl Default for ApplyConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            dry_run: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            workers: 0,
        }
    }
}

/// Apply every `Edit` change in `changes` to disk, documents in parallel.
///
/// Edits for the same location are merged first; other change kinds are
/// skipped. A document that fails is recorded in
/// [`ApplyStats::errors`] and left unchanged.
#[must_use]
pub fn apply_edit_changes_parallel(changes: &[WorkspaceChange], config: &ApplyConfig) -> ApplyStats {
    let mut by_location: HashMap<&str, Vec<DocumentEdit>> = HashMap::new();
    for change in changes {
        match change {
            WorkspaceChange::Edit { location, edits } => by_location
                .entry(location.as_str())
                .or_default()
                .extend(edits.iter().cloned()),
            other => debug!(kind = ?other.kind(), "skipping non-edit change"),
        }
    }

    let files_scanned = AtomicUsize::new(0);
    let edits_applied = AtomicUsize::new(0);
    let modified_files: DashMap<String, usize> = DashMap::new();
    let errors: DashMap<String, String> = DashMap::new();

    let work = || {
        by_location.par_iter().for_each(|(location, edits)| {
            files_scanned.fetch_add(1, Ordering::Relaxed);
            let path = resolve(&config.root, location);
            match apply_to_file(&path, edits, config) {
                Ok(true) => {
                    edits_applied.fetch_add(edits.len(), Ordering::Relaxed);
                    modified_files.insert((*location).to_string(), edits.len());
                }
                Ok(false) => {}
                Err(error) => {
                    errors.insert((*location).to_string(), error.to_string());
                }
            }
        });
    };

    if config.workers > 0 {
        match rayon::ThreadPoolBuilder::new()
            .num_threads(config.workers)
            .build()
        {
            Ok(pool) => pool.install(work),
            Err(error) => {
                warn!(error = %error, "failed to build worker pool; using global pool");
                work();
            }
        }
    } else {
        work();
    }

    let mut modified: Vec<String> = modified_files.into_iter().map(|(k, _)| k).collect();
    modified.sort();
    let stats = ApplyStats {
        files_scanned: files_scanned.load(Ordering::Relaxed),
        files_changed: modified.len(),
        edits_applied: edits_applied.load(Ordering::Relaxed),
        errors: errors.into_iter().collect(),
        modified_files: modified,
    };
    info!(
        scanned = stats.files_scanned,
        changed = stats.files_changed,
        errors = stats.errors.len(),
        dry_run = config.dry_run,
        "applied edit changes"
    );
    stats
}

fn apply_to_file(path: &Path, edits: &[DocumentEdit], config: &ApplyConfig) -> Result<bool, ApplyError> {
    let text = read_document(path, config.max_file_size)?;
    let modified = apply_edits(&text, edits)?;
    if modified == text {
        return Ok(false);
    }
    if !config.dry_run {
        std::fs::write(path, &modified)?;
    }
    Ok(true)
}
